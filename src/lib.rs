pub mod config;
pub mod engine;
pub mod error;
pub mod puzzle;

pub use config::{GameConfig, Mode};
pub use engine::{GameSession, GameSetup};
pub use error::{ConfigError, ContentError, EngineError, InitError};
