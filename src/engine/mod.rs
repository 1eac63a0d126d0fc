//! The puzzle progression engine: clue placement, solving, the safe, the
//! trail chain and the exit.
//!
//! ```
//! use archive_raid::config::GameConfig;
//! use archive_raid::engine::{GameSession, GameSetup, Interaction};
//!
//! let mut game = GameSession::with_seed(GameSetup::new(GameConfig::default()), 7).unwrap();
//! let at = game.locations().location_of(0).unwrap().to_string();
//! let Interaction::Question { clue, question } = game.resolve_interaction(&at) else {
//!     panic!("slot 0 should hold a question");
//! };
//! let choice = question.correct;
//! assert!(game.submit_answer(clue, choice).unwrap().is_correct());
//! ```

pub mod bank;
pub mod clues;
pub mod locations;
pub mod lock;
pub mod session;

pub use bank::{PoolSource, QuestionBank};
pub use clues::{AnswerVerdict, Clue, ClueId, ClueSet, Gate, Interaction};
pub use locations::{LocationMap, SlotId};
pub use lock::{ChainState, CodeOutcome, DoorOutcome, KeyOutcome, SafeState};
pub use session::{ClueView, GameSession, GameSetup, SessionSnapshot};
