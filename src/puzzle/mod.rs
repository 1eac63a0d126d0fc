pub mod defaults;
pub mod loader;
pub mod share;
pub mod types;

pub use defaults::default_pool;
pub use loader::{load_pack, load_pack_dir, load_questions};
pub use share::{decode_payload, encode_payload, SharePayload};
pub use types::{Question, RawQuestion, OPTION_COUNT};
