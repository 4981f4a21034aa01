pub mod high_score;
pub mod store;

pub use high_score::{HIGH_SCORE_KEY, HighScore};
pub use store::{FileStore, KeyValueStore, MemoryStore};
