//! Running Quoridor matches: the history tree, turn ownership, AI turns, configuration and
//! the save slots a front end loads games through.

pub mod config;
pub mod error;
pub mod history;
pub mod saves;
pub mod session;

pub use config::{AiConfig, Difficulty, GameMode, MatchConfig};
pub use error::{HistoryError, SessionError, StoreError};
pub use history::{HistoryTree, NodeId};
pub use saves::{BlobStore, FileStore, MemoryStore, SaveSlots};
pub use session::Session;

pub use quoridor_game_types as game_types;
pub use quoridor_minimax as minimax;
