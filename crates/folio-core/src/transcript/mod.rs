//! Transcript domain: turns, the in-memory store, the wire codec, and the
//! persistence contract.

pub mod codec;
pub mod repository;
pub mod store;
pub mod turn;

/// An ordered list of turns for one conversation.
pub type Transcript = Vec<Turn>;

pub use repository::{StorageKey, TranscriptRepository};
pub use store::TranscriptStore;
pub use turn::{Turn, TurnRole};
