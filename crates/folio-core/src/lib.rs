//! folio-core — domain model and orchestration for the portfolio
//! assistant's conversation session manager.
//!
//! The crate is UI-free: rendering, routing, and the login flow are
//! external collaborators. What lives here is the transcript model, the
//! persistence and assistant contracts, the identity capability, and the
//! controller that ties them together.

pub mod assistant;
pub mod conversation;
pub mod error;
pub mod greeting;
pub mod identity;
pub mod transcript;

pub use assistant::{AssistantClient, AssistantError, FALLBACK_REPLY};
pub use conversation::{ConversationController, ConversationPhase, SubmitOutcome};
pub use error::{FolioError, Result};
pub use identity::{Identity, IdentitySlot, IdentityWatcher};
pub use transcript::{StorageKey, Transcript, TranscriptRepository, TranscriptStore, Turn, TurnRole};
