//! Transcript repository trait and storage keys.
//!
//! Defines the interface for transcript persistence operations, decoupling
//! the conversation logic from the concrete storage tier.

use super::turn::Turn;
use crate::error::Result;
use crate::identity::Identity;
use async_trait::async_trait;
use std::fmt;

/// The fixed key used by the ephemeral tier for anonymous visitors.
const EPHEMERAL_KEY: &str = "ephemeral";

/// The key a transcript is persisted under, derived from the visitor
/// identity.
///
/// The key used to read on hydration and the key used on every write
/// afterward must always match the *current* identity; writing under a
/// stale key after an identity change is a correctness bug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Single fixed key, session-scoped storage.
    Ephemeral,
    /// Durable storage namespaced by the visitor's display name.
    Durable(String),
}

impl StorageKey {
    /// Derives the storage key for an identity.
    pub fn for_identity(identity: &Identity) -> Self {
        match identity {
            Identity::Anonymous => Self::Ephemeral,
            Identity::Named(name) => Self::Durable(name.clone()),
        }
    }

    /// Returns true for the durable tier.
    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Durable(_))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ephemeral => write!(f, "{}", EPHEMERAL_KEY),
            Self::Durable(name) => write!(f, "durable:{}", name),
        }
    }
}

/// An abstract repository for transcript persistence.
///
/// This trait defines the contract for persisting and retrieving
/// transcripts, decoupling the conversation logic from the storage
/// mechanism (in-process session storage, JSON files, a remote store).
///
/// # Implementation Notes
///
/// Implementations must:
/// - Treat corrupt or missing stored data as empty (`Ok(None)`); a
///   recoverable condition, never a propagated failure
/// - Ignore malformed records inside an otherwise valid document
/// - Scope every write under the given key, never touching unrelated keys
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    /// Loads the transcript stored under a key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(turns))`: a non-empty prior transcript exists
    /// - `Ok(None)`: nothing stored, or the stored data was unreadable
    /// - `Err(_)`: infrastructure failure other than unreadable data
    async fn load(&self, key: &StorageKey) -> Result<Option<Vec<Turn>>>;

    /// Persists the transcript under a key, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error when the write itself fails. The in-memory
    /// transcript is unaffected by a failed save.
    async fn save(&self, key: &StorageKey, turns: &[Turn]) -> Result<()>;
}
