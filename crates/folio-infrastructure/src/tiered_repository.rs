//! Persistence tier selection.

use crate::json_repository::JsonTranscriptRepository;
use crate::session_repository::SessionTranscriptRepository;
use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::transcript::{StorageKey, TranscriptRepository, Turn};

/// Routes each storage key to its persistence tier.
///
/// Anonymous visitors (ephemeral keys) go to the in-process session store;
/// identified visitors (durable keys) go to the JSON file store. The tier
/// is a function of the key alone, so whoever derives the key from the
/// current identity also decides the tier, exactly once per identity
/// resolution.
pub struct TieredTranscriptRepository {
    ephemeral: SessionTranscriptRepository,
    durable: JsonTranscriptRepository,
}

impl TieredTranscriptRepository {
    /// Creates the tiered repository with a fresh session store and a
    /// durable store rooted at `durable_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable directory cannot be created.
    pub fn new(durable_dir: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self {
            ephemeral: SessionTranscriptRepository::new(),
            durable: JsonTranscriptRepository::new(durable_dir)?,
        })
    }

    fn tier(&self, key: &StorageKey) -> &dyn TranscriptRepository {
        match key {
            StorageKey::Ephemeral => &self.ephemeral,
            StorageKey::Durable(_) => &self.durable,
        }
    }
}

#[async_trait]
impl TranscriptRepository for TieredTranscriptRepository {
    async fn load(&self, key: &StorageKey) -> Result<Option<Vec<Turn>>> {
        self.tier(key).load(key).await
    }

    async fn save(&self, key: &StorageKey, turns: &[Turn]) -> Result<()> {
        self.tier(key).save(key, turns).await
    }
}
