//! In-process ephemeral transcript repository.
//!
//! The ephemeral tier is scoped to a single browsing session: here that is
//! the lifetime of the process. Values are held as serialized strings, the
//! same surface the durable tier writes to disk, so both tiers go through
//! the same tolerant codec on load.

use async_trait::async_trait;
use folio_core::error::Result;
use folio_core::transcript::{StorageKey, TranscriptRepository, Turn, codec};
use std::collections::HashMap;
use std::sync::Mutex;

/// Session-scoped transcript storage.
///
/// Cleared when the process ends; nothing ever touches disk. Anonymous
/// visitors always read and write the single fixed ephemeral key, but the
/// map is keyed generically so the adapter never clobbers unrelated keys.
pub struct SessionTranscriptRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionTranscriptRepository {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Inserts a raw serialized value under a key. Test seam for exercising
    /// corrupt stored data.
    #[cfg(test)]
    fn insert_raw(&self, key: &StorageKey, raw: &str) {
        self.entries
            .lock()
            .expect("session store lock poisoned")
            .insert(key.to_string(), raw.to_string());
    }
}

impl Default for SessionTranscriptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptRepository for SessionTranscriptRepository {
    async fn load(&self, key: &StorageKey) -> Result<Option<Vec<Turn>>> {
        let raw = {
            let entries = self
                .entries
                .lock()
                .map_err(|_| folio_core::FolioError::storage("session store lock poisoned"))?;
            entries.get(&key.to_string()).cloned()
        };

        let Some(raw) = raw else {
            return Ok(None);
        };

        match codec::decode_lossy(&raw) {
            Ok(turns) if !turns.is_empty() => Ok(Some(turns)),
            Ok(_) => Ok(None),
            Err(err) => {
                // Corrupt stored data reads as "no prior transcript".
                tracing::warn!(key = %key, error = %err, "Discarding unreadable session transcript");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &StorageKey, turns: &[Turn]) -> Result<()> {
        let raw = codec::encode(turns)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| folio_core::FolioError::storage("session store lock poisoned"))?;
        entries.insert(key.to_string(), raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let repository = SessionTranscriptRepository::new();
        let turns = vec![Turn::assistant("Bonjour !"), Turn::user("commencer")];

        repository.save(&StorageKey::Ephemeral, &turns).await.unwrap();
        let loaded = repository.load(&StorageKey::Ephemeral).await.unwrap();

        assert_eq!(loaded, Some(turns));
    }

    #[tokio::test]
    async fn test_missing_key_loads_empty() {
        let repository = SessionTranscriptRepository::new();
        assert_eq!(repository.load(&StorageKey::Ephemeral).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_value_loads_empty() {
        let repository = SessionTranscriptRepository::new();
        repository.insert_raw(&StorageKey::Ephemeral, "{not valid json");

        assert_eq!(repository.load(&StorageKey::Ephemeral).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_load_is_idempotent_without_intervening_save() {
        let repository = SessionTranscriptRepository::new();
        let turns = vec![Turn::user("bonjour")];
        repository.save(&StorageKey::Ephemeral, &turns).await.unwrap();

        let first = repository.load(&StorageKey::Ephemeral).await.unwrap();
        let second = repository.load(&StorageKey::Ephemeral).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_keys_do_not_clobber_each_other() {
        let repository = SessionTranscriptRepository::new();
        let anonymous = vec![Turn::user("anonyme")];
        let alice = vec![Turn::user("alice")];

        repository
            .save(&StorageKey::Ephemeral, &anonymous)
            .await
            .unwrap();
        repository
            .save(&StorageKey::Durable("Alice".to_string()), &alice)
            .await
            .unwrap();

        assert_eq!(
            repository.load(&StorageKey::Ephemeral).await.unwrap(),
            Some(anonymous)
        );
        assert_eq!(
            repository
                .load(&StorageKey::Durable("Alice".to_string()))
                .await
                .unwrap(),
            Some(alice)
        );
    }
}
