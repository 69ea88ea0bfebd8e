//! JSON file-backed durable transcript repository.

use async_trait::async_trait;
use folio_core::error::{FolioError, Result};
use folio_core::transcript::{StorageKey, TranscriptRepository, Turn, codec};
use std::fs;
use std::path::{Path, PathBuf};

/// A repository storing transcripts as individual JSON files.
///
/// Each storage key maps to one file under the base directory:
///
/// ```text
/// base_dir/
/// ├── durable_Alice.json
/// └── durable_Bob.json
/// ```
///
/// Files hold the wire format verbatim: an ordered JSON array of
/// `{role, text}` records. Unreadable or corrupt files are treated as "no
/// prior transcript" with a diagnostic log, never as a caller-visible
/// failure; malformed records inside a valid file are dropped by the codec.
pub struct JsonTranscriptRepository {
    base_dir: PathBuf,
}

impl JsonTranscriptRepository {
    /// Creates a repository rooted at `base_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .map_err(|e| FolioError::io(format!("Failed to create transcript directory: {e}")))?;
        Ok(Self { base_dir })
    }

    /// Returns the file path for a storage key.
    ///
    /// Key characters outside `[A-Za-z0-9_-]` are replaced so a display
    /// name can never escape the base directory.
    fn transcript_file_path(&self, key: &StorageKey) -> PathBuf {
        let name: String = key
            .to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl TranscriptRepository for JsonTranscriptRepository {
    async fn load(&self, key: &StorageKey) -> Result<Option<Vec<Turn>>> {
        let path = self.transcript_file_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, path = %path.display(), error = %err,
                    "Failed to read transcript file; treating as empty");
                return Ok(None);
            }
        };

        match codec::decode_lossy(&raw) {
            Ok(turns) if !turns.is_empty() => Ok(Some(turns)),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!(key = %key, path = %path.display(), error = %err,
                    "Discarding corrupt transcript file");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &StorageKey, turns: &[Turn]) -> Result<()> {
        let path = self.transcript_file_path(key);
        let raw = codec::encode(turns)?;

        fs::write(&path, raw)
            .map_err(|e| FolioError::io(format!("Failed to write transcript file: {e}")))?;

        Ok(())
    }
}
