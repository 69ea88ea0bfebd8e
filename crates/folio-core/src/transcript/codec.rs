//! Wire codec for persisted transcripts.
//!
//! The stored format is an ordered JSON array of `{role, text}` records.
//! Decoding is strict about the outer document (a non-array document is a
//! serialization error the persistence adapters recover from as "no prior
//! transcript") and lossy about the entries: records that do not parse as a
//! valid [`Turn`] are dropped instead of failing the whole load.

use super::turn::Turn;
use crate::error::{FolioError, Result};

/// Serializes a transcript to its persisted JSON form.
pub fn encode(turns: &[Turn]) -> Result<String> {
    Ok(serde_json::to_string(turns)?)
}

/// Decodes a persisted transcript, skipping malformed entries.
///
/// # Errors
///
/// Returns a serialization error when the document itself is not a JSON
/// array. Callers treat that as an empty transcript; it is never surfaced
/// to the user.
pub fn decode_lossy(raw: &str) -> Result<Vec<Turn>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;

    let turns = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Turn>(entry).ok())
        .collect();

    Ok(turns)
}
