//! Visitor profile bootstrap.
//!
//! The login flow persists the visitor's display name; at startup the
//! identity slot is seeded from that file. The manager itself never writes
//! it.

use crate::paths::FolioPaths;
use folio_core::identity::Identity;
use serde::Deserialize;
use std::fs;

/// Persisted visitor profile (`profile.json`).
#[derive(Debug, Clone, Deserialize)]
struct StoredProfile {
    #[serde(default)]
    user_name: Option<String>,
}

/// Reads the initial identity from the persisted profile.
///
/// A missing, unreadable, or corrupt profile reads as
/// [`Identity::Anonymous`]; this is a recoverable condition, logged and
/// never propagated.
pub fn load_initial_identity(paths: &FolioPaths) -> Identity {
    let path = paths.profile_file();

    if !path.exists() {
        return Identity::Anonymous;
    }

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err,
                "Failed to read profile; starting anonymous");
            return Identity::Anonymous;
        }
    };

    match serde_json::from_str::<StoredProfile>(&raw) {
        Ok(StoredProfile {
            user_name: Some(name),
        }) if !name.trim().is_empty() => Identity::Named(name),
        Ok(_) => Identity::Anonymous,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err,
                "Corrupt profile; starting anonymous");
            Identity::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> FolioPaths {
        FolioPaths::new(dir.path())
    }

    #[test]
    fn test_missing_profile_is_anonymous() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_initial_identity(&paths_in(&dir)), Identity::Anonymous);
    }

    #[test]
    fn test_profile_with_name_is_named() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.profile_file(), r#"{"user_name": "Alice"}"#).unwrap();

        assert_eq!(load_initial_identity(&paths), Identity::named("Alice"));
    }

    #[test]
    fn test_corrupt_profile_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.profile_file(), "{broken").unwrap();

        assert_eq!(load_initial_identity(&paths), Identity::Anonymous);
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        fs::write(paths.profile_file(), r#"{"user_name": "  "}"#).unwrap();

        assert_eq!(load_initial_identity(&paths), Identity::Anonymous);
    }
}
