//! Unified path management for folio data files.
//!
//! Durable transcripts, the visitor profile, and the assistant
//! configuration all live under one base directory (`~/.folio` by
//! default) so adapters agree on where things are.

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path layout for folio.
///
/// # Directory Structure
///
/// ```text
/// ~/.folio/                  # Base directory
/// ├── config.json            # Assistant endpoint configuration
/// ├── profile.json           # Persisted visitor display name
/// └── transcripts/           # Durable transcripts, one file per key
///     └── durable_Alice.json
/// ```
#[derive(Debug, Clone)]
pub struct FolioPaths {
    base_dir: PathBuf,
}

impl FolioPaths {
    /// Creates a layout rooted at an explicit base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates the default layout rooted at `~/.folio`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::HomeDirNotFound`] if the home directory cannot
    /// be determined.
    pub fn default_location() -> Result<Self, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self::new(home.join(".folio")))
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the durable transcript directory.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.base_dir.join("transcripts")
    }

    /// Returns the path to the persisted visitor profile.
    pub fn profile_file(&self) -> PathBuf {
        self.base_dir.join("profile.json")
    }

    /// Returns the path to the assistant configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }
}
