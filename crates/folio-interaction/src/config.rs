//! Assistant endpoint configuration.
//!
//! Supports reading the endpoint from `~/.folio/config.json`, falling back
//! to the `FOLIO_ASSISTANT_URL` environment variable, then to the local
//! backend default.

use folio_infrastructure::FolioPaths;
use serde::Deserialize;
use std::env;
use std::fs;

/// Default endpoint, matching the local backend's `/api/ask` route.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/api/ask";

/// Root configuration structure for config.json.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Loads the assistant configuration file.
pub fn load_assistant_config(paths: &FolioPaths) -> Result<AssistantConfig, String> {
    let config_path = paths.config_file();

    if !config_path.exists() {
        return Err(format!(
            "Configuration file not found at: {}",
            config_path.display()
        ));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        )
    })
}

/// Resolves the assistant endpoint.
///
/// Priority:
/// 1. `config.json` under the folio base directory
/// 2. `FOLIO_ASSISTANT_URL` environment variable
/// 3. [`DEFAULT_ENDPOINT`]
pub fn resolve_endpoint(paths: &FolioPaths) -> String {
    if let Ok(config) = load_assistant_config(paths) {
        if let Some(endpoint) = config.endpoint {
            return endpoint;
        }
    }

    env::var("FOLIO_ASSISTANT_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string())
}
