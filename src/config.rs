//! Configuration Management
//!
//! Loads the source/destination credential sets from `config.json` in the
//! working directory and selects the right one for the requested action.

use crate::error::SyncError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file, resolved against the working directory.
pub const CONFIG_FILE: &str = "config.json";

/// Which account an action talks to.
///
/// pull, edit and validate operate on the source account; push creates
/// objects in the destination account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// The credential triple for one account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub app_key: String,
    pub api_host: String,
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub source_api_key: String,
    pub source_app_key: String,
    pub source_api_host: String,
    pub dest_api_key: String,
    pub dest_app_key: String,
    pub dest_api_host: String,
}

impl SyncConfig {
    /// Load configuration from `./config.json`. Read once per invocation.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| SyncError::ConfigurationMissing(path.display().to_string()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Select the credential set for the given direction.
    pub fn credentials(&self, direction: Direction) -> Credentials {
        match direction {
            Direction::Read => Credentials {
                api_key: self.source_api_key.clone(),
                app_key: self.source_app_key.clone(),
                api_host: self.source_api_host.clone(),
            },
            Direction::Write => Credentials {
                api_key: self.dest_api_key.clone(),
                app_key: self.dest_app_key.clone(),
                api_host: self.dest_api_host.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyncConfig {
        serde_json::from_str(
            r#"{
                "source_api_key": "src-api",
                "source_app_key": "src-app",
                "source_api_host": "https://api.datadoghq.com/",
                "dest_api_key": "dst-api",
                "dest_app_key": "dst-app",
                "dest_api_host": "https://api.datadoghq.eu/"
            }"#,
        )
        .expect("sample config should parse")
    }

    #[test]
    fn read_direction_selects_source() {
        let creds = sample().credentials(Direction::Read);
        assert_eq!(creds.api_key, "src-api");
        assert_eq!(creds.app_key, "src-app");
        assert_eq!(creds.api_host, "https://api.datadoghq.com/");
    }

    #[test]
    fn write_direction_selects_destination() {
        let creds = sample().credentials(Direction::Write);
        assert_eq!(creds.api_key, "dst-api");
        assert_eq!(creds.api_host, "https://api.datadoghq.eu/");
    }

    #[test]
    fn missing_file_is_configuration_missing() {
        let err = SyncConfig::load_from(Path::new("does-not-exist.json")).unwrap_err();
        let sync_err = err.downcast_ref::<SyncError>();
        assert!(matches!(sync_err, Some(SyncError::ConfigurationMissing(_))));
    }
}
