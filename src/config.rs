//! Configuration
//!
//! Remote store settings persisted as a JSON file next to the app.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

fn default_undo_window_secs() -> u64 {
    30
}

/// Remote store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the hosted tabular store
    pub url: String,
    /// API key, sent as both `apikey` header and bearer token
    pub api_key: String,
    /// How long a deletion stays undoable
    #[serde(default = "default_undo_window_secs")]
    pub undo_window_secs: u64,
}

impl Config {
    pub fn load(path: &Path) -> DomainResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DomainError::Config(format!("parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Config(format!("serialize config: {}", e)))?;
        std::fs::write(path, raw)
            .map_err(|e| DomainError::Config(format!("write {}: {}", path.display(), e)))
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
    }
}
