//! User settings for edit-trail
//!
//! Selects how log entries are persisted and which file is monitored.
//! Settings are passed into the logger at construction; nothing here is
//! process-global.

use serde::{Deserialize, Serialize};

use super::paths::{TrailPaths, DEFAULT_LOG_DIR};
use crate::error::TrailError;
use crate::storage::try_read_text;

/// How log entries are written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Hybrid-encrypted envelopes in `history.log.encrypted` (default)
    #[default]
    Encrypted,
    /// Raw entry text in `history.log`, for local debugging
    Plaintext,
}

/// User settings for edit-trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where and how entries are written
    #[serde(default)]
    pub output: LogOutput,

    /// Monitored file, relative to the project root
    #[serde(default = "default_target_file")]
    pub target_file: String,

    /// Log directory name under the project root
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_target_file() -> String {
    "main.py".to_string()
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: LogOutput::default(),
            target_file: default_target_file(),
            log_dir: default_log_dir(),
        }
    }
}

impl Settings {
    /// Check if entries are written encrypted
    pub fn is_encrypted(&self) -> bool {
        self.output == LogOutput::Encrypted
    }

    /// Load settings from the project root, or fall back to defaults if the
    /// file doesn't exist
    pub fn load_or_default(paths: &TrailPaths) -> Result<Self, TrailError> {
        let contents = match try_read_text(paths.settings_file()) {
            Ok(contents) => contents,
            Err(e) if e.is_not_found() => return Ok(Settings::default()),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&contents)
            .map_err(|e| TrailError::Config(format!("Failed to parse settings file: {}", e)))
    }
}
