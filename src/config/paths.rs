//! Path management for edit-trail
//!
//! Every file the change logger touches lives under a single project root.
//!
//! ## Project Root Resolution Order
//!
//! 1. An explicit root (the `--root` CLI flag)
//! 2. `EDIT_TRAIL_ROOT` environment variable (if set)
//! 3. The current working directory

use std::path::{Path, PathBuf};

use super::settings::LogOutput;
use crate::error::TrailError;

/// Environment variable that overrides the project root
pub const ROOT_ENV_VAR: &str = "EDIT_TRAIL_ROOT";

/// Default name of the log directory under the project root
pub const DEFAULT_LOG_DIR: &str = "log";

const ENCRYPTED_LOG_NAME: &str = "history.log.encrypted";
const PLAINTEXT_LOG_NAME: &str = "history.log";
const BASELINE_SUFFIX: &str = ".backup";
const PLAIN_BASELINE_SUFFIX: &str = ".plain.backup";
const SETTINGS_NAME: &str = "edit-trail.json";

/// Manages all paths used by edit-trail
#[derive(Debug, Clone)]
pub struct TrailPaths {
    /// Project root containing the monitored file
    project_root: PathBuf,
    /// Name of the log directory under the project root
    log_dir_name: String,
}

impl TrailPaths {
    /// Create paths for a project root with the default `log` directory
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_log_dir(project_root, DEFAULT_LOG_DIR)
    }

    /// Create paths with a custom log directory name
    pub fn with_log_dir(project_root: impl Into<PathBuf>, log_dir_name: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            log_dir_name: log_dir_name.into(),
        }
    }

    /// Resolve the project root from an explicit override, the environment,
    /// or the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, TrailError> {
        let root = match explicit {
            Some(root) => root,
            None => match std::env::var(ROOT_ENV_VAR) {
                Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
                _ => std::env::current_dir().map_err(|e| {
                    TrailError::Config(format!("Could not determine current directory: {}", e))
                })?,
            },
        };

        Ok(Self::new(root))
    }

    /// Same project root, different log directory name
    pub fn relocate_log_dir(&self, log_dir_name: impl Into<String>) -> Self {
        Self::with_log_dir(self.project_root.clone(), log_dir_name)
    }

    /// Get the project root
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the log directory (`<root>/log/`)
    pub fn log_dir(&self) -> PathBuf {
        self.project_root.join(&self.log_dir_name)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.project_root.join(SETTINGS_NAME)
    }

    /// Get the path to the encrypted, append-only history log
    pub fn encrypted_log(&self) -> PathBuf {
        self.log_dir().join(ENCRYPTED_LOG_NAME)
    }

    /// Get the path to the plaintext history log
    pub fn plaintext_log(&self) -> PathBuf {
        self.log_dir().join(PLAINTEXT_LOG_NAME)
    }

    /// Get the baseline snapshot path for a monitored file
    ///
    /// The baseline is named after the monitored file. Each output mode
    /// keeps its own baseline, so a plaintext commit never advances the
    /// comparison point of the encrypted log.
    pub fn baseline_file(&self, target: &Path, output: LogOutput) -> PathBuf {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "target".to_string());
        let suffix = match output {
            LogOutput::Encrypted => BASELINE_SUFFIX,
            LogOutput::Plaintext => PLAIN_BASELINE_SUFFIX,
        };
        self.log_dir().join(format!("{}{}", name, suffix))
    }

    /// Resolve a monitored file relative to the project root
    pub fn target_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(name)
    }
}
