//! Configuration module for edit-trail
//!
//! This module provides configuration management including:
//! - Project-root and log-file path resolution
//! - Settings persistence (output mode, monitored file, log directory)

pub mod paths;
pub mod settings;

pub use paths::TrailPaths;
pub use settings::{LogOutput, Settings};
