//! Log entry data structures
//!
//! Defines the two kinds of history entries and the exact text that gets
//! sealed into the log for each.

use chrono::{DateTime, Local};

/// Timestamp format used inside entry headers
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kinds of history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Full content at first observation
    Baseline,
    /// Unified diff against the previous baseline
    Delta,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Baseline => write!(f, "BASELINE"),
            EntryKind::Delta => write!(f, "DELTA"),
        }
    }
}

/// A single timestamped history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Baseline {
        timestamp: DateTime<Local>,
        /// Display name of the monitored file
        file_name: String,
        content: String,
    },
    Delta {
        timestamp: DateTime<Local>,
        /// Unified diff lines, each carrying its own terminator
        diff: Vec<String>,
    },
}

impl LogEntry {
    /// Create a baseline entry stamped now
    pub fn baseline(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Baseline {
            timestamp: Local::now(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Create a delta entry stamped now
    pub fn delta(diff: Vec<String>) -> Self {
        Self::Delta {
            timestamp: Local::now(),
            diff,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Baseline { .. } => EntryKind::Baseline,
            Self::Delta { .. } => EntryKind::Delta,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            Self::Baseline { timestamp, .. } | Self::Delta { timestamp, .. } => *timestamp,
        }
    }

    /// The text that is sealed into the history log
    ///
    /// Delta entries start with a blank-line separator so that a decrypted
    /// log reads as one continuous document.
    pub fn render(&self) -> String {
        let stamp = self.timestamp().format(TIMESTAMP_FORMAT);
        match self {
            Self::Baseline {
                file_name, content, ..
            } => format!(
                "=== Code Change Tracking Started at {} ===\n\
                 === Initial version of {} ===\n\n\
                 {}",
                stamp, file_name, content
            ),
            Self::Delta { diff, .. } => {
                format!("\n\n=== Code changes at {} ===\n{}", stamp, diff.concat())
            }
        }
    }

    /// One-line description for diagnostics
    pub fn summary(&self) -> String {
        let stamp = self.timestamp().format(TIMESTAMP_FORMAT);
        match self {
            Self::Baseline {
                file_name, content, ..
            } => format!(
                "[{}] {} {} ({} bytes)",
                stamp,
                self.kind(),
                file_name,
                content.len()
            ),
            Self::Delta { diff, .. } => {
                let added = count_prefixed(diff, '+');
                let removed = count_prefixed(diff, '-');
                format!("[{}] {} +{} -{}", stamp, self.kind(), added, removed)
            }
        }
    }
}

/// Count body lines with a prefix, skipping the `---`/`+++` headers
fn count_prefixed(diff: &[String], prefix: char) -> usize {
    diff.iter()
        .skip(2)
        .filter(|line| line.starts_with(prefix))
        .count()
}
