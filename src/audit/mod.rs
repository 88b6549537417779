//! Change tracking for a monitored file
//!
//! Records every committed version of a file into an append-only history
//! log, as a full snapshot the first time and as a unified diff afterwards.
//!
//! # Architecture
//!
//! The audit system consists of three components:
//!
//! - `LogEntry`: A timestamped baseline or delta entry and the text it renders to.
//! - `ChangeLogger`: Decides between initial and incremental commits, seals
//!   the entry, appends it to the log, and replaces the plaintext baseline.
//! - `unified_diff`: Full-context line diff between the baseline and the
//!   current content.
//!
//! # Example
//!
//! ```rust,ignore
//! use edit_trail::audit::{ChangeLogger, CommitOutcome};
//! use edit_trail::config::{LogOutput, TrailPaths};
//!
//! let logger = ChangeLogger::new(TrailPaths::new(project_root), LogOutput::Encrypted)?;
//! match logger.try_commit(&project_root.join("main.py"))? {
//!     CommitOutcome::Unchanged => println!("nothing to record"),
//!     _ => println!("recorded"),
//! }
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{reconstruct, split_lines, unified_diff, CURRENT_LABEL, PREVIOUS_LABEL};
pub use entry::{EntryKind, LogEntry, TIMESTAMP_FORMAT};
pub use logger::{commit_changes, log_code_changes, ChangeLogger, CommitOutcome};
