//! edit-trail - Encrypted, append-only change tracking for a source file
//!
//! Watches a single file under a project root. The first commit stores its
//! full content; later commits store a unified diff against the last
//! recorded version. Entries are sealed with hybrid RSA-OAEP + AES-256-CBC
//! encryption so only the holder of the verifier's private key can read the
//! history, while a plaintext baseline is kept for the next comparison.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Project-root paths and settings
//! - `error`: Custom error types
//! - `storage`: Scoped file reads and writes
//! - `crypto`: Hybrid envelope encryption and the envelope wire format
//! - `audit`: Diffing, log entries, and the change logger
//!
//! # Example
//!
//! ```rust,ignore
//! use edit_trail::audit::commit_changes;
//! use edit_trail::config::{Settings, TrailPaths};
//!
//! let paths = TrailPaths::resolve(None)?;
//! let settings = Settings::load_or_default(&paths)?;
//! commit_changes(&paths, &settings)?;
//! ```

pub mod audit;
pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;

pub use error::{TrailError, TrailResult};
