//! Storage layer for edit-trail
//!
//! Scoped reads and writes over text and binary files with atomic
//! overwrites and idempotent directory creation.

pub mod file_io;

pub use file_io::{
    ensure_dir, read, read_text, try_read, try_read_text, try_write, write, FileContent, WriteMode,
};
