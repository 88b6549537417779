//! Scoped file I/O with uniform failure handling
//!
//! The `try_*` functions return a [`TrailResult`] classified into missing,
//! permission-denied, and generic I/O errors. The plain `read`/`write`
//! wrappers log that classification and collapse it into `None`/`false`,
//! so callers branch on success rather than on error kinds.
//!
//! Files are opened, used, and closed within a single call; nothing is
//! retried.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::warn;

use crate::error::{TrailError, TrailResult};

/// How a write should open its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file with UTF-8 text
    Overwrite,
    /// Append UTF-8 text, creating the file if needed
    Append,
    /// Replace the file with raw bytes
    BinaryOverwrite,
    /// Append raw bytes, creating the file if needed
    BinaryAppend,
}

impl WriteMode {
    pub fn is_append(self) -> bool {
        matches!(self, Self::Append | Self::BinaryAppend)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Self::BinaryOverwrite | Self::BinaryAppend)
    }
}

/// Content read from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// The text, if this was a text read
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

/// Read a whole file, as UTF-8 text or raw bytes
pub fn try_read<P: AsRef<Path>>(path: P, binary: bool) -> TrailResult<FileContent> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| TrailError::from_io(e, path))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| TrailError::from_io(e, path))?;

    if binary {
        return Ok(FileContent::Binary(bytes));
    }

    String::from_utf8(bytes)
        .map(FileContent::Text)
        .map_err(|e| TrailError::Io(format!("{} is not valid UTF-8: {}", path.display(), e)))
}

/// Read a whole UTF-8 text file
pub fn try_read_text<P: AsRef<Path>>(path: P) -> TrailResult<String> {
    let path = path.as_ref();
    try_read(path, false)?
        .into_text()
        .ok_or_else(|| TrailError::Consistency(format!("Expected text from {}", path.display())))
}

/// Write content with the given mode
///
/// Overwrites go through a temp file in the same directory followed by a
/// rename, so the target is either fully replaced or left untouched.
/// Appends write the whole buffer and flush before returning.
pub fn try_write<P: AsRef<Path>>(path: P, content: &[u8], mode: WriteMode) -> TrailResult<()> {
    let path = path.as_ref();

    if !mode.is_binary() && std::str::from_utf8(content).is_err() {
        return Err(TrailError::Io(format!(
            "Refusing to write non-UTF-8 content to {} in text mode",
            path.display()
        )));
    }

    if mode.is_append() {
        append(path, content)
    } else {
        overwrite_atomic(path, content)
    }
}

fn append(path: &Path, content: &[u8]) -> TrailResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TrailError::from_io(e, path))?;

    file.write_all(content)
        .map_err(|e| TrailError::from_io(e, path))?;
    file.flush().map_err(|e| TrailError::from_io(e, path))?;

    Ok(())
}

fn overwrite_atomic(path: &Path, content: &[u8]) -> TrailResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TrailError::Io(format!("Not a file path: {}", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path).map_err(|e| TrailError::from_io(e, &temp_path))?;
    let mut writer = BufWriter::new(file);

    let written = writer
        .write_all(content)
        .and_then(|_| writer.flush())
        .and_then(|_| writer.get_ref().sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(TrailError::from_io(e, &temp_path));
    }
    drop(writer);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TrailError::from_io(e, path)
    })
}

/// Create a directory and its parents; an existing directory is success
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> TrailResult<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| TrailError::from_io(e, path))
}

/// Read a file, logging and swallowing any failure
pub fn read<P: AsRef<Path>>(path: P, binary: bool) -> Option<FileContent> {
    let path = path.as_ref();
    try_read(path, binary).map_err(|e| report(&e, path)).ok()
}

/// Read a UTF-8 text file, logging and swallowing any failure
pub fn read_text<P: AsRef<Path>>(path: P) -> Option<String> {
    read(path, false).and_then(FileContent::into_text)
}

/// Write a file, logging any failure and reporting success as a bool
pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C, mode: WriteMode) -> bool {
    let path = path.as_ref();
    match try_write(path, content.as_ref(), mode) {
        Ok(()) => true,
        Err(e) => {
            report(&e, path);
            false
        }
    }
}

fn report(err: &TrailError, path: &Path) {
    match err {
        TrailError::NotFound { .. } => warn!(path = %path.display(), "file not found"),
        TrailError::PermissionDenied { .. } => {
            warn!(path = %path.display(), "permission denied")
        }
        other => warn!(path = %path.display(), error = %other, "file operation failed"),
    }
}
