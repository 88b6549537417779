//! Change logger for the append-only history
//!
//! Provides the ChangeLogger struct that commits a monitored file into the
//! history log. The first commit seals the full content; every later commit
//! seals a unified diff against the plaintext baseline, and unchanged
//! content writes nothing.
//!
//! The log is written before the baseline. A failure between the two
//! leaves the old baseline in place, so the next commit re-records the same
//! change instead of losing it.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::config::{LogOutput, Settings, TrailPaths};
use crate::crypto::{EntrySealer, HybridCipher, PlainSealer};
use crate::error::{TrailError, TrailResult};
use crate::storage::{ensure_dir, try_read_text, try_write, WriteMode};

use super::diff::{split_lines, unified_diff};
use super::entry::LogEntry;

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// No baseline existed; the full content was recorded
    Initial { log_bytes: usize },
    /// A diff against the baseline was appended
    Recorded { log_bytes: usize },
    /// Content matched the baseline; nothing was written
    Unchanged,
}

impl CommitOutcome {
    /// Whether anything was written to the log
    pub fn wrote_entry(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Commits a monitored file into the history log
pub struct ChangeLogger {
    paths: TrailPaths,
    output: LogOutput,
    sealer: Box<dyn EntrySealer>,
}

impl ChangeLogger {
    /// Create a logger for the given output mode
    ///
    /// Encrypted output seals entries under the embedded verifier key.
    pub fn new(paths: TrailPaths, output: LogOutput) -> TrailResult<Self> {
        let sealer: Box<dyn EntrySealer> = match output {
            LogOutput::Encrypted => Box::new(HybridCipher::embedded()?),
            LogOutput::Plaintext => Box::new(PlainSealer),
        };
        Ok(Self::with_sealer(paths, output, sealer))
    }

    /// Create a logger with a custom sealer
    pub fn with_sealer(
        paths: TrailPaths,
        output: LogOutput,
        sealer: Box<dyn EntrySealer>,
    ) -> Self {
        Self {
            paths,
            output,
            sealer,
        }
    }

    pub fn paths(&self) -> &TrailPaths {
        &self.paths
    }

    /// Path of the history log for this logger's output mode
    pub fn log_path(&self) -> PathBuf {
        match self.output {
            LogOutput::Encrypted => self.paths.encrypted_log(),
            LogOutput::Plaintext => self.paths.plaintext_log(),
        }
    }

    /// Baseline snapshot of `target` for this logger's output mode
    pub fn baseline_path(&self, target: &Path) -> PathBuf {
        self.paths.baseline_file(target, self.output)
    }

    fn log_mode(&self, append: bool) -> WriteMode {
        match (self.output, append) {
            (LogOutput::Encrypted, false) => WriteMode::BinaryOverwrite,
            (LogOutput::Encrypted, true) => WriteMode::BinaryAppend,
            (LogOutput::Plaintext, false) => WriteMode::Overwrite,
            (LogOutput::Plaintext, true) => WriteMode::Append,
        }
    }

    /// Commit the current content of `target`
    pub fn try_commit(&self, target: &Path) -> TrailResult<CommitOutcome> {
        ensure_dir(self.paths.log_dir())?;

        let current = try_read_text(target)?;
        let baseline_path = self.baseline_path(target);

        if !baseline_path.exists() {
            debug!(baseline = %baseline_path.display(), "no baseline, recording initial version");
            let file_name = target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| target.display().to_string());
            let entry = LogEntry::baseline(file_name, current.as_str());

            let log_bytes = self.record(&entry, false, &baseline_path, &current)?;
            return Ok(CommitOutcome::Initial { log_bytes });
        }

        let previous = try_read_text(&baseline_path)?;
        let previous_lines = split_lines(&previous);
        let current_lines = split_lines(&current);

        if previous_lines == current_lines {
            debug!(file = %target.display(), "content unchanged, nothing to record");
            return Ok(CommitOutcome::Unchanged);
        }

        let entry = LogEntry::delta(unified_diff(&previous_lines, &current_lines));
        let log_bytes = self.record(&entry, true, &baseline_path, &current)?;
        Ok(CommitOutcome::Recorded { log_bytes })
    }

    /// Seal an entry, write it to the log, then replace the baseline
    fn record(
        &self,
        entry: &LogEntry,
        append: bool,
        baseline_path: &Path,
        current: &str,
    ) -> TrailResult<usize> {
        let sealed = self.sealer.seal(entry.render().as_bytes())?;

        try_write(self.log_path(), &sealed, self.log_mode(append))?;
        try_write(baseline_path, current.as_bytes(), WriteMode::Overwrite)?;

        info!(entry = %entry.summary(), bytes = sealed.len(), "recorded change");
        Ok(sealed.len())
    }

    /// Commit `target`, reporting any failure as `false`
    ///
    /// The log is written before the baseline, so a failed commit can be
    /// retried without losing the change.
    pub fn commit(&self, target: &Path) -> bool {
        match self.try_commit(target) {
            Ok(_) => true,
            Err(e) => {
                error!(file = %target.display(), error = %e, "commit aborted");
                false
            }
        }
    }
}

/// Record changes to `target_file` into the encrypted log under
/// `project_root`
pub fn log_code_changes(target_file: &Path, project_root: &Path) -> bool {
    match ChangeLogger::new(TrailPaths::new(project_root), LogOutput::Encrypted) {
        Ok(logger) => logger.commit(target_file),
        Err(e) => {
            error!(error = %e, "could not set up change logger");
            false
        }
    }
}

/// Commit the monitored file named in `settings`
///
/// A missing monitored file is reported as [`TrailError::NotFound`] before
/// anything is touched. A file that disappears during the commit is a
/// [`TrailError::Consistency`] error.
pub fn commit_changes(paths: &TrailPaths, settings: &Settings) -> TrailResult<CommitOutcome> {
    let target = paths.target_file(&settings.target_file);
    if !target.is_file() {
        return Err(TrailError::NotFound {
            path: target.display().to_string(),
        });
    }

    let paths = paths.relocate_log_dir(settings.log_dir.as_str());
    let logger = ChangeLogger::new(paths, settings.output)?;
    commit_existing(&logger, &target)
}

/// Commit a target already known to exist
///
/// Losing the target between that check and the read is an internal
/// inconsistency rather than a plain missing file.
fn commit_existing(logger: &ChangeLogger, target: &Path) -> TrailResult<CommitOutcome> {
    logger.try_commit(target).map_err(|e| {
        if e.is_not_found() && !target.exists() {
            TrailError::Consistency(format!("{} disappeared during commit", target.display()))
        } else {
            e
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::split_envelopes;
    use crate::crypto::test_support::{open_log, test_cipher};
    use std::fs;
    use tempfile::TempDir;

    struct FailingSealer;

    impl EntrySealer for FailingSealer {
        fn seal(&self, _entry: &[u8]) -> TrailResult<Vec<u8>> {
            Err(TrailError::Crypto("backend unavailable".into()))
        }
    }

    fn create_test_logger() -> (ChangeLogger, PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = ChangeLogger::with_sealer(
            TrailPaths::new(temp_dir.path()),
            LogOutput::Encrypted,
            Box::new(test_cipher()),
        );
        let target = temp_dir.path().join("main.py");
        (logger, target, temp_dir)
    }

    fn read_log(logger: &ChangeLogger) -> Vec<u8> {
        fs::read(logger.log_path()).unwrap()
    }

    fn baseline(logger: &ChangeLogger, target: &Path) -> String {
        fs::read_to_string(logger.baseline_path(target)).unwrap()
    }

    #[test]
    fn test_first_commit_records_full_content() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\nb\nc\n").unwrap();

        let outcome = logger.try_commit(&target).unwrap();
        assert!(matches!(outcome, CommitOutcome::Initial { .. }));

        assert_eq!(baseline(&logger, &target), "a\nb\nc\n");

        let entries = open_log(&read_log(&logger));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("=== Code Change Tracking Started at "));
        assert!(entries[0].contains("=== Initial version of main.py ===\n\na\nb\nc\n"));
    }

    #[test]
    fn test_unchanged_content_is_a_no_op() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\nb\nc\n").unwrap();

        assert!(logger.commit(&target));
        let after_first = read_log(&logger);

        let outcome = logger.try_commit(&target).unwrap();
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert!(!outcome.wrote_entry());

        assert_eq!(read_log(&logger), after_first);
        assert_eq!(open_log(&after_first).len(), 1);
        assert_eq!(baseline(&logger, &target), "a\nb\nc\n");
    }

    #[test]
    fn test_incremental_commit_appends_diff() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\nb\nc\n").unwrap();
        assert!(logger.commit(&target));
        let first = read_log(&logger);

        fs::write(&target, "a\nX\nc\n").unwrap();
        let outcome = logger.try_commit(&target).unwrap();
        assert!(matches!(outcome, CommitOutcome::Recorded { .. }));

        let log = read_log(&logger);
        assert_eq!(&log[..first.len()], first.as_slice());

        let entries = open_log(&log);
        assert_eq!(entries.len(), 2);
        assert!(entries[1].starts_with("\n\n=== Code changes at "));
        assert!(entries[1].contains("--- previous version\n+++ current version\n"));
        assert!(entries[1].contains(" a\n-b\n+X\n c\n"));

        assert_eq!(baseline(&logger, &target), "a\nX\nc\n");
    }

    #[test]
    fn test_log_grows_by_whole_envelopes() {
        let (logger, target, _temp) = create_test_logger();
        let mut sizes = Vec::new();

        for i in 0..4 {
            fs::write(&target, format!("version {}\n", i)).unwrap();
            match logger.try_commit(&target).unwrap() {
                CommitOutcome::Initial { log_bytes } | CommitOutcome::Recorded { log_bytes } => {
                    sizes.push(log_bytes)
                }
                CommitOutcome::Unchanged => panic!("every version differs"),
            }
            assert_eq!(read_log(&logger).len(), sizes.iter().sum::<usize>());
        }

        let envelopes = split_envelopes(&read_log(&logger), 256).unwrap();
        assert_eq!(envelopes.len(), 4);
        for (envelope, size) in envelopes.iter().zip(&sizes) {
            assert_eq!(envelope.encoded_len(), *size);
        }
        assert_eq!(baseline(&logger, &target), "version 3\n");
    }

    #[test]
    fn test_empty_baseline_is_incremental() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "").unwrap();
        assert!(matches!(
            logger.try_commit(&target).unwrap(),
            CommitOutcome::Initial { .. }
        ));

        fs::write(&target, "a\nb\n").unwrap();
        assert!(matches!(
            logger.try_commit(&target).unwrap(),
            CommitOutcome::Recorded { .. }
        ));

        let entries = open_log(&read_log(&logger));
        assert!(entries[1].contains("@@ -0,0 +1,2 @@\n+a\n+b\n"));
    }

    #[test]
    fn test_missing_baseline_restarts_log() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "one\n").unwrap();
        assert!(logger.commit(&target));
        fs::write(&target, "two\n").unwrap();
        assert!(logger.commit(&target));

        fs::remove_file(logger.baseline_path(&target)).unwrap();
        assert!(logger.commit(&target));

        let entries = open_log(&read_log(&logger));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].contains("Initial version of main.py"));
        assert!(entries[0].ends_with("two\n"));
    }

    #[test]
    fn test_missing_target_fails_without_writes() {
        let (logger, target, _temp) = create_test_logger();

        let err = logger.try_commit(&target).unwrap_err();
        assert!(err.is_not_found());
        assert!(!logger.commit(&target));
        assert!(!logger.log_path().exists());
        assert!(!logger.baseline_path(&target).exists());
    }

    #[test]
    fn test_seal_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let logger = ChangeLogger::with_sealer(
            TrailPaths::new(temp_dir.path()),
            LogOutput::Encrypted,
            Box::new(FailingSealer),
        );
        let target = temp_dir.path().join("main.py");
        fs::write(&target, "a\n").unwrap();

        assert!(!logger.commit(&target));
        assert!(!logger.log_path().exists());
        assert!(!logger.baseline_path(&target).exists());
    }

    #[test]
    fn test_failed_append_keeps_old_baseline() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\n").unwrap();
        assert!(logger.commit(&target));

        fs::remove_file(logger.log_path()).unwrap();
        fs::create_dir(logger.log_path()).unwrap();

        fs::write(&target, "b\n").unwrap();
        assert!(!logger.commit(&target));
        assert_eq!(baseline(&logger, &target), "a\n");
    }

    #[test]
    fn test_unreadable_baseline_fails() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\n").unwrap();
        fs::create_dir_all(logger.baseline_path(&target)).unwrap();

        assert!(!logger.commit(&target));
        assert!(!logger.log_path().exists());
    }

    #[test]
    fn test_plaintext_output() {
        let temp_dir = TempDir::new().unwrap();
        let logger =
            ChangeLogger::new(TrailPaths::new(temp_dir.path()), LogOutput::Plaintext).unwrap();
        let target = temp_dir.path().join("main.py");

        fs::write(&target, "a\n").unwrap();
        assert!(logger.commit(&target));
        fs::write(&target, "b\n").unwrap();
        assert!(logger.commit(&target));

        let log = fs::read_to_string(temp_dir.path().join("log").join("history.log")).unwrap();
        assert!(log.contains("=== Initial version of main.py ===\n\na\n"));
        assert!(log.contains("\n\n=== Code changes at "));
        assert!(log.ends_with("-a\n+b\n"));
        assert!(!temp_dir.path().join("log").join("history.log.encrypted").exists());
    }

    #[test]
    fn test_log_code_changes_with_embedded_key() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("main.py");
        fs::write(&target, "print('hi')\n").unwrap();

        assert!(log_code_changes(&target, temp_dir.path()));
        assert!(log_code_changes(&target, temp_dir.path()));

        let paths = TrailPaths::new(temp_dir.path());
        let log = fs::read(paths.encrypted_log()).unwrap();
        assert_eq!(split_envelopes(&log, 256).unwrap().len(), 1);
        assert_eq!(
            fs::read_to_string(paths.baseline_file(&target, LogOutput::Encrypted)).unwrap(),
            "print('hi')\n"
        );
    }

    #[test]
    fn test_commit_changes_missing_target() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrailPaths::new(temp_dir.path());

        let err = commit_changes(&paths, &Settings::default()).unwrap_err();
        assert!(err.is_not_found());
        assert!(!paths.log_dir().exists());
    }

    #[test]
    fn test_commit_changes_uses_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrailPaths::new(temp_dir.path());
        fs::write(temp_dir.path().join("app.rs"), "fn main() {}\n").unwrap();

        let settings = Settings {
            output: LogOutput::Plaintext,
            target_file: "app.rs".to_string(),
            log_dir: "trail".to_string(),
        };

        let outcome = commit_changes(&paths, &settings).unwrap();
        assert!(matches!(outcome, CommitOutcome::Initial { .. }));
        assert!(temp_dir.path().join("trail").join("history.log").exists());
        assert!(temp_dir.path().join("trail").join("app.rs.plain.backup").exists());
        assert!(!temp_dir.path().join("trail").join("app.rs.backup").exists());

        assert_eq!(
            commit_changes(&paths, &settings).unwrap(),
            CommitOutcome::Unchanged
        );
    }

    #[test]
    fn test_plaintext_commit_does_not_hide_changes_from_encrypted_log() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrailPaths::new(temp_dir.path());
        let target = temp_dir.path().join("main.py");
        let encrypted = ChangeLogger::with_sealer(
            paths.clone(),
            LogOutput::Encrypted,
            Box::new(test_cipher()),
        );
        let plaintext = ChangeLogger::new(paths, LogOutput::Plaintext).unwrap();

        fs::write(&target, "v1\n").unwrap();
        assert!(matches!(
            encrypted.try_commit(&target).unwrap(),
            CommitOutcome::Initial { .. }
        ));

        fs::write(&target, "v2\n").unwrap();
        assert!(matches!(
            plaintext.try_commit(&target).unwrap(),
            CommitOutcome::Initial { .. }
        ));

        fs::write(&target, "v3\n").unwrap();
        assert!(matches!(
            encrypted.try_commit(&target).unwrap(),
            CommitOutcome::Recorded { .. }
        ));

        let entries = open_log(&read_log(&encrypted));
        assert_eq!(entries.len(), 2);
        assert!(entries[1].contains("-v1\n+v3\n"));
        assert_eq!(baseline(&encrypted, &target), "v3\n");

        let plain_log = fs::read_to_string(plaintext.log_path()).unwrap();
        assert!(plain_log.contains("=== Initial version of main.py ===\n\nv2\n"));
        assert_eq!(baseline(&plaintext, &target), "v2\n");
    }

    #[test]
    fn test_target_vanishing_mid_commit_is_consistency_error() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\n").unwrap();
        assert!(target.is_file());
        fs::remove_file(&target).unwrap();

        let err = commit_existing(&logger, &target).unwrap_err();
        assert!(matches!(err, TrailError::Consistency(_)));
        assert!(err.to_string().contains("disappeared during commit"));
        assert!(!logger.log_path().exists());
    }

    #[test]
    fn test_commit_existing_passes_other_errors_through() {
        let (logger, target, _temp) = create_test_logger();
        fs::write(&target, "a\n").unwrap();
        fs::create_dir_all(logger.baseline_path(&target)).unwrap();

        let err = commit_existing(&logger, &target).unwrap_err();
        assert!(!matches!(err, TrailError::Consistency(_)));
    }
}
