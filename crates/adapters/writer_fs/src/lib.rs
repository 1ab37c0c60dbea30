//! # lovelace-adapter-writer-fs
//!
//! Filesystem and console sinks for the rendered dashboard.
//!
//! ## Responsibilities
//! - Implement the `DocumentSink` port defined in `lovelace-app::ports`
//! - Stage output in a temp file next to the destination, back up the
//!   previous file, then atomically rename ([`SafeFileWriter`])
//! - Print the document instead in dry-run mode ([`ConsoleSink`])
//!
//! ## Dependency rule
//! Depends on `lovelace-app` (for the port trait) and `lovelace-domain` (for
//! error types). The `app` and `domain` crates must never reference this adapter.

pub mod console;
pub mod file;

use std::io;
use std::path::PathBuf;

use lovelace_app::ports::{DocumentSink, WriteOutcome};
use lovelace_domain::error::WriteError;

pub use console::ConsoleSink;
pub use file::{DEFAULT_BACKUP_SUFFIX, SafeFileWriter};

/// The sink selected at startup: the output file, or stdout for a dry run.
#[derive(Debug)]
pub enum OutputSink {
    File(SafeFileWriter),
    DryRun(ConsoleSink<io::Stdout>),
}

impl OutputSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, backup_suffix: &str, dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun(ConsoleSink::stdout())
        } else {
            Self::File(SafeFileWriter::new(path).backup_suffix(backup_suffix))
        }
    }
}

impl DocumentSink for OutputSink {
    fn write(&mut self, document: &str) -> Result<WriteOutcome, WriteError> {
        match self {
            Self::File(writer) => writer.write(document),
            Self::DryRun(console) => console.write(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_select_console_for_dry_run() {
        let sink = OutputSink::new("ui-lovelace.yaml", ".bak", true);
        assert!(matches!(sink, OutputSink::DryRun(_)));
    }

    #[test]
    fn should_select_file_writer_otherwise() {
        let sink = OutputSink::new("ui-lovelace.yaml", ".orig", false);
        let OutputSink::File(writer) = sink else {
            panic!("expected a file writer");
        };
        assert_eq!(writer.backup_path(), PathBuf::from("ui-lovelace.yaml.orig"));
    }

    #[test]
    fn should_not_touch_filesystem_in_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui-lovelace.yaml");

        let outcome = OutputSink::new(&path, ".bak", true)
            .write("title: Home\n")
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Printed);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn should_leave_existing_destination_untouched_in_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui-lovelace.yaml");
        std::fs::write(&path, "title: Hand made\n").unwrap();
        let listing = |dir: &std::path::Path| {
            let mut names: Vec<_> = std::fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().file_name())
                .collect();
            names.sort();
            names
        };
        let before = listing(dir.path());

        let outcome = OutputSink::new(&path, ".bak", true)
            .write("title: Home\n")
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Printed);
        assert_eq!(std::fs::read(&path).unwrap(), b"title: Hand made\n");
        assert!(!dir.path().join("ui-lovelace.yaml.bak").exists());
        assert_eq!(listing(dir.path()), before);
    }
}
