//! Safe file writer: temp file + fsync, backup of the previous file, atomic rename.
//!
//! The staged file lives in the destination directory so the final rename
//! never crosses filesystems. Until it is persisted the staged file is owned
//! by a [`tempfile::NamedTempFile`], which deletes it when dropped; every
//! early return therefore cleans up after itself and the destination keeps
//! its previous content.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lovelace_app::ports::{DocumentSink, WriteOutcome};
use lovelace_domain::error::WriteError;

pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Replaces a file atomically, keeping the previous version as a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileWriter {
    destination: PathBuf,
    backup_suffix: String,
}

impl SafeFileWriter {
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }

    #[must_use]
    pub fn backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// `<destination file name><suffix>`, next to the destination.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .destination
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(&self.backup_suffix);
        self.destination.with_file_name(name)
    }

    fn staging_dir(&self) -> PathBuf {
        match self.destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn staging_prefix(&self) -> String {
        let name = self
            .destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(".{name}.")
    }
}

impl DocumentSink for SafeFileWriter {
    #[tracing::instrument(skip_all, fields(path = %self.destination.display()))]
    fn write(&mut self, document: &str) -> Result<WriteOutcome, WriteError> {
        let dir = self.staging_dir();
        let staging_error = |source: io::Error| WriteError::TempFile {
            dir: dir.clone(),
            source,
        };

        let mut staged = tempfile::Builder::new()
            .prefix(&self.staging_prefix())
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(staging_error)?;
        staged
            .write_all(document.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(staging_error)?;

        let backup = match fs::metadata(&self.destination) {
            Ok(previous) => {
                let backup = self.backup_path();
                fs::copy(&self.destination, &backup).map_err(|source| WriteError::Backup {
                    path: backup.clone(),
                    source,
                })?;
                fs::set_permissions(staged.path(), previous.permissions())
                    .map_err(staging_error)?;
                tracing::debug!(backup = %backup.display(), "previous output backed up");
                Some(backup)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(WriteError::Backup {
                    path: self.backup_path(),
                    source,
                });
            }
        };

        staged
            .persist(&self.destination)
            .map_err(|err| WriteError::Persist {
                path: self.destination.clone(),
                source: err.error,
            })?;
        tracing::info!(bytes = document.len(), "configuration written");

        Ok(WriteOutcome::Written {
            path: self.destination.clone(),
            backup,
        })
    }
}
