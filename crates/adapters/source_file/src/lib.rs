//! # lovelace-adapter-source-file
//!
//! States source backed by a JSON dump on disk or piped through stdin.
//!
//! ## Responsibilities
//! - Implement the `StatesSource` port defined in `lovelace-app::ports`
//! - Map IO failures to `SourceError` variants carrying the path
//!
//! A dump carries no configuration, so the location name is always `None`.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use lovelace_app::ports::StatesSource;
use lovelace_domain::error::SourceError;

/// Argument value selecting standard input.
pub const STDIN_ARG: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Stdin,
    Path(PathBuf),
}

/// Reads the states payload from a file, or from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatesSource {
    input: Input,
}

impl FileStatesSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            input: Input::Path(path.into()),
        }
    }

    #[must_use]
    pub fn stdin() -> Self {
        Self {
            input: Input::Stdin,
        }
    }

    /// `-` selects stdin, anything else is a path.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == STDIN_ARG {
            Self::stdin()
        } else {
            Self::new(arg)
        }
    }

    fn read(&self) -> Result<String, SourceError> {
        match &self.input {
            Input::Stdin => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(|source| SourceError::Io {
                        origin: self.describe(),
                        source,
                    })?;
                Ok(buffer)
            }
            Input::Path(path) => fs::read_to_string(path).map_err(|err| map_io_error(path, err)),
        }
    }
}

impl StatesSource for FileStatesSource {
    fn describe(&self) -> String {
        match &self.input {
            Input::Stdin => "<stdin>".to_string(),
            Input::Path(path) => path.display().to_string(),
        }
    }

    fn fetch_states(&self) -> Result<serde_json::Value, SourceError> {
        let raw = self.read()?;
        tracing::debug!(origin = %self.describe(), bytes = raw.len(), "states read");
        serde_json::from_str(&raw).map_err(|source| SourceError::InvalidJson {
            origin: self.describe(),
            source,
        })
    }

    fn fetch_location_name(&self) -> Result<Option<String>, SourceError> {
        Ok(None)
    }
}

fn map_io_error(path: &Path, err: io::Error) -> SourceError {
    match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io {
            origin: path.display().to_string(),
            source: err,
        },
    }
}
