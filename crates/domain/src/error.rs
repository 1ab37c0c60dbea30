//! Common error types used across the workspace.
//!
//! Each concern owns a typed error; [`MigrateError`] unifies them through
//! `#[from]` so the use-case layer can propagate with `?`.

use std::path::PathBuf;

/// Top-level error of a migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The states snapshot does not match the expected entity schema.
    #[error("malformed input")]
    MalformedInput(#[from] MalformedInputError),

    /// The states (or config) could not be acquired.
    #[error("failed to acquire input")]
    Source(#[from] SourceError),

    /// The configuration tree could not be serialized.
    #[error("failed to render configuration")]
    Render(#[from] RenderError),

    /// The rendered document could not be written.
    #[error("failed to write configuration")]
    Write(#[from] WriteError),
}

impl MigrateError {
    /// Whether the run failed because credentials are missing or rejected.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Source(err) if err.is_auth())
    }
}

/// The input structure violates the expected entity schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInputError {
    /// Top-level value is neither a list nor a mapping.
    #[error("expected a list or mapping of entity states, got {found}")]
    NotACollection {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// A state record is not a JSON object.
    #[error("state record {record} is not an object")]
    NotAnObject {
        /// Position (`#3`) or key of the offending record.
        record: String,
    },

    /// A list record has no string `entity_id` field.
    #[error("state record {record} has no string `entity_id`")]
    MissingEntityId {
        /// Position of the offending record.
        record: String,
    },

    /// The id is not of the form `domain.object_id`.
    #[error("invalid entity id {id:?}: expected `domain.object_id`")]
    InvalidEntityId {
        /// The rejected id.
        id: String,
    },

    /// Two records share the same id.
    #[error("duplicate entity id {id:?}")]
    DuplicateEntityId {
        /// The repeated id.
        id: String,
    },
}

/// Failure to acquire the states snapshot or the configuration title.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The endpoint requires credentials and none were supplied.
    #[error("{url} requires authentication")]
    AuthRequired {
        /// Requested URL.
        url: String,
    },

    /// The endpoint rejected the supplied credentials.
    #[error("{url} rejected the supplied credentials")]
    AuthFailed {
        /// Requested URL.
        url: String,
    },

    /// The input file does not exist.
    #[error("{}: no such file", path.display())]
    NotFound {
        /// Input path.
        path: PathBuf,
    },

    /// The input file cannot be read by the current user.
    #[error("{}: permission denied", path.display())]
    PermissionDenied {
        /// Input path.
        path: PathBuf,
    },

    /// Any other read failure.
    #[error("failed to read {origin}")]
    Io {
        /// File path or `<stdin>`.
        origin: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{url} answered with HTTP status {status}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The endpoint could not be reached.
    #[error("failed to reach {url}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The payload is not valid JSON.
    #[error("{origin} did not return valid JSON")]
    InvalidJson {
        /// URL, file path or `<stdin>`.
        origin: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    /// Whether a collaborator may recover by prompting for credentials.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired { .. } | Self::AuthFailed { .. })
    }
}

/// Failure to turn the configuration tree into text, or text back into a tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Serialization failure.
    #[error("failed to serialize configuration")]
    Serialize(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Parse failure.
    #[error("failed to parse configuration")]
    Parse(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure to write the rendered document.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The temporary file next to the destination could not be created or written.
    #[error("failed to stage output in {}", dir.display())]
    TempFile {
        /// Directory of the destination.
        dir: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The previous destination could not be preserved.
    #[error("failed to back up previous output to {}", path.display())]
    Backup {
        /// Backup path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The staged file could not replace the destination.
    #[error("failed to replace {}", path.display())]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The console sink could not be written.
    #[error("failed to write to the console")]
    Console(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_flag_auth_errors() {
        let required: MigrateError = SourceError::AuthRequired {
            url: "http://hass:8123/api/states".to_string(),
        }
        .into();
        let failed: MigrateError = SourceError::AuthFailed {
            url: "http://hass:8123/api/states".to_string(),
        }
        .into();
        assert!(required.is_auth());
        assert!(failed.is_auth());
    }

    #[test]
    fn should_not_flag_other_errors_as_auth() {
        let err: MigrateError = SourceError::Http {
            url: "http://hass:8123/api/states".to_string(),
            status: 500,
        }
        .into();
        assert!(!err.is_auth());

        let err: MigrateError = MalformedInputError::NotACollection { found: "string" }.into();
        assert!(!err.is_auth());
    }

    #[test]
    fn should_display_file_errors_with_path() {
        let err = SourceError::NotFound {
            path: PathBuf::from("states.json"),
        };
        assert_eq!(err.to_string(), "states.json: no such file");
    }

    #[test]
    fn should_display_invalid_entity_id() {
        let err = MalformedInputError::InvalidEntityId {
            id: "kitchen".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid entity id \"kitchen\": expected `domain.object_id`"
        );
    }
}
