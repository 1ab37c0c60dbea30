//! Input selection: REST API, dump file, or stdin.

use lovelace_adapter_source_file::{FileStatesSource, STDIN_ARG};
use lovelace_adapter_source_http::{Credentials, HttpStatesSource, is_url};
use lovelace_app::ports::StatesSource;
use lovelace_domain::error::SourceError;

use crate::config::SourceConfig;

/// The states source chosen from the command line.
#[derive(Debug, Clone)]
pub enum Input {
    File(FileStatesSource),
    Http(HttpStatesSource),
}

impl Input {
    /// A URL argument selects the API; so does `-` when API location flags
    /// were given. Anything else is a dump file (`-` for stdin).
    #[must_use]
    pub fn select(arg: &str, source: &SourceConfig, targets_api: bool, credentials: Credentials) -> Self {
        if is_url(arg) {
            Self::Http(HttpStatesSource::new(arg, credentials))
        } else if arg == STDIN_ARG && targets_api {
            Self::Http(HttpStatesSource::from_parts(
                &source.scheme,
                &source.host,
                source.port,
                &source.endpoint,
                credentials,
            ))
        } else {
            Self::File(FileStatesSource::from_arg(arg))
        }
    }

    /// Replace the credentials of an API input; files are returned unchanged.
    #[must_use]
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        match self {
            Self::Http(source) => Self::Http(source.with_credentials(credentials)),
            file @ Self::File(_) => file,
        }
    }
}

impl StatesSource for Input {
    fn describe(&self) -> String {
        match self {
            Self::File(source) => source.describe(),
            Self::Http(source) => source.describe(),
        }
    }

    fn fetch_states(&self) -> Result<serde_json::Value, SourceError> {
        match self {
            Self::File(source) => source.fetch_states(),
            Self::Http(source) => source.fetch_states(),
        }
    }

    fn fetch_location_name(&self) -> Result<Option<String>, SourceError> {
        match self {
            Self::File(source) => source.fetch_location_name(),
            Self::Http(source) => source.fetch_location_name(),
        }
    }
}
