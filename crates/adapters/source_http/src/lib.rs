//! # lovelace-adapter-source-http
//!
//! States source talking to the Home Assistant REST API with
//! [ureq](https://docs.rs/ureq).
//!
//! ## Responsibilities
//! - Implement the `StatesSource` port defined in `lovelace-app::ports`
//! - `GET <base>/states` for the snapshot, `GET <base>/config` for the
//!   location name
//! - Authenticate with the legacy `x-ha-access` password header or a bearer
//!   token
//! - Map HTTP statuses and transport failures to `SourceError`; a 401 is
//!   `AuthRequired` without credentials and `AuthFailed` with them
//!
//! Calls are blocking and never retried here.

use std::time::Duration;

use lovelace_app::ports::StatesSource;
use lovelace_domain::error::SourceError;
use serde_json::Value;

pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8123;
pub const DEFAULT_ENDPOINT: &str = "/api";

const PASSWORD_HEADER: &str = "x-ha-access";
const TIMEOUT: Duration = Duration::from_secs(30);

/// How requests are authenticated.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    /// API password, sent as `x-ha-access`.
    Password(String),
    /// Long-lived access token, sent as `Authorization: Bearer`.
    Token(String),
}

impl Credentials {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Password(_) => f.write_str("Password(***)"),
            Self::Token(_) => f.write_str("Token(***)"),
        }
    }
}

/// Whether `input` names an HTTP API rather than a file.
#[must_use]
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Fetches states over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatesSource {
    base_url: String,
    credentials: Credentials,
    agent: ureq::Agent,
}

impl HttpStatesSource {
    /// Source rooted at a full API base URL such as `http://hass.local:8123/api`.
    #[must_use]
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
        }
    }

    /// Source rooted at `<scheme>://<host>:<port><endpoint>`.
    #[must_use]
    pub fn from_parts(
        scheme: &str,
        host: &str,
        port: u16,
        endpoint: &str,
        credentials: Credentials,
    ) -> Self {
        let endpoint = endpoint.trim_matches('/');
        let base_url = if endpoint.is_empty() {
            format!("{scheme}://{host}:{port}")
        } else {
            format!("{scheme}://{host}:{port}/{endpoint}")
        };
        Self::new(&base_url, credentials)
    }

    /// Same endpoint, different credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        let request = self.agent.get(url);
        let request = match &self.credentials {
            Credentials::None => request,
            Credentials::Password(password) => request.set(PASSWORD_HEADER, password),
            Credentials::Token(token) => request.set("Authorization", &format!("Bearer {token}")),
        };

        tracing::debug!(%url, "GET");
        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(401, _)) if self.credentials.is_none() => {
                return Err(SourceError::AuthRequired {
                    url: url.to_string(),
                });
            }
            Err(ureq::Error::Status(401, _)) => {
                return Err(SourceError::AuthFailed {
                    url: url.to_string(),
                });
            }
            Err(ureq::Error::Status(status, _)) => {
                return Err(SourceError::Http {
                    url: url.to_string(),
                    status,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SourceError::Transport {
                    url: url.to_string(),
                    source: Box::new(transport),
                });
            }
        };

        serde_json::from_reader(response.into_reader()).map_err(|err| {
            if err.is_io() {
                SourceError::Transport {
                    url: url.to_string(),
                    source: Box::new(err),
                }
            } else {
                SourceError::InvalidJson {
                    origin: url.to_string(),
                    source: err,
                }
            }
        })
    }
}

impl StatesSource for HttpStatesSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    fn fetch_states(&self) -> Result<Value, SourceError> {
        self.get_json(&self.url("states"))
    }

    fn fetch_location_name(&self) -> Result<Option<String>, SourceError> {
        let config = self.get_json(&self.url("config"))?;
        Ok(config
            .get("location_name")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
