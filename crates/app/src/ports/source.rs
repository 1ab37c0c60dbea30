//! Where the states snapshot comes from.

use lovelace_domain::error::SourceError;

/// Acquires the raw states payload (and optionally the location name).
///
/// Calls are synchronous and return a fully materialized result. The engine
/// never retries; auth failures are surfaced as
/// [`SourceError::AuthRequired`] / [`SourceError::AuthFailed`].
pub trait StatesSource {
    /// Human-readable origin (URL, file path, `<stdin>`) used in logs.
    fn describe(&self) -> String;

    /// Fetch the decoded states payload.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the payload cannot be acquired or decoded.
    fn fetch_states(&self) -> Result<serde_json::Value, SourceError>;

    /// Fetch the configured location name, if the source knows one.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the source has a config endpoint and it fails.
    fn fetch_location_name(&self) -> Result<Option<String>, SourceError>;
}
