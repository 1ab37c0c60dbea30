//! Where the rendered document goes.

use std::path::PathBuf;

use lovelace_domain::error::WriteError;

/// What a sink did with the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Written to `path`; the previous content, if any, was saved to `backup`.
    Written {
        path: PathBuf,
        backup: Option<PathBuf>,
    },
    /// Printed to the console; the filesystem was not touched.
    Printed,
}

/// Receives the rendered document.
pub trait DocumentSink {
    /// # Errors
    ///
    /// Returns a [`WriteError`] on any IO failure; no partial output is left behind.
    fn write(&mut self, document: &str) -> Result<WriteOutcome, WriteError>;
}
