//! Console sink used for dry runs.

use std::io::{self, Write};

use lovelace_app::ports::{DocumentSink, WriteOutcome};
use lovelace_domain::error::WriteError;

/// Writes the document to a stream and never touches the filesystem.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DocumentSink for ConsoleSink<W> {
    fn write(&mut self, document: &str) -> Result<WriteOutcome, WriteError> {
        self.out
            .write_all(document.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(WriteError::Console)?;
        tracing::debug!(bytes = document.len(), "document printed");
        Ok(WriteOutcome::Printed)
    }
}
