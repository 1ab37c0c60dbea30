//! # lovelace-adapter-render-yaml
//!
//! YAML serializer built on [serde_yml](https://docs.rs/serde_yml).
//!
//! ## Responsibilities
//! - Implement the `DocumentRenderer` port defined in `lovelace-app::ports`
//! - Parse a rendered document back into a `Configuration`
//!
//! ## Dependency rule
//! Depends on `lovelace-app` (for the port trait) and `lovelace-domain` (for
//! the dashboard tree). The `app` and `domain` crates must never reference
//! this adapter.

use lovelace_app::ports::DocumentRenderer;
use lovelace_domain::dashboard::Configuration;
use lovelace_domain::error::RenderError;

/// Renders the dashboard tree as a YAML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlRenderer;

impl YamlRenderer {
    /// Parse a YAML document into a dashboard tree.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Parse`] when the text is not valid YAML or does
    /// not describe a configuration.
    pub fn parse(&self, document: &str) -> Result<Configuration, RenderError> {
        serde_yml::from_str(document).map_err(|err| RenderError::Parse(Box::new(err)))
    }
}

impl DocumentRenderer for YamlRenderer {
    fn render(&self, configuration: &Configuration) -> Result<String, RenderError> {
        let document = serde_yml::to_string(configuration)
            .map_err(|err| RenderError::Serialize(Box::new(err)))?;
        tracing::debug!(bytes = document.len(), "configuration rendered");
        Ok(document)
    }
}
