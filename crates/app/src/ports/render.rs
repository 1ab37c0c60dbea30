//! Render port — serialization of the dashboard tree.

use lovelace_domain::dashboard::Configuration;
use lovelace_domain::error::RenderError;

/// Renders a [`Configuration`] to text.
///
/// Implementations must be pure: the same configuration always renders to
/// byte-identical output.
pub trait DocumentRenderer {
    /// # Errors
    ///
    /// Returns [`RenderError::Serialize`] when the tree cannot be serialized.
    fn render(&self, configuration: &Configuration) -> Result<String, RenderError>;
}
