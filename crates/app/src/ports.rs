//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the migration engine and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod render;
pub mod sink;
pub mod source;

pub use render::DocumentRenderer;
pub use sink::{DocumentSink, WriteOutcome};
pub use source::StatesSource;
