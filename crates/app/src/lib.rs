//! # lovelace-app
//!
//! Application layer — the migration engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `StatesSource` — acquire the states snapshot and the location name
//!   - `DocumentRenderer` — serialize the dashboard tree
//!   - `DocumentSink` — persist or print the rendered document
//! - Classify entities into views and cards (`classifier`)
//! - Turn the classification into the dashboard tree (`builder`)
//! - Orchestrate a full run (`MigrationService`)
//!
//! ## Dependency rule
//! Depends on `lovelace-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod builder;
pub mod classifier;
pub mod ports;
pub mod services;
