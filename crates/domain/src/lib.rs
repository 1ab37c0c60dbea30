//! # lovelace-domain
//!
//! Pure domain model for the Lovelace migration tool.
//!
//! ## Responsibilities
//! - Foundational types: entity identifiers, attribute values, error conventions
//! - Define **Entities** (one state record of the snapshot: lights, sensors, groups, …)
//! - Define **Groups** (entities listing other entities as members)
//! - Normalize a raw states **Snapshot** and filter it
//! - Define the **Dashboard** tree (configuration → views → cards)
//! - Naming helpers: humanized titles, slugs, title resolution
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod naming;

pub mod dashboard;
pub mod entity;
pub mod filter;
pub mod group;
pub mod snapshot;
pub mod warning;
