//! npm registry access and package.json analysis for npm-scout.
//!
//! This crate holds the three working parts of the system:
//!
//! - [`registry`]: HTTP client over the registry's search and metadata
//!   endpoints, with one response-schema adapter per historical API variant
//! - [`extract`]: heuristic package-name extraction from arbitrary text
//! - [`manifest`] / [`update`]: package.json parsing and dependency update
//!   planning

pub mod extract;
pub mod manifest;
pub mod registry;
mod schema;
pub mod update;

pub use extract::extract_package_names;
pub use manifest::parse_manifest;
pub use registry::{NpmClient, package_url};
pub use update::plan_update;
