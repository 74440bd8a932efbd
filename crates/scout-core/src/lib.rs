//! Core abstractions for npm-scout.
//!
//! This crate holds everything shared between the registry client and its
//! hosts:
//!
//! - **Model**: normalized search/metadata/manifest types ([`types`])
//! - **Errors**: the [`ScoutError`] taxonomy and propagation policy
//! - **Config**: registry endpoints and schema-variant selection ([`config`])
//! - **Presentation boundary**: the outward [`Frontend`] trait
//!
//! The crate is deliberately free of HTTP and regex machinery; those live in
//! `scout-npm`.

pub mod config;
pub mod error;
pub mod frontend;
pub mod types;

pub use config::{RegistryConfig, SearchApi};
pub use error::{Result, ScoutError};
pub use frontend::Frontend;
pub use types::{
    Contact, DependencyKind, ManifestDependency, ManifestInfo, PackageFlags, PackageInfo,
    PackageLinks, PackageScore, PlannedChange, SearchPage, SearchResult, Suggestion, UpdatePlan,
    VersionHistory, VersionHistoryEntry,
};
