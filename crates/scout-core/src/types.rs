//! Normalized data model.
//!
//! The registry's search API has gone through several incompatible response
//! shapes over its lifetime. Everything downstream of the client sees only
//! the types in this module; schema differences are flattened at the wire
//! boundary in `scout-npm`.
//!
//! All entities here are transient: constructed per request, rendered once,
//! discarded.

use std::collections::BTreeMap;

/// A person attached to a package: author, publisher, or maintainer.
///
/// The registry populates different subsets of these fields depending on
/// which role the contact appears in, so all three are optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl Contact {
    /// Best available display name, preferring `name` over `username`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Link set for a package: registry page plus optional project links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLinks {
    /// Package page on the registry website (always present).
    pub registry: String,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub bugs: Option<String>,
}

/// Quality/popularity/maintenance sub-scores plus the combined score.
///
/// All values lie in `[0, 1]`. Registries that predate scoring report zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackageScore {
    pub final_score: f64,
    pub quality: f64,
    pub popularity: f64,
    pub maintenance: f64,
}

/// Advisory flags attached to a search result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageFlags {
    /// Deprecation reason, when the package is deprecated.
    pub deprecated: Option<String>,
    /// Version still below 1.0.0.
    pub unstable: bool,
    /// Known security vulnerabilities.
    pub insecure: bool,
}

impl PackageFlags {
    /// True when no flag is set; such a flag block is dropped entirely.
    pub fn is_empty(&self) -> bool {
        self.deprecated.is_none() && !self.unstable && !self.insecure
    }
}

/// One entry returned by a text search.
///
/// Immutable once constructed from a registry response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub name: String,
    /// Scope without the `@`, or `"unscoped"`.
    pub scope: String,
    pub version: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// RFC 3339 publish date of the listed version.
    pub published_at: String,
    pub links: PackageLinks,
    pub author: Option<Contact>,
    pub publisher: Option<Contact>,
    pub maintainers: Vec<Contact>,
    pub score: PackageScore,
    pub flags: Option<PackageFlags>,
    /// Raw search-relevance score (unbounded, unlike [`PackageScore`]).
    pub search_score: f64,
}

/// A search result augmented with an optional display highlight.
///
/// The highlight is a copy of the matched name with emphasis markup already
/// stripped; it is display-only and never used as a package name.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub result: SearchResult,
    pub highlight: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Total matches known to the registry, not the page length.
    pub total: u64,
    pub results: Vec<SearchResult>,
}

/// Full metadata for one package at its latest published version.
///
/// Construction fails with `MissingVersionData` when the registry's latest
/// tag points at a version absent from the version map, so `version` is
/// always non-empty here.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub license: Option<String>,
    pub author: Option<Contact>,
    pub maintainers: Vec<Contact>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
    /// RFC 3339 publish timestamp of `version`.
    pub published_at: String,
    pub links: PackageLinks,
}

/// One historical release of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionHistoryEntry {
    pub version: String,
    pub published_at: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub author: Option<Contact>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub peer_dependencies: BTreeMap<String, String>,
}

/// Release history, newest-first, truncated to the requested limit.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionHistory {
    pub name: String,
    /// Count before truncation.
    pub total_versions: usize,
    pub versions: Vec<VersionHistoryEntry>,
}

/// Section of package.json a dependency was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Runtime,
    Dev,
    Peer,
    Optional,
}

impl DependencyKind {
    /// The package.json key for this section.
    pub const fn manifest_key(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Dev => "devDependencies",
            Self::Peer => "peerDependencies",
            Self::Optional => "optionalDependencies",
        }
    }

    /// Human-readable label used by presentation layers.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Runtime => "Dependency",
            Self::Dev => "Dev Dependency",
            Self::Peer => "Peer Dependency",
            Self::Optional => "Optional Dependency",
        }
    }
}

/// A single declared dependency: name, declared range, and section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDependency {
    pub name: String,
    pub range: String,
    pub kind: DependencyKind,
}

/// Parsed dependency listing of a package.json, one list per section.
///
/// A manifest with no dependency fields parses to four empty lists, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestInfo {
    pub dependencies: Vec<ManifestDependency>,
    pub dev_dependencies: Vec<ManifestDependency>,
    pub peer_dependencies: Vec<ManifestDependency>,
    pub optional_dependencies: Vec<ManifestDependency>,
}

impl ManifestInfo {
    /// All dependencies across the four sections, in section order.
    pub fn all(&self) -> Vec<&ManifestDependency> {
        self.dependencies
            .iter()
            .chain(&self.dev_dependencies)
            .chain(&self.peer_dependencies)
            .chain(&self.optional_dependencies)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
            && self.dev_dependencies.is_empty()
            && self.peer_dependencies.is_empty()
            && self.optional_dependencies.is_empty()
    }
}

/// One dependency the update planner decided to bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub name: String,
    pub kind: DependencyKind,
    pub from_range: String,
    pub to_range: String,
}

/// Result of planning a manifest update.
///
/// `manifest` is the full rewritten text, structurally identical to the
/// input except for bumped version strings. `changed` counts dependencies
/// whose resolved latest version differed from the declared one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub manifest: String,
    pub changed: usize,
    pub changes: Vec<PlannedChange>,
}
