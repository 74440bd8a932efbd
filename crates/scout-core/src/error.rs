//! Error taxonomy for npm-scout.
//!
//! Single-item lookups propagate these as typed errors; batch operations
//! absorb per-item failures and omit the affected item instead.

use thiserror::Error;

/// Errors surfaced by the registry client and manifest analyzer.
///
/// Every failure a host can observe maps to exactly one variant, so the
/// presentation layer can turn any of them into a readable message without
/// inspecting source errors.
///
/// # Examples
///
/// ```
/// use scout_core::ScoutError;
///
/// let err = ScoutError::NotFound { package: "left-pad".into() };
/// assert_eq!(err.to_string(), "package 'left-pad' not found on the registry");
/// ```
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Search endpoint unreachable or returned a non-success status.
    #[error("search failed for query '{query}': {source}")]
    SearchFailed {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Suggestion endpoint failure.
    #[error("suggestions failed for query '{query}': {source}")]
    SuggestFailed {
        query: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The registry has no entry for this package name.
    #[error("package '{package}' not found on the registry")]
    NotFound { package: String },

    /// The packument carries no "latest" distribution tag at all.
    #[error("registry lists no 'latest' tag for '{package}'")]
    MissingLatestTag { package: String },

    /// The registry's "latest" tag points at a version record that does not
    /// exist in the version map. Upstream data-integrity fault; surfaced
    /// rather than silently defaulted.
    #[error("registry reports latest '{version}' for '{package}' but has no such version record")]
    MissingVersionData { package: String, version: String },

    /// Any other metadata-fetch failure.
    #[error("failed to fetch metadata for '{package}': {source}")]
    InfoFetchFailed {
        package: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Manifest text is not well-formed JSON.
    #[error("invalid package.json: {source}")]
    InvalidManifest {
        #[source]
        source: serde_json::Error,
    },

    /// I/O error (manifest read/write in the host).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error outside the manifest path (configuration files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ScoutError>;

impl ScoutError {
    /// Wraps any error as a search failure for the given query.
    pub fn search_failed(
        query: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SearchFailed {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// Wraps any error as a suggestion failure for the given query.
    pub fn suggest_failed(
        query: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SuggestFailed {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// Wraps any error as a metadata-fetch failure for the given package.
    pub fn info_fetch_failed(
        package: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InfoFetchFailed {
            package: package.into(),
            source: Box::new(source),
        }
    }
}
