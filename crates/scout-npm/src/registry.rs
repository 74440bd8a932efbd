//! npm registry client.
//!
//! Talks to two endpoints:
//! - Search (`/-/v1/search` or the configured variant) for text queries and
//!   suggestions
//! - Package metadata (`{registry}/{package}`, the "packument") for latest
//!   versions and release history
//!
//! Every request is independent; there is no cache and no shared state
//! beyond the underlying connection pool. Batch operations fan out
//! concurrently and absorb per-item failures.

use crate::schema::{
    WireContact, parse_search_page, parse_suggestions, search_request_url, suggest_request_url,
};
use reqwest::StatusCode;
use scout_core::config::RegistryConfig;
use scout_core::error::{Result, ScoutError};
use scout_core::types::{
    Contact, PackageInfo, PackageLinks, SearchPage, SearchResult, Suggestion, VersionHistory,
    VersionHistoryEntry,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Hard cap the search endpoint accepts for one page.
pub const MAX_SEARCH_SIZE: usize = 250;
/// Hard cap for the search offset.
pub const MAX_SEARCH_OFFSET: usize = 5000;
/// Hard cap for one suggestions request.
pub const MAX_SUGGEST_SIZE: usize = 100;
/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 25;
/// Version-history entries returned when the caller does not specify a limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Base URL for package pages on npmjs.com.
pub const NPMJS_URL: &str = "https://www.npmjs.com/package";

/// Returns the URL for a package's page on npmjs.com.
///
/// Package names are URL-encoded to prevent path traversal.
pub fn package_url(name: &str) -> String {
    format!("{}/{}", NPMJS_URL, urlencoding::encode(name))
}

/// Client for the npm registry's search and metadata endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
///
/// # Examples
///
/// ```no_run
/// # use scout_npm::NpmClient;
/// # use scout_core::RegistryConfig;
/// # #[tokio::main]
/// # async fn main() {
/// let client = NpmClient::new(RegistryConfig::default());
///
/// let page = client.search("express", None, None).await.unwrap();
/// assert!(page.total > 0);
/// # }
/// ```
#[derive(Clone)]
pub struct NpmClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl NpmClient {
    /// Creates a client from the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { http, config }
    }

    /// Searches the registry by free text.
    ///
    /// `size` defaults to 25 and is clamped to 250; `from` defaults to 0 and
    /// is clamped to 5000. The clamped values are what goes on the wire, so
    /// an oversized request can never reach the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::SearchFailed`] on any transport failure,
    /// non-success status, or undecodable response body.
    pub async fn search(
        &self,
        query: &str,
        size: Option<usize>,
        from: Option<usize>,
    ) -> Result<SearchPage> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_SEARCH_SIZE);
        let from = from.unwrap_or(0).min(MAX_SEARCH_OFFSET);
        let url = search_request_url(
            self.config.search_api,
            &self.config.search_url,
            query,
            size,
            from,
        );
        debug!(%url, "issuing search request");

        let data = self
            .get_bytes(&url)
            .await
            .map_err(|e| ScoutError::search_failed(query, e))?;

        parse_search_page(self.config.search_api, &data)
            .map_err(|e| ScoutError::search_failed(query, e))
    }

    /// Fetches typeahead suggestions for a partial query.
    ///
    /// `size` defaults to 25 and is clamped to 100. Highlights, when the
    /// schema variant provides them, have emphasis markup stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::SuggestFailed`] on any failure.
    pub async fn suggest(&self, query: &str, size: Option<usize>) -> Result<Vec<Suggestion>> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_SUGGEST_SIZE);
        let url = suggest_request_url(self.config.search_api, &self.config.search_url, query, size);
        debug!(%url, "issuing suggestion request");

        let data = self
            .get_bytes(&url)
            .await
            .map_err(|e| ScoutError::suggest_failed(query, e))?;

        parse_suggestions(self.config.search_api, &data)
            .map_err(|e| ScoutError::suggest_failed(query, e))
    }

    /// Fetches full metadata for a package at its latest published version.
    ///
    /// Resolves the registry's `latest` distribution tag against the version
    /// map and flattens the matching record, falling back to packument-level
    /// fields where the version record is silent.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::NotFound`] when the registry has no such package
    /// - [`ScoutError::MissingLatestTag`] when the packument has no `latest`
    ///   tag
    /// - [`ScoutError::MissingVersionData`] when the `latest` tag points at a
    ///   version absent from the version map
    /// - [`ScoutError::InfoFetchFailed`] for anything else
    pub async fn get_latest(&self, name: &str) -> Result<PackageInfo> {
        let doc = self.fetch_packument(name).await?;
        package_info_from_packument(name, doc)
    }

    /// Fetches release history for a package, newest-first.
    ///
    /// Every known version is paired with its publish timestamp from the
    /// packument `time` map, sorted descending, and truncated to `limit`
    /// (default 50). `total_versions` reflects the untruncated count.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_latest`], minus the latest-tag
    /// check.
    pub async fn get_version_history(
        &self,
        name: &str,
        limit: Option<usize>,
    ) -> Result<VersionHistory> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let doc = self.fetch_packument(name).await?;
        Ok(version_history_from_packument(name, doc, limit))
    }

    /// Fetches metadata for several packages, one independent lookup each.
    ///
    /// Lookups run concurrently. A failing lookup is logged and its name is
    /// omitted from the result map; the batch itself never fails.
    pub async fn get_many(&self, names: &[String]) -> BTreeMap<String, PackageInfo> {
        let lookups = names.iter().map(|name| async move {
            (name.clone(), self.get_latest(name).await)
        });

        let mut infos = BTreeMap::new();
        for (name, outcome) in futures::future::join_all(lookups).await {
            match outcome {
                Ok(info) => {
                    infos.insert(name, info);
                }
                Err(e) => warn!(package = %name, error = %e, "skipping failed lookup in batch"),
            }
        }
        infos
    }

    /// Runs one search per name and keys the results by name.
    ///
    /// A failing search is logged and reported as an empty result list for
    /// that name; the batch itself never fails.
    pub async fn search_many(
        &self,
        names: &[String],
        size_per_name: usize,
    ) -> BTreeMap<String, Vec<SearchResult>> {
        let searches = names.iter().map(|name| async move {
            (name.clone(), self.search(name, Some(size_per_name), None).await)
        });

        let mut by_name = BTreeMap::new();
        for (name, outcome) in futures::future::join_all(searches).await {
            let results = match outcome {
                Ok(page) => page.results,
                Err(e) => {
                    warn!(query = %name, error = %e, "search failed within batch");
                    Vec::new()
                }
            };
            by_name.insert(name, results);
        }
        by_name
    }

    /// Registry page URL for a package.
    pub fn package_url(&self, name: &str) -> String {
        package_url(name)
    }

    async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, reqwest::Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_packument(&self, name: &str) -> Result<Packument> {
        let url = format!("{}/{}", self.config.registry_url, urlencoding::encode(name));
        debug!(%url, "fetching packument");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ScoutError::info_fetch_failed(name, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ScoutError::NotFound {
                package: name.to_string(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|e| ScoutError::info_fetch_failed(name, e))?;
        let data = response
            .bytes()
            .await
            .map_err(|e| ScoutError::info_fetch_failed(name, e))?;

        serde_json::from_slice(&data).map_err(|e| ScoutError::info_fetch_failed(name, e))
    }
}

// --- packument deserialization -----------------------------------------------
//
// The metadata endpoint's shape is stable across all search schema variants,
// so there is exactly one deserializer for it. Several fields accept both a
// string shorthand and an object form in the wild; the untagged enums below
// absorb that.

#[derive(Deserialize)]
struct Packument {
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
    #[serde(default)]
    versions: BTreeMap<String, VersionRecord>,
    #[serde(default)]
    time: BTreeMap<String, String>,
    #[serde(default)]
    maintainers: Vec<WireContact>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    author: Option<AuthorField>,
    #[serde(default)]
    license: Option<LicenseField>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<RepositoryField>,
    #[serde(default)]
    bugs: Option<BugsField>,
}

#[derive(Deserialize, Default)]
struct VersionRecord {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    author: Option<AuthorField>,
    #[serde(default)]
    license: Option<LicenseField>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies", default)]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(rename = "peerDependencies", default)]
    peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<RepositoryField>,
    #[serde(default)]
    bugs: Option<BugsField>,
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum AuthorField {
    Shorthand(String),
    Structured(WireContact),
}

impl AuthorField {
    fn into_contact(self) -> Contact {
        match self {
            Self::Shorthand(text) => Contact {
                name: Some(text),
                email: None,
                username: None,
            },
            Self::Structured(contact) => contact.into_contact(),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum LicenseField {
    Spdx(String),
    Structured {
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl LicenseField {
    fn into_string(self) -> Option<String> {
        match self {
            Self::Spdx(text) => Some(text),
            Self::Structured { kind } => kind,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum RepositoryField {
    Shorthand(String),
    Structured {
        #[serde(default)]
        url: Option<String>,
    },
}

impl RepositoryField {
    fn into_url(self) -> Option<String> {
        match self {
            Self::Shorthand(url) => Some(url),
            Self::Structured { url } => url,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum BugsField {
    Shorthand(String),
    Structured {
        #[serde(default)]
        url: Option<String>,
    },
}

impl BugsField {
    fn into_url(self) -> Option<String> {
        match self {
            Self::Shorthand(url) => Some(url),
            Self::Structured { url } => url,
        }
    }
}

/// Resolves the `latest` tag and flattens the packument into [`PackageInfo`].
///
/// Version-record fields win over packument-level fields; the packument is
/// the fallback for records published without them.
fn package_info_from_packument(name: &str, mut doc: Packument) -> Result<PackageInfo> {
    let latest = doc
        .dist_tags
        .get("latest")
        .cloned()
        .ok_or_else(|| ScoutError::MissingLatestTag {
            package: name.to_string(),
        })?;

    let record = doc
        .versions
        .remove(&latest)
        .ok_or_else(|| ScoutError::MissingVersionData {
            package: name.to_string(),
            version: latest.clone(),
        })?;

    let published_at = doc
        .time
        .get(&latest)
        .or_else(|| doc.time.get("modified"))
        .cloned()
        .unwrap_or_default();

    let homepage = record.homepage.or(doc.homepage);
    let repository = record
        .repository
        .or(doc.repository)
        .and_then(RepositoryField::into_url);
    let bugs = record.bugs.or(doc.bugs).and_then(BugsField::into_url);

    Ok(PackageInfo {
        name: name.to_string(),
        description: record.description.or(doc.description),
        keywords: if record.keywords.is_empty() {
            doc.keywords
        } else {
            record.keywords
        },
        license: record
            .license
            .or(doc.license)
            .and_then(LicenseField::into_string),
        author: record
            .author
            .or(doc.author)
            .map(AuthorField::into_contact),
        maintainers: doc
            .maintainers
            .into_iter()
            .map(WireContact::into_contact)
            .collect(),
        dependencies: record.dependencies,
        dev_dependencies: record.dev_dependencies,
        peer_dependencies: record.peer_dependencies,
        published_at,
        links: PackageLinks {
            registry: package_url(name),
            homepage,
            repository,
            bugs,
        },
        version: latest,
    })
}

/// Orders all known versions newest-first by publish timestamp and truncates.
///
/// Timestamps are RFC 3339 strings, which order correctly as plain strings.
/// Versions missing from the `time` map sort last.
fn version_history_from_packument(name: &str, doc: Packument, limit: usize) -> VersionHistory {
    let total_versions = doc.versions.len();

    let mut versions: Vec<VersionHistoryEntry> = doc
        .versions
        .into_iter()
        .map(|(version, record)| VersionHistoryEntry {
            published_at: doc.time.get(&version).cloned().unwrap_or_default(),
            version,
            description: record.description,
            license: record.license.and_then(LicenseField::into_string),
            author: record.author.map(AuthorField::into_contact),
            dependencies: record.dependencies,
            dev_dependencies: record.dev_dependencies,
            peer_dependencies: record.peer_dependencies,
        })
        .collect();

    versions.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    versions.truncate(limit);

    VersionHistory {
        name: name.to_string(),
        total_versions,
        versions,
    }
}
