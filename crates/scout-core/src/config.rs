//! Client configuration.
//!
//! Hosts hand this to the registry client at construction time, typically
//! deserialized from editor settings. Every field has a default, so an empty
//! `{}` configuration is valid.

use serde::Deserialize;

/// Which upstream search-response schema the registry speaks.
///
/// The search API shipped three incompatible shapes over its lifetime; one
/// adapter per variant normalizes them into the shared model. The metadata
/// (packument) endpoint is stable across all three.
///
/// # Examples
///
/// ```
/// use scout_core::config::SearchApi;
///
/// let api: SearchApi = serde_json::from_str("\"npms_v2\"").unwrap();
/// assert_eq!(api, SearchApi::NpmsV2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchApi {
    /// `GET {search_url}/-/v1/search` — `{ objects, total }` with scores and flags.
    #[default]
    RegistryV1,
    /// `GET {search_url}/v2/search` and `/v2/search/suggestions` —
    /// `{ total, results }`, suggestions carry a `highlight` field.
    NpmsV2,
    /// Pre-scoring shape: `{ objects }` without scores, flags, or a total.
    Legacy,
}

/// Registry endpoints and HTTP behavior.
///
/// # Examples
///
/// ```
/// use scout_core::config::RegistryConfig;
///
/// let config: RegistryConfig = serde_json::from_str(r#"{
///     "search_api": "registry_v1",
///     "timeout_secs": 10
/// }"#).unwrap();
///
/// assert_eq!(config.registry_url, "https://registry.npmjs.org");
/// assert_eq!(config.timeout_secs, 10);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the package-metadata endpoint.
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    /// Base URL of the search endpoint. Defaults to the metadata host;
    /// point at a different host for the npms v2 API.
    #[serde(default = "default_registry_url")]
    pub search_url: String,
    #[serde(default)]
    pub search_api: SearchApi,
    /// Bounded per-request timeout. Expiry surfaces as a transport failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            search_url: default_registry_url(),
            search_api: SearchApi::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_registry_url() -> String {
    "https://registry.npmjs.org".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("npm-scout/", env!("CARGO_PKG_VERSION")).into()
}
