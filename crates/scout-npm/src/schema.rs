//! Search-response schema adapters.
//!
//! The search API shipped three incompatible response shapes over its
//! lifetime. Each variant gets its own serde struct family and normalize
//! function here; everything converges on [`SearchPage`] so the rest of the
//! workspace never branches on response shape. The packument (metadata)
//! endpoint is stable across variants and is handled in `registry`.

use crate::registry::package_url;
use scout_core::config::SearchApi;
use scout_core::types::{
    Contact, PackageFlags, PackageLinks, PackageScore, SearchPage, SearchResult, Suggestion,
};
use serde::Deserialize;

/// Builds the search request URL for the configured schema variant.
pub(crate) fn search_request_url(
    api: SearchApi,
    base: &str,
    query: &str,
    size: usize,
    from: usize,
) -> String {
    let text = urlencoding::encode(query);
    match api {
        SearchApi::RegistryV1 | SearchApi::Legacy => {
            format!("{base}/-/v1/search?text={text}&size={size}&from={from}")
        }
        SearchApi::NpmsV2 => format!("{base}/v2/search?q={text}&size={size}&from={from}"),
    }
}

/// Builds the suggestion request URL for the configured schema variant.
///
/// Only the npms shape has a dedicated suggestions endpoint; the other two
/// reuse the search endpoint.
pub(crate) fn suggest_request_url(api: SearchApi, base: &str, query: &str, size: usize) -> String {
    let text = urlencoding::encode(query);
    match api {
        SearchApi::RegistryV1 | SearchApi::Legacy => {
            format!("{base}/-/v1/search?text={text}&size={size}")
        }
        SearchApi::NpmsV2 => format!("{base}/v2/search/suggestions?q={text}&size={size}"),
    }
}

/// Parses a search response body according to the schema variant.
pub(crate) fn parse_search_page(api: SearchApi, data: &[u8]) -> serde_json::Result<SearchPage> {
    match api {
        SearchApi::RegistryV1 => {
            let response: V1SearchResponse = serde_json::from_slice(data)?;
            Ok(SearchPage {
                total: response.total,
                results: response
                    .objects
                    .into_iter()
                    .map(WireObject::into_result)
                    .collect(),
            })
        }
        SearchApi::NpmsV2 => {
            let response: NpmsSearchResponse = serde_json::from_slice(data)?;
            Ok(SearchPage {
                total: response.total,
                results: response
                    .results
                    .into_iter()
                    .map(WireObject::into_result)
                    .collect(),
            })
        }
        SearchApi::Legacy => {
            let response: LegacySearchResponse = serde_json::from_slice(data)?;
            let results: Vec<SearchResult> = response
                .objects
                .into_iter()
                .map(|obj| obj.package.into_result(PackageScore::default(), None, 0.0))
                .collect();
            // The legacy shape carries no total; fall back to the page length.
            Ok(SearchPage {
                total: results.len() as u64,
                results,
            })
        }
    }
}

/// Parses a suggestion response body according to the schema variant.
pub(crate) fn parse_suggestions(
    api: SearchApi,
    data: &[u8],
) -> serde_json::Result<Vec<Suggestion>> {
    match api {
        SearchApi::NpmsV2 => {
            // Dedicated endpoint: a bare array with per-entry highlight.
            let entries: Vec<NpmsSuggestionEntry> = serde_json::from_slice(data)?;
            Ok(entries
                .into_iter()
                .map(|entry| Suggestion {
                    highlight: entry.highlight.as_deref().map(strip_emphasis),
                    result: entry.object.into_result(),
                })
                .collect())
        }
        SearchApi::RegistryV1 | SearchApi::Legacy => {
            let page = parse_search_page(api, data)?;
            Ok(page
                .results
                .into_iter()
                .map(|result| Suggestion {
                    highlight: None,
                    result,
                })
                .collect())
        }
    }
}

/// Strips `<em>`/`</em>` emphasis markup from a suggestion highlight.
pub(crate) fn strip_emphasis(highlight: &str) -> String {
    highlight.replace("<em>", "").replace("</em>", "")
}

// --- variant: npm registry /-/v1/search -------------------------------------

#[derive(Deserialize)]
struct V1SearchResponse {
    objects: Vec<WireObject>,
    #[serde(default)]
    total: u64,
}

// --- variant: npms.io /v2/search --------------------------------------------

#[derive(Deserialize)]
struct NpmsSearchResponse {
    results: Vec<WireObject>,
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct NpmsSuggestionEntry {
    #[serde(flatten)]
    object: WireObject,
    #[serde(default)]
    highlight: Option<String>,
}

// --- variant: legacy, pre-scoring -------------------------------------------

#[derive(Deserialize)]
struct LegacySearchResponse {
    objects: Vec<LegacyObject>,
}

#[derive(Deserialize)]
struct LegacyObject {
    package: WirePackage,
}

// --- shared wire fragments ---------------------------------------------------

/// Scored search object, common to the v1 and npms shapes.
#[derive(Deserialize)]
struct WireObject {
    package: WirePackage,
    #[serde(default)]
    score: WireScore,
    #[serde(rename = "searchScore", default)]
    search_score: f64,
    #[serde(default)]
    flags: Option<WireFlags>,
}

impl WireObject {
    fn into_result(self) -> SearchResult {
        let flags = self.flags.map(WireFlags::into_flags).filter(|f| !f.is_empty());
        self.package
            .into_result(self.score.into_score(), flags, self.search_score)
    }
}

#[derive(Deserialize)]
struct WirePackage {
    name: String,
    #[serde(default)]
    scope: Option<String>,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    links: Option<WireLinks>,
    #[serde(default)]
    author: Option<WireContact>,
    #[serde(default)]
    publisher: Option<WireContact>,
    #[serde(default)]
    maintainers: Vec<WireContact>,
}

impl WirePackage {
    fn into_result(
        self,
        score: PackageScore,
        flags: Option<PackageFlags>,
        search_score: f64,
    ) -> SearchResult {
        let links = self.links.unwrap_or_default();
        SearchResult {
            links: PackageLinks {
                registry: links.npm.unwrap_or_else(|| package_url(&self.name)),
                homepage: links.homepage,
                repository: links.repository,
                bugs: links.bugs,
            },
            name: self.name,
            scope: self.scope.unwrap_or_else(|| "unscoped".into()),
            version: self.version,
            description: self.description.unwrap_or_default(),
            keywords: self.keywords,
            published_at: self.date,
            author: self.author.map(WireContact::into_contact),
            publisher: self.publisher.map(WireContact::into_contact),
            maintainers: self
                .maintainers
                .into_iter()
                .map(WireContact::into_contact)
                .collect(),
            score,
            flags,
            search_score,
        }
    }
}

#[derive(Deserialize, Default)]
struct WireLinks {
    #[serde(default)]
    npm: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    bugs: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct WireContact {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) username: Option<String>,
}

impl WireContact {
    pub(crate) fn into_contact(self) -> Contact {
        Contact {
            name: self.name,
            email: self.email,
            username: self.username,
        }
    }
}

#[derive(Deserialize, Default)]
struct WireScore {
    #[serde(rename = "final", default)]
    final_score: f64,
    #[serde(default)]
    detail: WireScoreDetail,
}

impl WireScore {
    fn into_score(self) -> PackageScore {
        PackageScore {
            final_score: self.final_score,
            quality: self.detail.quality,
            popularity: self.detail.popularity,
            maintenance: self.detail.maintenance,
        }
    }
}

#[derive(Deserialize, Default)]
struct WireScoreDetail {
    #[serde(default)]
    quality: f64,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    maintenance: f64,
}

#[derive(Deserialize)]
struct WireFlags {
    #[serde(default)]
    deprecated: Option<String>,
    #[serde(default)]
    unstable: bool,
    #[serde(default)]
    insecure: bool,
}

impl WireFlags {
    fn into_flags(self) -> PackageFlags {
        PackageFlags {
            deprecated: self.deprecated,
            unstable: self.unstable,
            insecure: self.insecure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_FIXTURE: &str = r#"{
  "objects": [
    {
      "package": {
        "name": "express",
        "scope": "unscoped",
        "version": "4.18.2",
        "description": "Fast, unopinionated web framework",
        "keywords": ["framework", "web"],
        "date": "2022-10-08T22:39:29.905Z",
        "links": {
          "npm": "https://www.npmjs.com/package/express",
          "homepage": "http://expressjs.com/",
          "repository": "https://github.com/expressjs/express"
        },
        "publisher": {"username": "dougwilson", "email": "doug@somethingdoug.com"},
        "maintainers": [{"username": "dougwilson", "email": "doug@somethingdoug.com"}]
      },
      "score": {
        "final": 0.89,
        "detail": {"quality": 0.96, "popularity": 0.83, "maintenance": 0.92}
      },
      "searchScore": 100000.55
    }
  ],
  "total": 8231
}"#;

    #[test]
    fn test_parse_v1_search() {
        let page = parse_search_page(SearchApi::RegistryV1, V1_FIXTURE.as_bytes()).unwrap();
        assert_eq!(page.total, 8231);
        assert_eq!(page.results.len(), 1);

        let result = &page.results[0];
        assert_eq!(result.name, "express");
        assert_eq!(result.scope, "unscoped");
        assert_eq!(result.version, "4.18.2");
        assert!((result.score.final_score - 0.89).abs() < f64::EPSILON);
        assert!((result.score.quality - 0.96).abs() < f64::EPSILON);
        assert!(result.search_score > 100_000.0);
        assert_eq!(
            result.links.registry,
            "https://www.npmjs.com/package/express"
        );
        assert_eq!(result.links.homepage.as_deref(), Some("http://expressjs.com/"));
        assert!(result.flags.is_none());
        assert_eq!(
            result.publisher.as_ref().unwrap().username.as_deref(),
            Some("dougwilson")
        );
    }

    #[test]
    fn test_parse_npms_search_same_logical_fixture() {
        // Same logical content as the v1 fixture, in the npms envelope.
        let npms_body = V1_FIXTURE.replacen("\"objects\"", "\"results\"", 1);
        let v1 = parse_search_page(SearchApi::RegistryV1, V1_FIXTURE.as_bytes()).unwrap();
        let npms = parse_search_page(SearchApi::NpmsV2, npms_body.as_bytes()).unwrap();
        assert_eq!(v1, npms);
    }

    #[test]
    fn test_parse_legacy_search_defaults_scores() {
        let json = r#"{
  "objects": [
    {
      "package": {
        "name": "left-pad",
        "version": "1.3.0",
        "description": "String left pad"
      }
    },
    {
      "package": {
        "name": "right-pad",
        "version": "1.0.1"
      }
    }
  ]
}"#;

        let page = parse_search_page(SearchApi::Legacy, json.as_bytes()).unwrap();
        // No total in the legacy shape: falls back to page length.
        assert_eq!(page.total, 2);

        let result = &page.results[0];
        assert_eq!(result.name, "left-pad");
        assert_eq!(result.score, PackageScore::default());
        assert_eq!(result.search_score, 0.0);
        assert_eq!(result.scope, "unscoped");
        // Registry link synthesized when the wire shape has none.
        assert_eq!(
            result.links.registry,
            "https://www.npmjs.com/package/left-pad"
        );
        assert_eq!(page.results[1].description, "");
    }

    #[test]
    fn test_parse_flags() {
        let json = r#"{
  "objects": [
    {
      "package": {"name": "request", "version": "2.88.2", "date": ""},
      "score": {"final": 0.5, "detail": {}},
      "searchScore": 1.0,
      "flags": {"deprecated": "request has been deprecated", "unstable": false}
    }
  ],
  "total": 1
}"#;

        let page = parse_search_page(SearchApi::RegistryV1, json.as_bytes()).unwrap();
        let flags = page.results[0].flags.as_ref().unwrap();
        assert_eq!(
            flags.deprecated.as_deref(),
            Some("request has been deprecated")
        );
        assert!(!flags.unstable);
        assert!(!flags.insecure);
    }

    #[test]
    fn test_parse_npms_suggestions_strips_markup() {
        let json = r#"[
  {
    "package": {"name": "react", "version": "18.2.0", "date": ""},
    "score": {"final": 0.93, "detail": {}},
    "searchScore": 100000.0,
    "highlight": "<em>react</em>"
  },
  {
    "package": {"name": "react-dom", "version": "18.2.0", "date": ""},
    "score": {"final": 0.9, "detail": {}},
    "searchScore": 90000.0
  }
]"#;

        let suggestions = parse_suggestions(SearchApi::NpmsV2, json.as_bytes()).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].highlight.as_deref(), Some("react"));
        assert_eq!(suggestions[0].result.name, "react");
        assert_eq!(suggestions[1].highlight, None);
    }

    #[test]
    fn test_v1_suggestions_have_no_highlight() {
        let suggestions =
            parse_suggestions(SearchApi::RegistryV1, V1_FIXTURE.as_bytes()).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].highlight, None);
        assert_eq!(suggestions[0].result.name, "express");
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("<em>lod</em>ash"), "lodash");
        assert_eq!(strip_emphasis("plain"), "plain");
    }

    #[test]
    fn test_search_request_urls() {
        let v1 = search_request_url(
            SearchApi::RegistryV1,
            "https://registry.npmjs.org",
            "state machine",
            25,
            0,
        );
        assert_eq!(
            v1,
            "https://registry.npmjs.org/-/v1/search?text=state%20machine&size=25&from=0"
        );

        let npms = search_request_url(SearchApi::NpmsV2, "https://api.npms.io", "react", 10, 50);
        assert_eq!(npms, "https://api.npms.io/v2/search?q=react&size=10&from=50");
    }

    #[test]
    fn test_suggest_request_urls() {
        let npms = suggest_request_url(SearchApi::NpmsV2, "https://api.npms.io", "rea", 25);
        assert_eq!(npms, "https://api.npms.io/v2/search/suggestions?q=rea&size=25");

        let v1 = suggest_request_url(SearchApi::RegistryV1, "https://registry.npmjs.org", "rea", 25);
        assert!(v1.contains("/-/v1/search?text=rea"));
    }
}
