//! Outward presentation boundary.
//!
//! The core never draws UI. Everything a host needs to show the user flows
//! through [`Frontend`]; each host platform (editor plugin, terminal, test
//! harness) supplies its own implementation. All methods are pure side
//! effects from the core's point of view.

use crate::types::{
    ManifestInfo, PackageInfo, SearchPage, SearchResult, Suggestion, UpdatePlan, VersionHistory,
};
use std::collections::BTreeMap;

/// Host-supplied presentation surface.
///
/// Render methods take fully-normalized model types; implementations decide
/// layout. `choose` is the only inbound call and may return `None` when the
/// user dismisses the prompt.
pub trait Frontend {
    /// Renders one page of search results.
    fn render_search_results(&self, page: &SearchPage);

    /// Renders typeahead-style suggestions, using highlights when present.
    fn render_suggestions(&self, suggestions: &[Suggestion]);

    /// Renders full latest-version metadata for one package.
    fn render_package_info(&self, info: &PackageInfo);

    /// Renders release history, newest-first.
    fn render_version_history(&self, history: &VersionHistory);

    /// Renders a manifest's dependency listing grouped by section.
    fn render_manifest_info(&self, info: &ManifestInfo);

    /// Renders a proposed manifest update: change list and count.
    fn render_update_plan(&self, plan: &UpdatePlan);

    /// Renders a batch metadata lookup keyed by package name.
    fn render_batch_info(&self, infos: &BTreeMap<String, PackageInfo>);

    /// Renders per-name search results for a batch of extracted names.
    fn render_search_by_name(&self, results: &BTreeMap<String, Vec<SearchResult>>);

    /// Asks the user to pick one of `options`; `None` means dismissed.
    fn choose(&self, prompt: &str, options: &[String]) -> Option<usize>;
}
