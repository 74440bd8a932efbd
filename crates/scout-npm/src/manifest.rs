//! package.json parsing.
//!
//! Produces typed dependency lists per section. Dependency order within a
//! section follows document order.

use scout_core::error::{Result, ScoutError};
use scout_core::types::{DependencyKind, ManifestDependency, ManifestInfo};
use serde_json::Value;

/// Parses package.json text into per-section dependency lists.
///
/// Missing dependency sections yield empty lists; only text that is not
/// valid JSON at all is an error. Non-string range values (seen in malformed
/// manifests) are skipped rather than failing the parse.
///
/// # Errors
///
/// Returns [`ScoutError::InvalidManifest`] when `text` is not parseable as
/// JSON.
///
/// # Examples
///
/// ```
/// use scout_npm::parse_manifest;
///
/// let info = parse_manifest(r#"{
///   "dependencies": { "express": "^4.18.2" },
///   "devDependencies": { "vitest": "^3.1.4" }
/// }"#).unwrap();
///
/// assert_eq!(info.dependencies.len(), 1);
/// assert_eq!(info.dependencies[0].name, "express");
/// assert_eq!(info.dev_dependencies[0].range, "^3.1.4");
/// ```
pub fn parse_manifest(text: &str) -> Result<ManifestInfo> {
    let root: Value =
        serde_json::from_str(text).map_err(|source| ScoutError::InvalidManifest { source })?;

    Ok(ManifestInfo {
        dependencies: section(&root, DependencyKind::Runtime),
        dev_dependencies: section(&root, DependencyKind::Dev),
        peer_dependencies: section(&root, DependencyKind::Peer),
        optional_dependencies: section(&root, DependencyKind::Optional),
    })
}

fn section(root: &Value, kind: DependencyKind) -> Vec<ManifestDependency> {
    let Some(entries) = root.get(kind.manifest_key()).and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(name, value)| {
            value.as_str().map(|range| ManifestDependency {
                name: name.clone(),
                range: range.to_string(),
                kind,
            })
        })
        .collect()
}
