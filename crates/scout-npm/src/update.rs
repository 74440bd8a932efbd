//! Dependency update planning.
//!
//! Computes a proposed rewrite of a package.json: every declared dependency
//! is checked against the registry's latest version, and out-of-date
//! declarations are bumped in place while preserving the range operator.
//! The rewrite is textual and position-based, so formatting, key order, and
//! unrelated fields survive byte-for-byte.

use crate::manifest::parse_manifest;
use crate::registry::NpmClient;
use scout_core::error::Result;
use scout_core::types::{PlannedChange, UpdatePlan};
use tracing::{debug, warn};

/// Plans an update for every dependency declared in `text`.
///
/// Latest-version lookups run concurrently, one per distinct name, and a
/// failed lookup leaves its dependency untouched without failing the plan.
/// A declaration is rewritten only when:
///
/// - its declared range is a plain `^`/`~`/bare semver range (git URLs,
///   `file:` paths, tags, wildcards, and compound ranges are left alone), and
/// - the numeric portion differs from the registry's latest version.
///
/// The operator prefix is preserved: `^4.17.0` becomes `^4.17.21`,
/// `4.17.0` becomes `4.17.21`.
///
/// # Errors
///
/// Returns [`ScoutError::InvalidManifest`](scout_core::ScoutError) when
/// `text` is not valid JSON. Registry failures never propagate from here.
pub async fn plan_update(client: &NpmClient, text: &str) -> Result<UpdatePlan> {
    let info = parse_manifest(text)?;
    let deps = info.all();

    // The same name can appear in several sections; fetch it once.
    let names: Vec<String> = {
        let mut names: Vec<String> = deps.iter().map(|d| d.name.clone()).collect();
        names.sort_unstable();
        names.dedup();
        names
    };
    let latest_by_name = client.get_many(&names).await;

    let mut manifest = text.to_string();
    let mut changes = Vec::new();

    for dep in deps {
        let Some(latest) = latest_by_name.get(&dep.name) else {
            // Lookup failed and was already logged by the batch; declaration
            // stays as written.
            continue;
        };
        let Some((prefix, declared)) = split_plain_range(&dep.range) else {
            debug!(package = %dep.name, range = %dep.range, "range is not plain semver, leaving untouched");
            continue;
        };
        if node_semver::Version::parse(&latest.version).is_err() {
            warn!(package = %dep.name, version = %latest.version, "registry latest is not valid semver, leaving untouched");
            continue;
        }
        if declared == latest.version {
            continue;
        }

        let new_range = format!("{prefix}{}", latest.version);
        if replace_version_range(&mut manifest, &dep.name, &dep.range, &new_range) {
            changes.push(PlannedChange {
                name: dep.name.clone(),
                kind: dep.kind,
                from_range: dep.range.clone(),
                to_range: new_range,
            });
        }
    }

    Ok(UpdatePlan {
        manifest,
        changed: changes.len(),
        changes,
    })
}

/// Splits a plain range into its operator prefix and numeric portion.
///
/// Returns `None` for anything that is not `[^~]?digits[.digits...]` with an
/// optional prerelease/build suffix.
fn split_plain_range(range: &str) -> Option<(&str, &str)> {
    let (prefix, bare) = match range.as_bytes().first()? {
        b'^' => ("^", &range[1..]),
        b'~' => ("~", &range[1..]),
        _ => ("", range),
    };

    let mut parts = bare.splitn(3, '.');
    let core_ok = parts.all(|part| {
        // Final component may carry a prerelease/build suffix.
        let digits = part
            .split_once(['-', '+'])
            .map_or(part, |(numeric, _)| numeric);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    });

    (core_ok && !bare.is_empty()).then_some((prefix, bare))
}

/// Replaces one dependency's quoted range in the manifest text.
///
/// Walks `"{name}"` occurrences that are JSON keys (followed by a colon) and
/// rewrites the first whose value still equals `old`; occurrences already
/// rewritten, or name hits inside scripts and descriptions, are skipped. The
/// window after the colon is bounded so the search cannot drift into the
/// next key-value pair.
fn replace_version_range(manifest: &mut String, name: &str, old: &str, new: &str) -> bool {
    let key_pattern = format!("\"{name}\"");
    let old_pattern = format!("\"{old}\"");

    let mut search_start = 0;
    while let Some(rel_idx) = manifest[search_start..].find(&key_pattern) {
        let key_idx = search_start + rel_idx;
        let after_key = &manifest[key_idx + key_pattern.len()..];

        let trimmed = after_key.trim_start();
        if !trimmed.starts_with(':') {
            search_start = key_idx + key_pattern.len();
            continue;
        }

        let colon_idx = key_idx + key_pattern.len() + (after_key.len() - trimmed.len());
        let after_colon = &manifest[colon_idx..];
        // Manifest text is arbitrary UTF-8; back the window off to a char
        // boundary so the slice below cannot land mid-character.
        let mut window = after_colon.len().min(100 + old_pattern.len());
        while !after_colon.is_char_boundary(window) {
            window -= 1;
        }

        if let Some(value_rel) = after_colon[..window].find(&old_pattern) {
            let start = colon_idx + value_rel;
            manifest.replace_range(start..start + old_pattern.len(), &format!("\"{new}\""));
            return true;
        }

        // Key found but the value did not match (already rewritten, or a
        // same-named key elsewhere); keep scanning.
        search_start = key_idx + key_pattern.len();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::RegistryConfig;
    use scout_core::types::DependencyKind;

    fn packument(name: &str, latest: &str) -> String {
        format!(
            r#"{{"dist-tags": {{"latest": "{latest}"}}, "versions": {{"{latest}": {{}}}}, "time": {{"{latest}": "2024-01-01T00:00:00.000Z"}}, "name": "{name}"}}"#
        )
    }

    fn test_client(server: &mockito::Server) -> NpmClient {
        NpmClient::new(RegistryConfig {
            registry_url: server.url(),
            search_url: server.url(),
            ..RegistryConfig::default()
        })
    }

    #[test]
    fn test_split_plain_range() {
        assert_eq!(split_plain_range("^4.17.0"), Some(("^", "4.17.0")));
        assert_eq!(split_plain_range("~2.3.2"), Some(("~", "2.3.2")));
        assert_eq!(split_plain_range("4.17.21"), Some(("", "4.17.21")));
        assert_eq!(split_plain_range("1.2"), Some(("", "1.2")));
        assert_eq!(
            split_plain_range("^3.0.0-beta.1"),
            Some(("^", "3.0.0-beta.1"))
        );

        assert_eq!(split_plain_range(""), None);
        assert_eq!(split_plain_range("*"), None);
        assert_eq!(split_plain_range("latest"), None);
        assert_eq!(split_plain_range(">=1.0.0"), None);
        assert_eq!(split_plain_range("1.x"), None);
        assert_eq!(split_plain_range("git+https://github.com/u/r.git"), None);
        assert_eq!(split_plain_range("file:../local"), None);
        assert_eq!(split_plain_range("^1.0.0 || ^2.0.0"), None);
    }

    #[test]
    fn test_replace_version_range_skips_script_hits() {
        let mut text = String::from(
            r#"{
  "scripts": { "test": "vitest" },
  "devDependencies": { "vitest": "^3.1.0" }
}"#,
        );

        assert!(replace_version_range(&mut text, "vitest", "^3.1.0", "^3.1.4"));
        assert!(text.contains(r#""vitest": "^3.1.4""#));
        // The scripts entry is untouched.
        assert!(text.contains(r#""test": "vitest""#));
    }

    #[test]
    fn test_replace_version_range_multibyte_text_near_key() {
        // A long non-ASCII field after the dependency puts a 2-byte char on
        // the search-window boundary; the window must clamp, not panic.
        let description = "é".repeat(120);
        let mut text =
            format!(r#"{{"dependencies": {{"lib": "^1.0.0"}}, "description": "{description}"}}"#);

        assert!(replace_version_range(&mut text, "lib", "^1.0.0", "^2.0.0"));
        assert!(text.contains(r#""lib": "^2.0.0""#));
        assert!(text.contains(&description));
    }

    #[test]
    fn test_replace_version_range_duplicate_names() {
        let mut text = String::from(
            r#"{
  "dependencies": { "react": "^17.0.0" },
  "peerDependencies": { "react": "^17.0.0" }
}"#,
        );

        assert!(replace_version_range(&mut text, "react", "^17.0.0", "^18.2.0"));
        assert!(replace_version_range(&mut text, "react", "^17.0.0", "^18.2.0"));
        assert!(!text.contains("^17.0.0"));
        assert_eq!(text.matches("^18.2.0").count(), 2);
    }

    #[tokio::test]
    async fn test_plan_update_bumps_and_counts() {
        let mut server = mockito::Server::new_async().await;
        let _lodash = server
            .mock("GET", "/lodash")
            .with_status(200)
            .with_body(packument("lodash", "4.17.21"))
            .create_async()
            .await;

        let manifest = r#"{
  "dependencies": {
    "lodash": "^4.17.0"
  }
}"#;

        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 1);
        assert!(plan.manifest.contains(r#""lodash": "^4.17.21""#));
        assert!(!plan.manifest.contains("^4.17.0"));

        let change = &plan.changes[0];
        assert_eq!(change.name, "lodash");
        assert_eq!(change.kind, DependencyKind::Runtime);
        assert_eq!(change.from_range, "^4.17.0");
        assert_eq!(change.to_range, "^4.17.21");
    }

    #[tokio::test]
    async fn test_plan_update_up_to_date_is_noop() {
        let mut server = mockito::Server::new_async().await;
        let _lodash = server
            .mock("GET", "/lodash")
            .with_status(200)
            .with_body(packument("lodash", "4.17.21"))
            .create_async()
            .await;

        let manifest = r#"{"dependencies": {"lodash": "^4.17.21"}}"#;
        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 0);
        assert_eq!(plan.manifest, manifest);
    }

    #[tokio::test]
    async fn test_plan_update_preserves_operators() {
        let mut server = mockito::Server::new_async().await;
        for name in ["caret", "tilde", "pinned"] {
            let _m = server
                .mock("GET", format!("/{name}").as_str())
                .with_status(200)
                .with_body(packument(name, "2.0.0"))
                .create_async()
                .await;
        }

        let manifest = r#"{
  "dependencies": {
    "caret": "^1.0.0",
    "tilde": "~1.0.0",
    "pinned": "1.0.0"
  }
}"#;

        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 3);
        assert!(plan.manifest.contains(r#""caret": "^2.0.0""#));
        assert!(plan.manifest.contains(r#""tilde": "~2.0.0""#));
        assert!(plan.manifest.contains(r#""pinned": "2.0.0""#));
    }

    #[tokio::test]
    async fn test_plan_update_leaves_non_semver_ranges() {
        let mut server = mockito::Server::new_async().await;
        let _git = server
            .mock("GET", "/my-lib")
            .with_status(200)
            .with_body(packument("my-lib", "9.9.9"))
            .create_async()
            .await;
        let _star = server
            .mock("GET", "/anything")
            .with_status(200)
            .with_body(packument("anything", "9.9.9"))
            .create_async()
            .await;

        let manifest = r#"{
  "dependencies": {
    "my-lib": "git+https://github.com/user/repo.git",
    "anything": "*"
  }
}"#;

        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 0);
        assert_eq!(plan.manifest, manifest);
    }

    #[tokio::test]
    async fn test_plan_update_absorbs_lookup_failures() {
        let mut server = mockito::Server::new_async().await;
        let _good = server
            .mock("GET", "/good")
            .with_status(200)
            .with_body(packument("good", "2.0.0"))
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let manifest = r#"{
  "dependencies": {
    "good": "^1.0.0",
    "gone": "^1.0.0"
  }
}"#;

        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 1);
        assert!(plan.manifest.contains(r#""good": "^2.0.0""#));
        assert!(plan.manifest.contains(r#""gone": "^1.0.0""#));
    }

    #[tokio::test]
    async fn test_plan_update_sections_all_covered() {
        let mut server = mockito::Server::new_async().await;
        for name in ["a", "b", "c", "d"] {
            let _m = server
                .mock("GET", format!("/{name}").as_str())
                .with_status(200)
                .with_body(packument(name, "5.0.0"))
                .create_async()
                .await;
        }

        let manifest = r#"{
  "dependencies": {"a": "^1.0.0"},
  "devDependencies": {"b": "^1.0.0"},
  "peerDependencies": {"c": "^1.0.0"},
  "optionalDependencies": {"d": "^1.0.0"}
}"#;

        let client = test_client(&server);
        let plan = plan_update(&client, manifest).await.unwrap();

        assert_eq!(plan.changed, 4);
        let kinds: Vec<DependencyKind> = plan.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DependencyKind::Runtime,
                DependencyKind::Dev,
                DependencyKind::Peer,
                DependencyKind::Optional
            ]
        );
    }

    #[tokio::test]
    async fn test_plan_update_multibyte_manifest() {
        let mut server = mockito::Server::new_async().await;
        let _intl = server
            .mock("GET", "/intl")
            .with_status(200)
            .with_body(packument("intl", "2.0.0"))
            .create_async()
            .await;

        let manifest = format!(
            r#"{{"dependencies": {{"intl": "^1.0.0"}}, "description": "{}"}}"#,
            "é".repeat(120)
        );

        let client = test_client(&server);
        let plan = plan_update(&client, &manifest).await.unwrap();

        assert_eq!(plan.changed, 1);
        assert!(plan.manifest.contains(r#""intl": "^2.0.0""#));
    }

    #[tokio::test]
    async fn test_plan_update_invalid_manifest() {
        let server = mockito::Server::new_async().await;
        let client = test_client(&server);
        let err = plan_update(&client, "not json").await.unwrap_err();
        assert!(matches!(
            err,
            scout_core::ScoutError::InvalidManifest { .. }
        ));
    }
}
