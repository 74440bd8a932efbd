//! Package-name extraction from arbitrary text.
//!
//! Scans editor selections, clipboard contents, or manifest text for
//! plausible package names. Four pattern families run in order; scoped
//! matches record protected ranges so the bareword fallback cannot re-split
//! `@scope/name` into two spurious tokens.
//!
//! This is a best-effort heuristic over free-form text, not a parser. The
//! denylist keeps the obvious noise out; ordinary prose words can and will
//! leak through the bareword fallback.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Tokens never accepted as package names (case-sensitive exact match).
const RESERVED_TOKENS: &[&str] = &[
    "true",
    "false",
    "null",
    "undefined",
    "function",
    "class",
    "const",
    "let",
    "var",
    "import",
    "export",
    "from",
    "require",
];

/// `"name": "^1.2.3"` — a quoted manifest key with a version-shaped value.
static QUOTED_KEY_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(@?[A-Za-z0-9][A-Za-z0-9._/-]*)"\s*:\s*"[\^~]?\d[^"]*""#)
        .expect("quoted-key pattern is valid")
});

/// Bare `name@1.2.3`. The character before the name must not be `@`, `/`,
/// or a name character, so the version suffix of a scoped package never
/// yields its bare trailing segment.
static NAME_AT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^@/A-Za-z0-9._-])([A-Za-z0-9][A-Za-z0-9._-]*)@\d[0-9A-Za-z.+-]*")
        .expect("name@version pattern is valid")
});

/// Scoped `@scope/name`, optionally `@version`-suffixed. The full match
/// becomes a protected range.
static SCOPED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z0-9][A-Za-z0-9._-]*)/([A-Za-z0-9][A-Za-z0-9._-]*)(?:@\d[0-9A-Za-z.+-]*)?")
        .expect("scoped pattern is valid")
});

/// Generic bareword fallback: any run of alphanumerics, dots, underscores,
/// hyphens. Deliberately broad.
static BAREWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9._-]*").expect("bareword pattern is valid"));

/// A bare semver-range string (`1.2.3`, `^1.2`, `~0.4.0-beta.1`).
static VERSION_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\^~]?\d+(?:\.\d+){0,2}(?:[-+][0-9A-Za-z.-]+)?$")
        .expect("version-range pattern is valid")
});

/// Extracts candidate package names from arbitrary text.
///
/// Returns a de-duplicated set; insertion order is irrelevant. Candidates
/// that are reserved tokens, purely numeric, bare version ranges, or scope
/// fragments without a `/name` suffix are discarded.
///
/// # Examples
///
/// ```
/// use scout_npm::extract_package_names;
///
/// let names = extract_package_names("@types/node@20.0.0 and lodash");
/// assert!(names.contains("@types/node"));
/// assert!(names.contains("lodash"));
/// assert!(!names.contains("types"));
/// assert!(!names.contains("node"));
/// ```
pub fn extract_package_names(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    // Family 1: quoted key with version value.
    for captures in QUOTED_KEY_VERSION.captures_iter(text) {
        accept(&mut names, &captures[1]);
    }

    // Family 2: bare name@version.
    for captures in NAME_AT_VERSION.captures_iter(text) {
        accept(&mut names, &captures[1]);
    }

    // Family 3: scoped names. Their full character ranges are protected
    // against the bareword fallback below.
    let mut protected: Vec<(usize, usize)> = Vec::new();
    for captures in SCOPED_NAME.captures_iter(text) {
        let whole = captures.get(0).expect("match 0 always present");
        protected.push((whole.start(), whole.end()));
        accept(&mut names, &format!("@{}/{}", &captures[1], &captures[2]));
    }

    // Family 4: bareword fallback, skipping anything inside a scoped match.
    for token in BAREWORD.find_iter(text) {
        let overlaps = protected
            .iter()
            .any(|&(start, end)| token.start() < end && token.end() > start);
        if !overlaps {
            accept(&mut names, token.as_str());
        }
    }

    names
}

fn accept(names: &mut BTreeSet<String>, candidate: &str) {
    if is_plausible_name(candidate) {
        names.insert(candidate.to_string());
    }
}

/// Applies the denylist and shape filters from the extraction rules.
fn is_plausible_name(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    if RESERVED_TOKENS.contains(&candidate) {
        return false;
    }
    if candidate.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if VERSION_RANGE.is_match(candidate) {
        return false;
    }
    // A scope fragment without its /name suffix is not a package.
    if candidate.starts_with('@') && !candidate.contains('/') {
        return false;
    }
    true
}
