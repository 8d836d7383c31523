use semver::Version;

/// Parse a version string into a semver::Version, normalizing common forms.
///
/// Strips a leading 'v' and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Whether a version string is a pre-release.
///
/// Strings that do not parse as semver at all are NOT considered
/// pre-releases; they cannot be proven to be one.
pub fn is_prerelease(version: &str) -> bool {
    parse_version(version).is_some_and(|v| !v.pre.is_empty())
}

/// Split a version segment into its range operator prefix and bare version.
///
/// "^1.0.0" -> ("^", "1.0.0"), "~2.1" -> ("~", "2.1"), "1.0.0" -> ("", "1.0.0")
pub fn split_range_operator(version: &str) -> (&str, &str) {
    match version.as_bytes().first() {
        Some(b'^') | Some(b'~') => version.split_at(1),
        _ => ("", version),
    }
}

/// Sort version strings newest-first by semver comparison.
///
/// Strings that fail to parse are dropped. Used by registries that return
/// versions as unordered object keys.
pub fn sort_newest_first(versions: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut parsed: Vec<(String, Version)> = versions
        .into_iter()
        .filter_map(|v| parse_version(&v).map(|parsed| (v, parsed)))
        .collect();

    parsed.sort_by(|(_, a), (_, b)| b.cmp(a));

    parsed.into_iter().map(|(v, _)| v).collect()
}
