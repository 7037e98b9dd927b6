// version.rs — Dotted version parsing and ordering.
//
// Versions are compared as tuples of non-negative integers. Parsing is best
// effort and never fails: anything unparseable in a segment becomes 0, so a
// malformed version string still has a well-defined position in the order.

use std::cmp::Ordering;

/// Parse a version string into its numeric segments.
///
/// - a leading `v`/`V` is dropped
/// - everything from the first `(`, `-`, `+` or whitespace onwards is treated
///   as a label and dropped (`"2.1.22 (2025-01-10)"`, `"2.1.0-beta"`)
/// - remaining characters other than digits and dots are removed
/// - each dot-separated segment is parsed as an integer, defaulting to 0
///
/// ```
/// use cu_changelog::parse_version;
/// assert_eq!(parse_version("v2.1.22"), vec![2, 1, 22]);
/// assert_eq!(parse_version("garbage"), vec![0]);
/// ```
pub fn parse_version(version: &str) -> Vec<u64> {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let core = match trimmed.find(|c: char| c == '(' || c == '-' || c == '+' || c.is_whitespace()) {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };

    let cleaned: String = core
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned
        .split('.')
        .map(|segment| segment.parse::<u64>().unwrap_or(0))
        .collect()
}

/// Compare two version strings.
///
/// The shorter tuple is padded with zeros, so `"1.2"` equals `"1.2.0"`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let va = parse_version(a);
    let vb = parse_version(b);
    let len = va.len().max(vb.len());

    for i in 0..len {
        let na = va.get(i).copied().unwrap_or(0);
        let nb = vb.get(i).copied().unwrap_or(0);
        match na.cmp(&nb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Sort versions newest first.
pub fn sort_versions_desc(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}
