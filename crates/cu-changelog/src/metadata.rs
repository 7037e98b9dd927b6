// metadata.rs — Leading metadata block of a fetched changelog.
//
// A fetched changelog starts with a block of `key: value` lines between two
// `---` lines:
//
//   ---
//   latest_version: 2.1.22
//   fetched_at: 2025-01-15T10:00:00Z
//   total_versions: 140
//   source: https://example.com/CHANGELOG.md
//   ---
//
// The block is optional. Missing keys fall back to defaults so a truncated
// document still yields usable metadata.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---").expect("invalid frontmatter regex")
});

/// Metadata describing where a changelog came from and what it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogMetadata {
    /// Latest version declared by the fetcher, or `"unknown"`.
    pub latest_version: String,
    /// When the document was fetched (RFC 3339), or the parse time if absent.
    pub fetched_at: String,
    /// Number of versions the fetcher saw, or `"unknown"`.
    pub total_versions: String,
    /// Where the document was fetched from (may be empty).
    pub source: String,
}

/// Parse the leading `---` block into key/value pairs.
///
/// Lines without a colon, or with an empty key, are ignored. Returns an empty
/// map when the document does not start with a metadata block.
pub fn parse_frontmatter(content: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    let Some(caps) = FRONTMATTER_RE.captures(content) else {
        return fields;
    };

    for line in caps[1].lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            fields.insert(key.to_string(), value.trim().to_string());
        }
    }

    fields
}

/// Extract [`ChangelogMetadata`] from a document, applying defaults.
pub fn extract_metadata(content: &str) -> ChangelogMetadata {
    let mut fields = parse_frontmatter(content);

    ChangelogMetadata {
        latest_version: fields
            .remove("latest_version")
            .unwrap_or_else(|| "unknown".to_string()),
        fetched_at: fields
            .remove("fetched_at")
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        total_versions: fields
            .remove("total_versions")
            .unwrap_or_else(|| "unknown".to_string()),
        source: fields.remove("source").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---\nlatest_version: 2.1.22\nfetched_at: 2025-01-15T10:00:00Z\ntotal_versions: 3\nsource: https://example.com/CHANGELOG.md\n---\n\n## 2.1.22\n- Something\n";

    #[test]
    fn parses_all_known_keys() {
        let meta = extract_metadata(DOC);
        assert_eq!(meta.latest_version, "2.1.22");
        assert_eq!(meta.fetched_at, "2025-01-15T10:00:00Z");
        assert_eq!(meta.total_versions, "3");
        // Values keep everything after the first colon.
        assert_eq!(meta.source, "https://example.com/CHANGELOG.md");
    }

    #[test]
    fn missing_block_uses_defaults() {
        let meta = extract_metadata("## 1.0.0\n- Initial release\n");
        assert_eq!(meta.latest_version, "unknown");
        assert_eq!(meta.total_versions, "unknown");
        assert_eq!(meta.source, "");
        assert!(!meta.fetched_at.is_empty());
    }

    #[test]
    fn block_must_be_at_document_start() {
        let fields = parse_frontmatter("intro\n---\nlatest_version: 1.0.0\n---\n");
        assert!(fields.is_empty());
    }

    #[test]
    fn ignores_lines_without_key() {
        let fields = parse_frontmatter("---\n: orphan\nnot a pair\nkey: value\n---\n");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["key"], "value");
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let meta = extract_metadata("---\r\nlatest_version: 3.0.0\r\n---\r\n");
        assert_eq!(meta.latest_version, "3.0.0");
    }
}
