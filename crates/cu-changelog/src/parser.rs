// parser.rs — Split a changelog document into per-version entries.
//
// Only line-level structure matters:
//   `## 2.1.22 (2025-01-10)`  starts a version section (date optional)
//   `### Added`               sets the section label for following bullets
//   `- text` / `* text`       is one entry
//
// Everything else (prose, code fences, the metadata block) is ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::identity::entry_id;

static VERSION_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (\d+\.\d+\.\d+)(?:\s+\((.*)\))?").expect("invalid version heading regex")
});

static SUBSECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(\w+)").expect("invalid subsection regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)").expect("invalid bullet regex"));

/// One bullet-point change note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Version heading the bullet appeared under.
    pub version: String,
    /// Parenthetical text from the version heading, usually a release date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Most recent `###` label before the bullet ("Added", "Fixed", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Bullet text without the marker.
    pub content: String,
    /// The untouched source line, kept for auditing.
    pub raw_line: String,
}

impl RawEntry {
    /// Content-derived identity of this entry. See [`entry_id`].
    pub fn id(&self) -> String {
        entry_id(&self.version, &self.content)
    }
}

/// All entries under one version heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSection {
    pub version: String,
    pub date: Option<String>,
    pub entries: Vec<RawEntry>,
}

/// Order-preserving mapping from version to its entries.
///
/// Versions keep the order of their first heading in the document. A
/// repeated heading replaces the earlier entries but keeps the position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSections {
    sections: Vec<VersionSection>,
}

impl ChangelogSections {
    /// Entries for one version, if the document has that heading.
    pub fn get(&self, version: &str) -> Option<&[RawEntry]> {
        self.sections
            .iter()
            .find(|s| s.version == version)
            .map(|s| s.entries.as_slice())
    }

    /// Sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &VersionSection> {
        self.sections.iter()
    }

    /// Version strings in document order.
    pub fn versions(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.version.clone()).collect()
    }

    /// Every entry of every version, in document order.
    pub fn all_entries(&self) -> Vec<RawEntry> {
        self.sections
            .iter()
            .flat_map(|s| s.entries.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn insert(&mut self, section: VersionSection) {
        match self
            .sections
            .iter_mut()
            .find(|s| s.version == section.version)
        {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }
}

/// Parse every version section of a changelog document.
pub fn parse_changelog_sections(content: &str) -> ChangelogSections {
    let mut sections = ChangelogSections::default();
    let mut current: Option<VersionSection> = None;
    let mut current_label: Option<String> = None;

    for line in content.lines() {
        if let Some(caps) = VERSION_HEADING_RE.captures(line) {
            if let Some(done) = current.take() {
                sections.insert(done);
            }
            current = Some(VersionSection {
                version: caps[1].to_string(),
                date: caps.get(2).map(|m| m.as_str().trim().to_string()),
                entries: Vec::new(),
            });
            current_label = None;
            continue;
        }

        // Text before the first version heading is not part of any section.
        let Some(section) = current.as_mut() else {
            continue;
        };

        let trimmed = line.trim();

        if let Some(caps) = SUBSECTION_RE.captures(trimmed) {
            current_label = Some(caps[1].to_string());
            continue;
        }

        if let Some(caps) = BULLET_RE.captures(trimmed) {
            section.entries.push(RawEntry {
                version: section.version.clone(),
                date: section.date.clone(),
                section: current_label.clone(),
                content: caps[1].to_string(),
                raw_line: line.to_string(),
            });
        }
    }

    if let Some(done) = current.take() {
        sections.insert(done);
    }

    tracing::debug!(versions = sections.len(), "parsed changelog sections");
    sections
}
