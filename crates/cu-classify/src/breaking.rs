// breaking.rs — What kind of breaking change an entry describes.
//
// Kinds are scored the same way categories are: each matching pattern adds
// to the kind's score, and a `###` label naming the kind adds a bonus. The
// highest score wins; equal scores resolve deprecated > removed > renamed >
// changed. An entry with no signal at all is reported as a plain change.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifiedEntry;

const PATTERN_WEIGHT: u32 = 3;
const SECTION_BONUS: u32 = 2;
const DEFAULT_AREA: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakingKind {
    Removed,
    Renamed,
    Changed,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Breaking-change details for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingChangeInfo {
    pub kind: BreakingKind,
    /// Coarse area of the product the change touches, e.g. "Configuration".
    pub affected_area: String,
    pub severity: Severity,
}

impl BreakingKind {
    const ALL: [BreakingKind; 4] = [
        BreakingKind::Removed,
        BreakingKind::Renamed,
        BreakingKind::Changed,
        BreakingKind::Deprecated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BreakingKind::Removed => "removed",
            BreakingKind::Renamed => "renamed",
            BreakingKind::Changed => "changed",
            BreakingKind::Deprecated => "deprecated",
        }
    }

    /// Tie-break rank; higher wins.
    fn tie_rank(self) -> u8 {
        match self {
            BreakingKind::Deprecated => 3,
            BreakingKind::Removed => 2,
            BreakingKind::Renamed => 1,
            BreakingKind::Changed => 0,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            BreakingKind::Removed => Severity::High,
            BreakingKind::Changed => Severity::Medium,
            BreakingKind::Renamed | BreakingKind::Deprecated => Severity::Low,
        }
    }

    fn patterns(self) -> &'static [Regex] {
        match self {
            BreakingKind::Removed => &REMOVED,
            BreakingKind::Renamed => &RENAMED,
            BreakingKind::Changed => &CHANGED,
            BreakingKind::Deprecated => &DEPRECATED,
        }
    }
}

impl fmt::Display for BreakingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid breaking-change regex"))
        .collect()
}

static REMOVED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bremoved\b",
        r"(?i)\bno\s+longer\s+(?:available|supported|works?)\b",
        r"(?i)\bdiscontinued\b",
        r"(?i)\bdeleted\b",
        r"(?i)\bdropped\b",
    ])
});

static RENAMED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\brenamed?\b",
        r"(?i)\bnow\s+called\b",
        r"(?i)\bchanged?\s+(?:to|from)\b",
        r"(?i)\breplaced\s+by\b",
        r"(?i)\bis\s+now\b",
    ])
});

static CHANGED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\bChanged\b",
        r"(?i)\bbehavior\s+change",
        r"(?i)\bnow\s+(?:requires?|uses?|defaults?)\b",
        r"(?i)\bdifferent(?:ly)?\b",
        r"(?i)\bupdated\s+(?:default|behavior)\b",
    ])
});

static DEPRECATED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bdeprecated\b",
        r"(?i)\bwill\s+be\s+removed\b",
        r"(?i)\bscheduled\s+for\s+removal\b",
        r"(?i)\bobsolete\b",
        r"(?i)\blegacy\b",
    ])
});

// First match wins.
static AREAS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bAPI\b", "API"),
        (r"(?i)\bCLI\b", "CLI"),
        (r"(?i)\bconfig(?:uration)?\b", "Configuration"),
        (r"(?i)\bcommands?\b", "Commands"),
        (r"(?i)\bMCP\b", "MCP Integration"),
        (r"(?i)\bplugins?\b", "Plugins"),
        (r"(?i)\bhooks?\b", "Hooks"),
        (r"(?i)\bsettings?\b", "Settings"),
        (r"(?i)\benv(?:ironment)?\s*var(?:iable)?s?\b", "Environment"),
        (r"(?i)\bworkflows?\b", "Workflow"),
        (r"(?i)\bUI\b", "User Interface"),
    ]
    .into_iter()
    .map(|(p, area)| (Regex::new(p).expect("invalid affected-area regex"), area))
    .collect()
});

fn score(kind: BreakingKind, content: &str, section: Option<&str>) -> u32 {
    let matches = kind.patterns().iter().filter(|re| re.is_match(content)).count() as u32;
    let bonus = match section {
        Some(s) if s.eq_ignore_ascii_case(kind.as_str()) => SECTION_BONUS,
        _ => 0,
    };
    matches * PATTERN_WEIGHT + bonus
}

fn affected_area(content: &str) -> &'static str {
    AREAS
        .iter()
        .find(|(re, _)| re.is_match(content))
        .map(|(_, area)| *area)
        .unwrap_or(DEFAULT_AREA)
}

/// Determine kind, affected area and severity for a breaking entry.
///
/// Returns `None` for entries not classified as breaking.
pub fn detect_breaking_change(entry: &ClassifiedEntry) -> Option<BreakingChangeInfo> {
    if entry.category != crate::EntryCategory::Breaking {
        return None;
    }
    let content = entry.content();
    let section = entry.entry.section.as_deref();

    let kind = BreakingKind::ALL
        .into_iter()
        .map(|kind| (kind, score(kind, content, section)))
        .filter(|(_, s)| *s > 0)
        .max_by_key(|(kind, s)| (*s, kind.tie_rank()))
        .map(|(kind, _)| kind)
        .unwrap_or(BreakingKind::Changed);

    Some(BreakingChangeInfo {
        kind,
        affected_area: affected_area(content).to_string(),
        severity: kind.severity(),
    })
}
