// category.rs — Entry categories, action types and their definition table.
//
// Categories are a closed set. Each one maps, through an exhaustive match,
// to the follow-up it implies and to the marker patterns that vote for it
// during scoring. Adding a category without filling in the table does not
// compile.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// What kind of change an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    /// Environment variables, settings files, flags to configure.
    Config,
    /// New slash commands, CLI flags or keyboard shortcuts.
    Command,
    /// Tooling and integrations (MCP, plugins, editors).
    Tool,
    /// Larger structural changes (new systems, SDK/API).
    Architecture,
    /// Bug fixes.
    Fix,
    /// Performance and UX improvements.
    Improvement,
    /// Removals and behaviour changes that need migration.
    Breaking,
}

/// The follow-up an entry calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Awareness,
    ConfigUpdate,
    LearnCommand,
    Migrate,
}

/// Static facts about a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub action_type: ActionType,
    pub action_required: bool,
}

impl EntryCategory {
    /// Every category, highest tie-break priority first.
    ///
    /// When two categories score the same, the one that matters more to the
    /// user wins.
    pub const PRIORITY: [EntryCategory; 7] = [
        EntryCategory::Breaking,
        EntryCategory::Architecture,
        EntryCategory::Config,
        EntryCategory::Command,
        EntryCategory::Tool,
        EntryCategory::Improvement,
        EntryCategory::Fix,
    ];

    /// Position in [`Self::PRIORITY`]; lower wins ties.
    pub fn priority_rank(self) -> usize {
        match self {
            EntryCategory::Breaking => 0,
            EntryCategory::Architecture => 1,
            EntryCategory::Config => 2,
            EntryCategory::Command => 3,
            EntryCategory::Tool => 4,
            EntryCategory::Improvement => 5,
            EntryCategory::Fix => 6,
        }
    }

    pub fn definition(self) -> CategoryDefinition {
        let (action_type, action_required) = match self {
            EntryCategory::Config => (ActionType::ConfigUpdate, true),
            EntryCategory::Command => (ActionType::LearnCommand, true),
            EntryCategory::Tool => (ActionType::Awareness, false),
            EntryCategory::Architecture => (ActionType::Awareness, true),
            EntryCategory::Fix => (ActionType::Awareness, false),
            EntryCategory::Improvement => (ActionType::Awareness, false),
            EntryCategory::Breaking => (ActionType::Migrate, true),
        };
        CategoryDefinition {
            action_type,
            action_required,
        }
    }

    /// Regex sources of the markers that vote for this category.
    fn marker_patterns(self) -> &'static [&'static str] {
        match self {
            EntryCategory::Config => &[
                r"(?i)env\s*var",
                r"(?i)environment\s*variable",
                r"(?i)settings\.json",
                r"(?i)CLAUDE\.md",
                r"(?i)\bconfigure\b",
                r"(?i)\bflag\b",
                r"(?i)`[A-Z_]+`.*(?:env|variable|setting)",
            ],
            EntryCategory::Command => &[
                r"/\w+",
                r"(?i)Ctrl\+\w",
                r"(?i)Cmd\+\w",
                r"--\w+",
                r"(?i)\bshortcut\b",
                r"(?i)slash\s*command",
                r"(?i)keyboard\s*shortcut",
            ],
            EntryCategory::Tool => &[
                r"\bMCP\b",
                r"mcp__",
                r"(?i)\bplugin\b",
                r"(?i)\btool\b",
                r"(?i)\bintegration\b",
                r"\bChrome\b",
                r"(?i)\bVSCode\b",
                r"(?i)\bVS\s*Code\b",
                r"(?i)\bextension\b",
            ],
            EntryCategory::Architecture => &[
                r"(?i)\bsystem\b",
                r"(?i)\breplacing\b",
                r"(?i)\bnew\s+\w+\s+system\b",
                r"(?i)\barchitecture\b",
                r"(?i)Task\s*system",
                r"\bSDK\b",
                r"\bAPI\b",
            ],
            EntryCategory::Fix => &[
                r"\bFixed\b",
                r"(?i)\bfix\b",
                r"(?i)\bbug\b",
                r"(?i)\bissue\b",
                r"(?i)\bcrash\b",
                r"(?i)\berror\b",
                r"(?i)\bregression\b",
            ],
            EntryCategory::Improvement => &[
                r"\bImproved\b",
                r"(?i)\bimprovement\b",
                r"(?i)\bperformance\b",
                r"(?i)\breliability\b",
                r"\bUX\b",
                r"(?i)\bfaster\b",
                r"(?i)\bbetter\b",
                r"(?i)\benhanced\b",
            ],
            EntryCategory::Breaking => &[
                r"\bRemoved\b",
                r"\bChanged\b",
                r"(?i)\bbreaking\b",
                r"(?i)no\s*longer\b",
                r"(?i)\binstead\b",
                r"(?i)\bdeprecated\b",
                r"(?i)\bmigrat",
            ],
        }
    }

    /// Compiled marker patterns for this category.
    pub fn markers(self) -> &'static [Regex] {
        MARKERS
            .get(&self)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryCategory::Config => "config",
            EntryCategory::Command => "command",
            EntryCategory::Tool => "tool",
            EntryCategory::Architecture => "architecture",
            EntryCategory::Fix => "fix",
            EntryCategory::Improvement => "improvement",
            EntryCategory::Breaking => "breaking",
        }
    }
}

static MARKERS: LazyLock<HashMap<EntryCategory, Vec<Regex>>> = LazyLock::new(|| {
    EntryCategory::PRIORITY
        .iter()
        .map(|&category| {
            let compiled = category
                .marker_patterns()
                .iter()
                .map(|p| Regex::new(p).expect("invalid category marker regex"))
                .collect();
            (category, compiled)
        })
        .collect()
});

impl fmt::Display for EntryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Awareness => "awareness",
            ActionType::ConfigUpdate => "config_update",
            ActionType::LearnCommand => "learn_command",
            ActionType::Migrate => "migrate",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_rank_matches_priority_order() {
        for (i, category) in EntryCategory::PRIORITY.iter().enumerate() {
            assert_eq!(category.priority_rank(), i);
        }
    }

    #[test]
    fn every_category_has_compiled_markers() {
        for category in EntryCategory::PRIORITY {
            assert!(!category.markers().is_empty(), "{category} has no markers");
        }
    }

    #[test]
    fn definition_table() {
        assert_eq!(
            EntryCategory::Config.definition().action_type,
            ActionType::ConfigUpdate
        );
        assert_eq!(
            EntryCategory::Breaking.definition().action_type,
            ActionType::Migrate
        );
        assert!(EntryCategory::Architecture.definition().action_required);
        assert!(!EntryCategory::Tool.definition().action_required);
        assert!(!EntryCategory::Fix.definition().action_required);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ActionType::LearnCommand).unwrap();
        assert_eq!(json, "\"learn_command\"");
        let restored: EntryCategory = serde_json::from_str("\"architecture\"").unwrap();
        assert_eq!(restored, EntryCategory::Architecture);
    }
}
