// classifier.rs — Category assignment for raw changelog entries.
//
// Two steps. A recognised `###` section label ("Fixed", "Improved",
// "Removed", "Changed") decides the category outright. Otherwise every
// category's markers are counted against the content and the highest
// count wins, with ties broken by `EntryCategory::PRIORITY`. Entries that
// match nothing fall back to improvement under "Added" and fix elsewhere,
// with low confidence.

use serde::{Deserialize, Serialize};

use cu_changelog::RawEntry;

use crate::category::{ActionType, EntryCategory};
use crate::extract::{extract_details, ExtractedDetails};

const SECTION_CONFIDENCE: f64 = 0.9;
const ADDED_FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_CONFIDENCE: f64 = 0.3;
const SCORE_BASE_CONFIDENCE: f64 = 0.5;
const SCORE_STEP_CONFIDENCE: f64 = 0.15;
const MAX_SCORED_CONFIDENCE: f64 = 0.95;

/// Category plus how sure the classifier is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: EntryCategory,
    pub confidence: f64,
}

/// A raw entry with its category, follow-up and extracted tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub entry: RawEntry,
    pub category: EntryCategory,
    pub action_required: bool,
    pub action_type: ActionType,
    pub extracted_details: ExtractedDetails,
    pub confidence: f64,
}

impl ClassifiedEntry {
    pub fn id(&self) -> String {
        self.entry.id()
    }

    pub fn version(&self) -> &str {
        &self.entry.version
    }

    pub fn content(&self) -> &str {
        &self.entry.content
    }
}

fn category_from_section(section: &str) -> Option<EntryCategory> {
    match section.to_ascii_lowercase().as_str() {
        "fixed" => Some(EntryCategory::Fix),
        "improved" => Some(EntryCategory::Improvement),
        "removed" | "changed" => Some(EntryCategory::Breaking),
        _ => None,
    }
}

/// Number of matching markers per category, in priority order.
///
/// Each marker counts at most once per entry.
pub fn score_categories(content: &str) -> Vec<(EntryCategory, usize)> {
    EntryCategory::PRIORITY
        .iter()
        .map(|&category| {
            let score = category
                .markers()
                .iter()
                .filter(|re| re.is_match(content))
                .count();
            (category, score)
        })
        .collect()
}

/// Decide the category of one entry.
pub fn classify(entry: &RawEntry) -> Classification {
    if let Some(category) = entry.section.as_deref().and_then(category_from_section) {
        return Classification {
            category,
            confidence: SECTION_CONFIDENCE,
        };
    }

    // Scores come back in priority order, so the first maximum wins ties.
    let best = score_categories(&entry.content)
        .into_iter()
        .filter(|(_, score)| *score > 0)
        .fold(None, |best: Option<(EntryCategory, usize)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        });

    match best {
        Some((category, score)) => Classification {
            category,
            confidence: (SCORE_BASE_CONFIDENCE + SCORE_STEP_CONFIDENCE * score as f64)
                .min(MAX_SCORED_CONFIDENCE),
        },
        None => {
            let added = entry
                .section
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("added"));
            if added {
                Classification {
                    category: EntryCategory::Improvement,
                    confidence: ADDED_FALLBACK_CONFIDENCE,
                }
            } else {
                Classification {
                    category: EntryCategory::Fix,
                    confidence: FALLBACK_CONFIDENCE,
                }
            }
        }
    }
}

/// Classify one entry and attach its definition and extracted tokens.
pub fn classify_entry(entry: RawEntry) -> ClassifiedEntry {
    let Classification {
        category,
        confidence,
    } = classify(&entry);
    let definition = category.definition();
    let extracted_details = extract_details(&entry.content);

    ClassifiedEntry {
        entry,
        category,
        action_required: definition.action_required,
        action_type: definition.action_type,
        extracted_details,
        confidence,
    }
}

/// Classify a batch, preserving order.
pub fn classify_entries(entries: &[RawEntry]) -> Vec<ClassifiedEntry> {
    let classified: Vec<ClassifiedEntry> =
        entries.iter().cloned().map(classify_entry).collect();
    tracing::debug!(count = classified.len(), "classified changelog entries");
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(section: Option<&str>, content: &str) -> RawEntry {
        RawEntry {
            version: "2.1.22".to_string(),
            date: None,
            section: section.map(str::to_string),
            content: content.to_string(),
            raw_line: format!("- {content}"),
        }
    }

    #[test]
    fn env_var_entry_is_config() {
        let c = classify_entry(entry(Some("Added"), "New `CLAUDE_CODE_TMPDIR` env var"));
        assert_eq!(c.category, EntryCategory::Config);
        assert_eq!(c.action_type, ActionType::ConfigUpdate);
        assert!(c.action_required);
        assert_eq!(c.extracted_details.env_vars, vec!["CLAUDE_CODE_TMPDIR"]);
    }

    #[test]
    fn slash_command_entry_is_command() {
        let c = classify_entry(entry(Some("Added"), "Added `/teleport` command"));
        assert_eq!(c.category, EntryCategory::Command);
        assert_eq!(c.action_type, ActionType::LearnCommand);
        assert_eq!(c.extracted_details.commands, vec!["/teleport"]);
    }

    #[test]
    fn fixed_section_wins_over_content() {
        let c = classify(&entry(Some("Fixed"), "MCP server `/mcp` now reconnects"));
        assert_eq!(c.category, EntryCategory::Fix);
        assert_eq!(c.confidence, SECTION_CONFIDENCE);
    }

    #[test]
    fn removed_and_changed_sections_are_breaking() {
        for section in ["Removed", "changed"] {
            let c = classify(&entry(Some(section), "anything at all"));
            assert_eq!(c.category, EntryCategory::Breaking);
        }
    }

    #[test]
    fn tie_goes_to_higher_priority_category() {
        // One breaking marker and one improvement marker.
        let c = classify(&entry(None, "Removed the legacy renderer, startup is faster"));
        assert_eq!(c.category, EntryCategory::Breaking);
    }

    #[test]
    fn higher_score_beats_priority() {
        // Two improvement markers against one breaking marker.
        let c = classify(&entry(None, "Removed padding for better performance"));
        assert_eq!(c.category, EntryCategory::Improvement);
    }

    #[test]
    fn confidence_grows_with_score_and_is_capped() {
        let one = classify(&entry(None, "Handles crash"));
        assert!((one.confidence - 0.65).abs() < 1e-9);

        let many = classify(&entry(
            None,
            "Fix bug: crash, error and regression issue",
        ));
        assert_eq!(many.category, EntryCategory::Fix);
        assert_eq!(many.confidence, MAX_SCORED_CONFIDENCE);
    }

    #[test]
    fn unmatched_added_entry_is_improvement() {
        let c = classify(&entry(Some("Added"), "Sparkles"));
        assert_eq!(c.category, EntryCategory::Improvement);
        assert_eq!(c.confidence, ADDED_FALLBACK_CONFIDENCE);
    }

    #[test]
    fn unmatched_entry_falls_back_to_fix() {
        let c = classify(&entry(None, "Sparkles"));
        assert_eq!(c.category, EntryCategory::Fix);
        assert_eq!(c.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn scores_are_in_priority_order() {
        let scores = score_categories("Faster startup");
        let order: Vec<EntryCategory> = scores.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, EntryCategory::PRIORITY.to_vec());
        let improvement = scores
            .iter()
            .find(|(c, _)| *c == EntryCategory::Improvement)
            .unwrap();
        assert_eq!(improvement.1, 1);
    }

    #[test]
    fn classify_entries_preserves_order_and_identity() {
        let raw = vec![
            entry(Some("Fixed"), "Fixed a crash"),
            entry(Some("Added"), "Added `/teleport` command"),
        ];
        let classified = classify_entries(&raw);
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].id(), raw[0].id());
        assert_eq!(classified[1].content(), "Added `/teleport` command");
        assert_eq!(classified[1].version(), "2.1.22");
    }
}
