// summary.rs — Grouping and counting over classified entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{ActionType, EntryCategory};
use crate::classifier::ClassifiedEntry;

/// Counts over a batch of classified entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub action_required: usize,
    pub by_category: BTreeMap<EntryCategory, usize>,
    pub by_action_type: BTreeMap<ActionType, usize>,
}

impl SummaryStats {
    pub fn count(&self, category: EntryCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

pub fn group_by_category(
    entries: &[ClassifiedEntry],
) -> BTreeMap<EntryCategory, Vec<&ClassifiedEntry>> {
    let mut groups: BTreeMap<EntryCategory, Vec<&ClassifiedEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.category).or_default().push(entry);
    }
    groups
}

pub fn group_by_action_type(
    entries: &[ClassifiedEntry],
) -> BTreeMap<ActionType, Vec<&ClassifiedEntry>> {
    let mut groups: BTreeMap<ActionType, Vec<&ClassifiedEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.action_type).or_default().push(entry);
    }
    groups
}

/// Entries whose category requires the user to do something.
pub fn actionable_entries(entries: &[ClassifiedEntry]) -> Vec<&ClassifiedEntry> {
    entries.iter().filter(|e| e.action_required).collect()
}

pub fn summary_stats(entries: &[ClassifiedEntry]) -> SummaryStats {
    let mut stats = SummaryStats {
        total: entries.len(),
        ..SummaryStats::default()
    };
    for entry in entries {
        *stats.by_category.entry(entry.category).or_default() += 1;
        *stats.by_action_type.entry(entry.action_type).or_default() += 1;
        if entry.action_required {
            stats.action_required += 1;
        }
    }
    stats
}
