//! # cu-classify
//!
//! Assigns every changelog entry a category, the kind of follow-up it calls
//! for, and the concrete tokens (environment variables, commands, flags,
//! settings files, shortcuts) worth surfacing to the user.
//!
//! ## Key components
//!
//! - [`EntryCategory`] / [`ActionType`] — closed sets with an exhaustive
//!   definition table
//! - [`classify`] — section fast path, then marker scoring with a fixed
//!   tie-break priority
//! - [`extract_details`] — backtick and shortcut token extraction
//! - [`ClassifiedEntry`] — the value object produced per entry
//! - [`detect_breaking_change`] — what kind of breaking change an entry is
//! - [`summary_stats`] and the grouping helpers in [`summary`]

pub mod breaking;
pub mod category;
pub mod classifier;
pub mod extract;
pub mod summary;

pub use breaking::{detect_breaking_change, BreakingChangeInfo, BreakingKind, Severity};
pub use category::{ActionType, CategoryDefinition, EntryCategory};
pub use classifier::{
    classify, classify_entries, classify_entry, score_categories, Classification, ClassifiedEntry,
};
pub use extract::{extract_details, ExtractedDetails};
pub use summary::{
    actionable_entries, group_by_action_type, group_by_category, summary_stats, SummaryStats,
};
