// diff.rs — Which entries are new since the last checkpoint.
//
// A checkpoint is the last version the user acknowledged plus the set of
// entry identities already acknowledged. Versions strictly above the
// checkpoint version are new; inside them, entries whose identity is
// already acknowledged are dropped so an overlapping re-fetch does not
// resurface them. Without a checkpoint version everything is new.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ChangelogError;
use crate::metadata::{extract_metadata, ChangelogMetadata};
use crate::parser::{parse_changelog_sections, RawEntry};
use crate::version::{compare_versions, sort_versions_desc};

/// Baseline a diff is computed against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Last acknowledged version; `None` means nothing has been seen yet.
    pub last_acknowledged_version: Option<String>,
    /// Identities of entries already acknowledged.
    #[serde(default)]
    pub acknowledged_entry_ids: HashSet<String>,
}

impl Checkpoint {
    /// A checkpoint for a user who has never acknowledged anything.
    pub fn first_run() -> Self {
        Self::default()
    }

    /// A checkpoint at `version` with the given acknowledged identities.
    pub fn at(version: impl Into<String>, acknowledged: impl IntoIterator<Item = String>) -> Self {
        Self {
            last_acknowledged_version: Some(version.into()),
            acknowledged_entry_ids: acknowledged.into_iter().collect(),
        }
    }
}

/// Outcome of comparing a document against a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// True when at least one new entry was found.
    pub has_updates: bool,
    /// The checkpoint version the diff started from.
    pub from_version: Option<String>,
    /// Latest version declared by the document's metadata block.
    pub to_version: String,
    /// New versions, newest first.
    pub new_versions: Vec<String>,
    /// New entries in document order.
    pub new_entries: Vec<RawEntry>,
    /// Parsed metadata block.
    pub metadata: ChangelogMetadata,
}

/// Compute the new versions and entries of `content` relative to `checkpoint`.
///
/// `to_version` always comes from the metadata block rather than the highest
/// parsed heading, so a truncated document still reports its target.
pub fn detect_diff(content: &str, checkpoint: &Checkpoint) -> DiffResult {
    let metadata = extract_metadata(content);
    let sections = parse_changelog_sections(content);

    let mut new_versions = Vec::new();
    let mut new_entries = Vec::new();

    match checkpoint.last_acknowledged_version.as_deref() {
        None => {
            for section in sections.iter() {
                new_versions.push(section.version.clone());
                new_entries.extend(section.entries.iter().cloned());
            }
        }
        Some(last) => {
            for section in sections.iter() {
                if compare_versions(&section.version, last).is_gt() {
                    new_versions.push(section.version.clone());
                    new_entries.extend(
                        section
                            .entries
                            .iter()
                            .filter(|e| !checkpoint.acknowledged_entry_ids.contains(&e.id()))
                            .cloned(),
                    );
                }
            }
        }
    }

    sort_versions_desc(&mut new_versions);

    tracing::debug!(
        from = ?checkpoint.last_acknowledged_version,
        to = %metadata.latest_version,
        versions = new_versions.len(),
        entries = new_entries.len(),
        "changelog diff computed"
    );

    DiffResult {
        has_updates: !new_entries.is_empty(),
        from_version: checkpoint.last_acknowledged_version.clone(),
        to_version: metadata.latest_version.clone(),
        new_versions,
        new_entries,
        metadata,
    }
}

/// Read a changelog document from disk.
pub fn read_changelog(path: impl AsRef<Path>) -> Result<String, ChangelogError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ChangelogError::NotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ChangelogError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })
}
