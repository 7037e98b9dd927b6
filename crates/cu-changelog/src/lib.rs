//! # cu-changelog
//!
//! Reading side of the changelog updater: turns a changelog document into
//! per-version entries and works out which of them are new.
//!
//! ## Key components
//!
//! - [`parse_version`] / [`compare_versions`] — best-effort total ordering of
//!   dotted version strings
//! - [`extract_metadata`] — the `---` delimited metadata block at the top of
//!   a fetched changelog
//! - [`parse_changelog_sections`] — `##` version headings, `###` section
//!   labels and `-`/`*` bullets into [`RawEntry`] values
//! - [`entry_id`] — the content-derived identity shared by diffing,
//!   acknowledgment and execution
//! - [`detect_diff`] — new versions and entries relative to a [`Checkpoint`]

pub mod diff;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod parser;
pub mod version;

pub use diff::{detect_diff, read_changelog, Checkpoint, DiffResult};
pub use error::ChangelogError;
pub use identity::{entry_id, hash_str};
pub use metadata::{extract_metadata, parse_frontmatter, ChangelogMetadata};
pub use parser::{parse_changelog_sections, ChangelogSections, RawEntry, VersionSection};
pub use version::{compare_versions, parse_version, sort_versions_desc};
