// store.rs — Acknowledgment records, pure store updates and persistence.
//
// The store is a single JSON document:
//
//   { "version": "1.0.0", "lastChecked": 1737000000000,
//     "lastAcknowledgedVersion": "2.1.21",
//     "records": { "2.1.22:1a2b3c4d": { "entryId": ..., "status": "seen",
//                                        "timestamp": ..., "version": "2.1.22" } } }
//
// Timestamps are milliseconds since the Unix epoch. Every update function
// takes the store by reference and returns a fresh copy; callers' stores
// are never modified in place.
//
// `lastAcknowledgedVersion` is the checkpoint: every entry at or below it
// has been dealt with, so records covered by it are the only ones retention
// pruning may drop.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use cu_changelog::{compare_versions, RawEntry};
use cu_classify::ClassifiedEntry;

use crate::error::AckError;

/// Format version written into new stores.
pub const STORE_FORMAT_VERSION: &str = "1.0.0";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// How the user dealt with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Seen,
    Applied,
    Skipped,
    Dismissed,
}

impl AckStatus {
    pub const ALL: [AckStatus; 4] = [
        AckStatus::Seen,
        AckStatus::Applied,
        AckStatus::Skipped,
        AckStatus::Dismissed,
    ];
}

impl std::fmt::Display for AckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AckStatus::Seen => "seen",
            AckStatus::Applied => "applied",
            AckStatus::Skipped => "skipped",
            AckStatus::Dismissed => "dismissed",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckRecord {
    pub entry_id: String,
    pub status: AckStatus,
    #[serde(deserialize_with = "deserialize_millis")]
    pub timestamp: i64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckStore {
    pub version: String,
    #[serde(deserialize_with = "deserialize_millis")]
    pub last_checked: i64,
    /// Highest version whose entries, and all older ones, are acknowledged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_acknowledged_version: Option<String>,
    pub records: BTreeMap<String, AckRecord>,
}

impl AckStore {
    /// A store with no records, stamped with the current time.
    pub fn empty() -> Self {
        Self {
            version: STORE_FORMAT_VERSION.to_string(),
            last_checked: now_millis(),
            last_acknowledged_version: None,
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the newest timestamp, if any.
    pub fn latest_record(&self) -> Option<&AckRecord> {
        self.records.values().max_by_key(|r| r.timestamp)
    }

    /// Whether `version` is at or below the stored checkpoint.
    pub fn covers(&self, version: &str) -> bool {
        self.last_acknowledged_version
            .as_deref()
            .is_some_and(|checkpoint| compare_versions(version, checkpoint).is_le())
    }
}

impl Default for AckStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// One acknowledgment to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckRequest {
    pub entry_id: String,
    pub status: AckStatus,
    pub version: String,
}

impl AckRequest {
    pub fn new(entry_id: impl Into<String>, status: AckStatus, version: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            status,
            version: version.into(),
        }
    }

    pub fn for_entry(entry: &impl Acknowledgeable, status: AckStatus) -> Self {
        Self::new(entry.entry_id(), status, entry.entry_version())
    }
}

/// Counts and time range over a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckStats {
    pub total: usize,
    pub by_status: BTreeMap<AckStatus, usize>,
    pub oldest: Option<i64>,
    pub newest: Option<i64>,
}

/// Anything that carries an entry identity.
pub trait Acknowledgeable {
    fn entry_id(&self) -> String;
    fn entry_version(&self) -> &str;
}

impl Acknowledgeable for RawEntry {
    fn entry_id(&self) -> String {
        self.id()
    }

    fn entry_version(&self) -> &str {
        &self.version
    }
}

impl Acknowledgeable for ClassifiedEntry {
    fn entry_id(&self) -> String {
        self.id()
    }

    fn entry_version(&self) -> &str {
        self.version()
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Millisecond timestamp from any JSON number. Fractions are truncated.
fn millis_from_number(number: &Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    millis_from_number(&number).ok_or_else(|| D::Error::custom("timestamp is not a finite number"))
}

/// Build a store from a parsed document.
///
/// Only the top level is required to be well formed: `version` must be a
/// string, `lastChecked` a number and `records` an object. Individual
/// records that fail to parse are dropped with a warning.
fn store_from_value(path: &Path, value: &Value) -> Option<AckStore> {
    let version = value.get("version")?.as_str()?;
    let last_checked = match value.get("lastChecked")? {
        Value::Number(n) => millis_from_number(n)?,
        _ => return None,
    };
    let raw_records = value.get("records")?.as_object()?;

    let mut records = BTreeMap::new();
    for (id, raw) in raw_records {
        match AckRecord::deserialize(raw) {
            Ok(record) => {
                records.insert(id.clone(), record);
            }
            Err(e) => tracing::warn!(
                path = %path.display(),
                entry_id = %id,
                error = %e,
                "skipping invalid ack record"
            ),
        }
    }

    Some(AckStore {
        version: version.to_string(),
        last_checked,
        last_acknowledged_version: value
            .get("lastAcknowledgedVersion")
            .and_then(Value::as_str)
            .map(str::to_string),
        records,
    })
}

/// Load a store from disk.
///
/// A missing or unreadable file, or one whose top level is malformed,
/// yields an empty store. Malformed records are skipped individually.
pub fn load_ack_store(path: impl AsRef<Path>) -> AckStore {
    let path = path.as_ref();
    if !path.exists() {
        return AckStore::empty();
    }
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "unreadable ack store, starting empty"
            );
            return AckStore::empty();
        }
    };
    let value = match serde_json::from_str::<Value>(&json) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "ack store is not valid JSON, starting empty"
            );
            return AckStore::empty();
        }
    };
    store_from_value(path, &value).unwrap_or_else(|| {
        tracing::warn!(
            path = %path.display(),
            "ack store has an invalid top level, starting empty"
        );
        AckStore::empty()
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ack-store.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> AckError {
    AckError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Write the whole store to `path`, creating parent directories.
///
/// The document goes to a sibling temp file first and is renamed over the
/// target, so readers see either the old or the new file.
pub fn save_ack_store(path: impl AsRef<Path>, store: &AckStore) -> Result<(), AckError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    {
        let file = File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, store)?;
        writer.flush().map_err(|e| io_error(&temp_path, e))?;
    }
    fs::rename(&temp_path, path).map_err(|e| io_error(path, e))?;

    tracing::debug!(path = %path.display(), records = store.len(), "saved ack store");
    Ok(())
}

/// Upsert one record at an explicit timestamp.
pub fn acknowledge_at(
    store: &AckStore,
    entry_id: &str,
    status: AckStatus,
    version: &str,
    timestamp: i64,
) -> AckStore {
    let mut next = store.clone();
    next.records.insert(
        entry_id.to_string(),
        AckRecord {
            entry_id: entry_id.to_string(),
            status,
            timestamp,
            version: version.to_string(),
        },
    );
    next.last_checked = timestamp;
    next
}

/// Upsert one record stamped with the current time. Last write wins.
pub fn acknowledge(store: &AckStore, entry_id: &str, status: AckStatus, version: &str) -> AckStore {
    acknowledge_at(store, entry_id, status, version, now_millis())
}

/// Upsert several records under one shared timestamp.
pub fn acknowledge_many(store: &AckStore, requests: &[AckRequest]) -> AckStore {
    let timestamp = now_millis();
    let mut next = store.clone();
    for request in requests {
        next.records.insert(
            request.entry_id.clone(),
            AckRecord {
                entry_id: request.entry_id.clone(),
                status: request.status,
                timestamp,
                version: request.version.clone(),
            },
        );
    }
    next.last_checked = timestamp;
    next
}

/// Move the checkpoint up to `version`. It never moves down.
pub fn advance_checkpoint(store: &AckStore, version: &str) -> AckStore {
    let mut next = store.clone();
    if !store.covers(version) {
        next.last_acknowledged_version = Some(version.to_string());
    }
    next
}

fn cutoff_millis(max_age_days: u32, now: i64) -> i64 {
    now - i64::from(max_age_days) * MILLIS_PER_DAY
}

/// Drop every record older than `max_age_days` relative to `now`.
pub fn clear_old_records_at(store: &AckStore, max_age_days: u32, now: i64) -> AckStore {
    let cutoff = cutoff_millis(max_age_days, now);
    let mut next = store.clone();
    next.records.retain(|_, r| r.timestamp >= cutoff);
    next
}

/// Drop every record older than `max_age_days`.
pub fn clear_old_records(store: &AckStore, max_age_days: u32) -> AckStore {
    clear_old_records_at(store, max_age_days, now_millis())
}

/// Retention that cannot resurface entries: drop records older than
/// `max_age_days` only when the checkpoint covers their version.
///
/// Records above the checkpoint are the only thing hiding their entries
/// from the diff, so they are kept regardless of age.
pub fn prune_covered_records_at(store: &AckStore, max_age_days: u32, now: i64) -> AckStore {
    let cutoff = cutoff_millis(max_age_days, now);
    let mut next = store.clone();
    next.records
        .retain(|_, r| r.timestamp >= cutoff || !store.covers(&r.version));
    next
}

pub fn prune_covered_records(store: &AckStore, max_age_days: u32) -> AckStore {
    prune_covered_records_at(store, max_age_days, now_millis())
}

pub fn is_acknowledged(store: &AckStore, entry_id: &str) -> bool {
    store.records.contains_key(entry_id)
}

pub fn get_acknowledgment<'a>(store: &'a AckStore, entry_id: &str) -> Option<&'a AckRecord> {
    store.records.get(entry_id)
}

/// Entries with no record in the store, in their original order.
pub fn unacknowledged<T: Acknowledgeable>(entries: Vec<T>, store: &AckStore) -> Vec<T> {
    entries
        .into_iter()
        .filter(|e| !is_acknowledged(store, &e.entry_id()))
        .collect()
}

/// Entries whose record has the given status.
pub fn entries_by_status<'a, T: Acknowledgeable>(
    entries: &'a [T],
    store: &AckStore,
    status: AckStatus,
) -> Vec<&'a T> {
    entries
        .iter()
        .filter(|e| get_acknowledgment(store, &e.entry_id()).is_some_and(|r| r.status == status))
        .collect()
}

pub fn store_stats(store: &AckStore) -> AckStats {
    let mut stats = AckStats {
        total: store.records.len(),
        by_status: AckStatus::ALL.iter().map(|&status| (status, 0)).collect(),
        ..AckStats::default()
    };
    for record in store.records.values() {
        *stats.by_status.entry(record.status).or_default() += 1;
    }
    stats.oldest = store.records.values().map(|r| r.timestamp).min();
    stats.newest = store.records.values().map(|r| r.timestamp).max();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raw(version: &str, content: &str) -> RawEntry {
        RawEntry {
            version: version.to_string(),
            date: None,
            section: None,
            content: content.to_string(),
            raw_line: format!("- {content}"),
        }
    }

    #[test]
    fn acknowledge_is_idempotent_and_last_write_wins() {
        let store = AckStore::empty();
        let once = acknowledge_at(&store, "1.0.0:aaaa", AckStatus::Seen, "1.0.0", 1_000);
        let twice = acknowledge_at(&once, "1.0.0:aaaa", AckStatus::Seen, "1.0.0", 2_000);

        assert_eq!(twice.len(), 1);
        assert_eq!(twice.records["1.0.0:aaaa"].timestamp, 2_000);
        assert_eq!(twice.last_checked, 2_000);
    }

    #[test]
    fn acknowledge_does_not_mutate_input() {
        let store = AckStore::empty();
        let before = store.clone();
        let next = acknowledge(&store, "1.0.0:aaaa", AckStatus::Applied, "1.0.0");
        assert_eq!(store, before);
        assert!(store.is_empty());
        assert_eq!(next.len(), 1);
        assert_eq!(next.records["1.0.0:aaaa"].status, AckStatus::Applied);
    }

    #[test]
    fn acknowledge_many_shares_one_timestamp() {
        let store = AckStore::empty();
        let next = acknowledge_many(
            &store,
            &[
                AckRequest::new("1.0.0:a", AckStatus::Seen, "1.0.0"),
                AckRequest::new("1.0.1:b", AckStatus::Skipped, "1.0.1"),
            ],
        );
        assert_eq!(next.len(), 2);
        assert_eq!(
            next.records["1.0.0:a"].timestamp,
            next.records["1.0.1:b"].timestamp
        );
        assert_eq!(next.last_checked, next.records["1.0.0:a"].timestamp);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_old_records_removes_only_expired() {
        let now = 100 * MILLIS_PER_DAY;
        let old = now - 40 * MILLIS_PER_DAY;
        let recent = now - 5 * MILLIS_PER_DAY;
        let store = acknowledge_at(&AckStore::empty(), "old", AckStatus::Seen, "1.0.0", old);
        let store = acknowledge_at(&store, "new", AckStatus::Seen, "1.0.1", recent);

        let pruned = clear_old_records_at(&store, 30, now);
        assert!(!is_acknowledged(&pruned, "old"));
        assert!(is_acknowledged(&pruned, "new"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn covered_pruning_keeps_records_above_checkpoint() {
        let now = 100 * MILLIS_PER_DAY;
        let old = now - 60 * MILLIS_PER_DAY;
        let store = acknowledge_at(&AckStore::empty(), "1.0.0:a", AckStatus::Seen, "1.0.0", old);
        let store = acknowledge_at(&store, "1.0.1:b", AckStatus::Applied, "1.0.1", old);
        let store = acknowledge_at(&store, "1.0.0:c", AckStatus::Seen, "1.0.0", now);

        // Without a checkpoint nothing is covered.
        assert_eq!(prune_covered_records_at(&store, 30, now).len(), 3);

        let pruned = prune_covered_records_at(&advance_checkpoint(&store, "1.0.0"), 30, now);
        assert!(!is_acknowledged(&pruned, "1.0.0:a"));
        assert!(is_acknowledged(&pruned, "1.0.1:b"));
        assert!(is_acknowledged(&pruned, "1.0.0:c"));

        // Plain age-based clearing ignores the checkpoint.
        assert_eq!(clear_old_records_at(&store, 30, now).len(), 1);
    }

    #[test]
    fn checkpoint_only_moves_forward() {
        let store = advance_checkpoint(&AckStore::empty(), "2.1.21");
        assert_eq!(store.last_acknowledged_version.as_deref(), Some("2.1.21"));

        let lower = advance_checkpoint(&store, "2.1.9");
        assert_eq!(lower.last_acknowledged_version.as_deref(), Some("2.1.21"));

        let higher = advance_checkpoint(&store, "2.1.22");
        assert_eq!(higher.last_acknowledged_version.as_deref(), Some("2.1.22"));
        assert!(higher.covers("2.1.22"));
        assert!(higher.covers("1.0.0"));
        assert!(!higher.covers("2.2.0"));
        assert!(!AckStore::empty().covers("0.0.1"));
    }

    #[test]
    fn save_then_load_preserves_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ack-store.json");
        let store = acknowledge(
            &AckStore::empty(),
            "2.1.22:abcd1234",
            AckStatus::Dismissed,
            "2.1.22",
        );

        save_ack_store(&path, &store).unwrap();
        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());

        let loaded = load_ack_store(&path);
        assert_eq!(loaded, store);
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let store = acknowledge_at(&AckStore::empty(), "1.0.0:aaaa", AckStatus::Seen, "1.0.0", 42);
        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["version"], STORE_FORMAT_VERSION);
        assert_eq!(value["lastChecked"], 42);
        assert_eq!(value["records"]["1.0.0:aaaa"]["entryId"], "1.0.0:aaaa");
        assert_eq!(value["records"]["1.0.0:aaaa"]["status"], "seen");
        assert!(value.get("lastAcknowledgedVersion").is_none());

        let value = serde_json::to_value(advance_checkpoint(&store, "1.0.0")).unwrap();
        assert_eq!(value["lastAcknowledgedVersion"], "1.0.0");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = load_ack_store(dir.path().join("nope.json"));
        assert!(store.is_empty());
        assert_eq!(store.version, STORE_FORMAT_VERSION);
    }

    #[test]
    fn corrupt_or_invalid_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(load_ack_store(&path).is_empty());

        fs::write(&path, r#"{"version": 1, "lastChecked": 0, "records": {}}"#).unwrap();
        assert!(load_ack_store(&path).is_empty());

        fs::write(&path, r#"{"version": "1.0.0", "lastChecked": 0, "records": []}"#).unwrap();
        assert!(load_ack_store(&path).is_empty());

        fs::write(&path, r#"{"version": "1.0.0", "lastChecked": "0", "records": {}}"#).unwrap();
        assert!(load_ack_store(&path).is_empty());
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");
        fs::write(
            &path,
            r#"{
                "version": "1.0.0",
                "lastChecked": 1737000000000,
                "lastAcknowledgedVersion": "1.0.0",
                "records": {
                    "a": {"entryId": "a", "status": "seen", "timestamp": 5, "version": "1.0.0"},
                    "b": {"entryId": "b", "status": "archived", "timestamp": 6, "version": "1.0.0"},
                    "c": {"entryId": "c", "status": "seen"}
                }
            }"#,
        )
        .unwrap();

        let store = load_ack_store(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records["a"].status, AckStatus::Seen);
        assert_eq!(store.last_checked, 1_737_000_000_000);
        assert_eq!(store.last_acknowledged_version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn fractional_timestamps_are_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");
        fs::write(
            &path,
            r#"{"version": "1.0.0", "lastChecked": 1737000000000.0, "records": {
                "a": {"entryId": "a", "status": "applied", "timestamp": 42.7, "version": "1.0.0"}
            }}"#,
        )
        .unwrap();

        let store = load_ack_store(&path);
        assert_eq!(store.last_checked, 1_737_000_000_000);
        assert_eq!(store.records["a"].timestamp, 42);
    }

    #[test]
    fn stats_count_by_status_and_range() {
        let empty = store_stats(&AckStore::empty());
        assert_eq!(empty.oldest, None);
        assert_eq!(empty.by_status.len(), 4);
        assert!(empty.by_status.values().all(|&count| count == 0));

        let store = acknowledge_at(&AckStore::empty(), "a", AckStatus::Seen, "1.0.0", 10);
        let store = acknowledge_at(&store, "b", AckStatus::Applied, "1.0.0", 30);
        let store = acknowledge_at(&store, "c", AckStatus::Seen, "1.0.1", 20);

        let stats = store_stats(&store);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status[&AckStatus::Seen], 2);
        assert_eq!(stats.by_status[&AckStatus::Applied], 1);
        assert_eq!(stats.by_status[&AckStatus::Skipped], 0);
        assert_eq!(stats.by_status[&AckStatus::Dismissed], 0);
        assert_eq!(stats.oldest, Some(10));
        assert_eq!(stats.newest, Some(30));
        assert_eq!(store.latest_record().unwrap().entry_id, "b");
    }

    #[test]
    fn unacknowledged_and_by_status_filters() {
        let entries = vec![raw("1.0.0", "one"), raw("1.0.0", "two"), raw("1.0.1", "three")];
        let store = acknowledge(&AckStore::empty(), &entries[1].id(), AckStatus::Skipped, "1.0.0");

        let pending = unacknowledged(entries.clone(), &store);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].content, "one");
        assert_eq!(pending[1].content, "three");

        let skipped = entries_by_status(&entries, &store, AckStatus::Skipped);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].content, "two");
        assert!(entries_by_status(&entries, &store, AckStatus::Applied).is_empty());
    }
}
