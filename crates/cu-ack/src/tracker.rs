// tracker.rs — AckTracker: cached store plus immediate persistence.
//
// The tracker owns one store file. It loads once on open and serves reads
// from memory. Every mutation computes the next store, writes it to disk,
// and only then replaces the cached copy, so a failed write leaves the
// tracker consistent with the file.

use std::path::{Path, PathBuf};

use crate::error::AckError;
use crate::store::{
    acknowledge, acknowledge_many, advance_checkpoint, is_acknowledged, load_ack_store,
    prune_covered_records, save_ack_store, store_stats, unacknowledged, AckRequest, AckStats,
    AckStatus, AckStore, Acknowledgeable,
};

pub struct AckTracker {
    path: PathBuf,
    store: AckStore,
}

impl AckTracker {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let store = load_ack_store(&path);
        tracing::debug!(path = %path.display(), records = store.len(), "opened ack store");
        Self { path, store }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &AckStore {
        &self.store
    }

    /// Discard the cache and re-read the file.
    pub fn reload(&mut self) {
        self.store = load_ack_store(&self.path);
    }

    /// Replace the whole store.
    pub fn save(&mut self, store: AckStore) -> Result<(), AckError> {
        save_ack_store(&self.path, &store)?;
        self.store = store;
        Ok(())
    }

    pub fn check(&self, entry_id: &str) -> bool {
        is_acknowledged(&self.store, entry_id)
    }

    pub fn ack(&mut self, entry_id: &str, status: AckStatus, version: &str) -> Result<(), AckError> {
        let next = acknowledge(&self.store, entry_id, status, version);
        self.save(next)
    }

    pub fn ack_many(&mut self, requests: &[AckRequest]) -> Result<(), AckError> {
        if requests.is_empty() {
            return Ok(());
        }
        let next = acknowledge_many(&self.store, requests);
        self.save(next)?;
        tracing::info!(count = requests.len(), "acknowledged entries");
        Ok(())
    }

    /// Raise the stored checkpoint to `version`. Returns whether it moved.
    pub fn advance_checkpoint(&mut self, version: &str) -> Result<bool, AckError> {
        if self.store.covers(version) {
            return Ok(false);
        }
        let next = advance_checkpoint(&self.store, version);
        self.save(next)?;
        tracing::info!(version, "advanced acknowledgment checkpoint");
        Ok(true)
    }

    /// Keep only entries with no record.
    pub fn filter<T: Acknowledgeable>(&self, entries: Vec<T>) -> Vec<T> {
        unacknowledged(entries, &self.store)
    }

    /// Prune expired records covered by the checkpoint, returning how many
    /// were removed.
    pub fn cleanup(&mut self, max_age_days: u32) -> Result<usize, AckError> {
        let next = prune_covered_records(&self.store, max_age_days);
        let removed = self.store.len() - next.len();
        if removed > 0 {
            self.save(next)?;
            tracing::info!(removed, max_age_days, "pruned old acknowledgments");
        }
        Ok(removed)
    }

    pub fn stats(&self) -> AckStats {
        store_stats(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{acknowledge_at, now_millis};
    use cu_changelog::RawEntry;
    use tempfile::tempdir;

    fn raw(content: &str) -> RawEntry {
        RawEntry {
            version: "2.1.22".to_string(),
            date: None,
            section: None,
            content: content.to_string(),
            raw_line: format!("- {content}"),
        }
    }

    #[test]
    fn ack_persists_immediately() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".changelog").join("ack-store.json");

        let mut tracker = AckTracker::open(&path);
        assert!(tracker.store().is_empty());
        tracker.ack("2.1.22:aaaa", AckStatus::Applied, "2.1.22").unwrap();
        assert!(tracker.check("2.1.22:aaaa"));

        let reopened = AckTracker::open(&path);
        assert!(reopened.check("2.1.22:aaaa"));
        assert_eq!(reopened.stats().total, 1);
    }

    #[test]
    fn ack_many_and_filter() {
        let dir = tempdir().unwrap();
        let mut tracker = AckTracker::open(dir.path().join("ack-store.json"));
        let entries = vec![raw("one"), raw("two"), raw("three")];

        tracker
            .ack_many(&[
                AckRequest::for_entry(&entries[0], AckStatus::Seen),
                AckRequest::for_entry(&entries[2], AckStatus::Dismissed),
            ])
            .unwrap();

        let pending = tracker.filter(entries);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].content, "two");
    }

    #[test]
    fn empty_ack_many_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");
        let mut tracker = AckTracker::open(&path);
        tracker.ack_many(&[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn reload_picks_up_external_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");
        let mut tracker = AckTracker::open(&path);

        let mut other = AckTracker::open(&path);
        other.ack("1.0.0:bbbb", AckStatus::Seen, "1.0.0").unwrap();

        assert!(!tracker.check("1.0.0:bbbb"));
        tracker.reload();
        assert!(tracker.check("1.0.0:bbbb"));
    }

    #[test]
    fn cleanup_removes_expired_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ack-store.json");
        let mut tracker = AckTracker::open(&path);

        let ancient = now_millis() - 90 * 24 * 60 * 60 * 1000;
        let store = acknowledge_at(tracker.store(), "old", AckStatus::Seen, "1.0.0", ancient);
        tracker.save(store).unwrap();
        tracker.ack("fresh", AckStatus::Seen, "1.0.1").unwrap();

        // Nothing is covered until a checkpoint exists.
        assert_eq!(tracker.cleanup(30).unwrap(), 0);

        assert!(tracker.advance_checkpoint("1.0.1").unwrap());
        assert!(!tracker.advance_checkpoint("1.0.0").unwrap());
        assert_eq!(tracker.cleanup(30).unwrap(), 1);
        assert!(!tracker.check("old"));
        assert!(tracker.check("fresh"));
        assert_eq!(AckTracker::open(&path).stats().total, 1);

        assert_eq!(tracker.cleanup(30).unwrap(), 0);
    }
}
