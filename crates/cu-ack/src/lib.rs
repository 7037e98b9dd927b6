//! # cu-ack
//!
//! Remembers which changelog entries the user has already dealt with.
//!
//! Records are keyed by entry identity (see `cu_changelog::entry_id`) and
//! carry a status and a timestamp. All store operations are pure: they take
//! a store and return a new one. Persistence rewrites the whole file through
//! a temp-file rename. A missing or corrupt file loads as an empty store, and
//! a single malformed record is skipped rather than discarding the rest.
//!
//! ## Key components
//!
//! - [`AckStore`] / [`AckRecord`] / [`AckStatus`] — the persisted data model
//! - [`acknowledge`], [`acknowledge_many`], [`advance_checkpoint`],
//!   [`clear_old_records`], [`prune_covered_records`] — pure updates
//! - [`load_ack_store`] / [`save_ack_store`] — tolerant load, atomic save
//! - [`AckTracker`] — cached facade that persists after every mutation
//! - [`Acknowledgeable`] — anything that has an entry identity

pub mod error;
pub mod store;
pub mod tracker;

pub use error::AckError;
pub use store::{
    acknowledge, acknowledge_at, acknowledge_many, advance_checkpoint, clear_old_records,
    clear_old_records_at, entries_by_status, get_acknowledgment, is_acknowledged, load_ack_store,
    now_millis, prune_covered_records, prune_covered_records_at, save_ack_store, store_stats,
    unacknowledged, AckRecord, AckRequest, AckStats, AckStatus, AckStore, Acknowledgeable,
    STORE_FORMAT_VERSION,
};
pub use tracker::AckTracker;
