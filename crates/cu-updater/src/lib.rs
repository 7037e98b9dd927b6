//! # cu-updater
//!
//! The changelog update pipeline for one project.
//!
//! [`Updater`] ties the pieces together: it reads the project's changelog,
//! diffs it against the acknowledgment store, classifies what is new,
//! builds and executes an action plan through the configured handlers, and
//! records what was dealt with so it is not reported again.
//!
//! ## Key components
//!
//! - [`UpdaterConfig`] — `.changelog/` layout plus `updater.toml` overrides
//! - [`resolve_project_root`] — find the project a working directory belongs to
//! - [`Updater`] — check, process, run a full cycle, acknowledge everything
//! - [`UpdateCheck`] / [`ExecutionReport`] / [`CycleOutcome`] — pipeline results

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{find_changelog, resolve_project_root, UpdaterConfig, UpdaterSettings};
pub use error::UpdaterError;
pub use pipeline::{CycleOutcome, ExecutionReport, UpdateCheck, Updater};
