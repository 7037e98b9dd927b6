// pipeline.rs — Updater: the end-to-end update cycle for one project.
//
// check:   read changelog -> diff against checkpoint + acknowledged ids ->
//          classify -> drop anything already acknowledged
// process: build plan -> execute batch -> acknowledge what was dealt with ->
//          advance the checkpoint
//
// Only successful actions and acknowledgment-only items are recorded.
// Failures and items no handler accepted stay unacknowledged so they come
// back on the next cycle. Dry runs never touch the store.
//
// The checkpoint is the higher of the configured baseline and the version
// persisted in the store. The stored one advances to the highest version
// whose entries, together with every older version's, are all recorded.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cu_ack::{AckRequest, AckStats, AckStatus, AckTracker};
use cu_actions::{
    execute_batch, ActionRouter, BatchOptions, BatchResult, HandlerRegistry, HandlersConfig,
    PlanStrategy, UserAction,
};
use cu_changelog::{
    compare_versions, detect_diff, parse_changelog_sections, read_changelog, ChangelogMetadata,
    Checkpoint,
};
use cu_classify::{actionable_entries, classify_entries, ClassifiedEntry, EntryCategory};

use crate::config::UpdaterConfig;
use crate::error::UpdaterError;

/// Unacknowledged, classified entries found by a check.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    pub has_updates: bool,
    pub new_entries: Vec<ClassifiedEntry>,
    /// Version of the most recent acknowledgment, if any.
    pub from_version: Option<String>,
    pub to_version: String,
    pub new_versions: Vec<String>,
    pub metadata: ChangelogMetadata,
}

impl UpdateCheck {
    pub fn actionable_count(&self) -> usize {
        actionable_entries(&self.new_entries).len()
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.new_entries
            .iter()
            .any(|e| e.category == EntryCategory::Breaking)
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let total = self.new_entries.len();
        if total == 0 {
            return "No new changelog updates available.".to_string();
        }
        let mut summary = format!(
            "Found {} new changelog update{}",
            total,
            if total == 1 { "" } else { "s" }
        );
        let actionable = self.actionable_count();
        if actionable > 0 {
            summary.push_str(&format!(" ({actionable} actionable)"));
        }
        if self.has_breaking_changes() {
            summary.push_str(" including breaking changes");
        }
        summary.push('.');
        summary
    }
}

/// Result of processing a set of entries.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub from_version: Option<String>,
    pub to_version: String,
    pub result: BatchResult,
    /// Number of acknowledgments written.
    pub acknowledged: usize,
}

/// Everything a full cycle did.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub pruned: usize,
    pub check: UpdateCheck,
    pub summary: String,
    /// `None` when there was nothing new to process.
    pub report: Option<ExecutionReport>,
}

pub struct Updater {
    config: UpdaterConfig,
    registry: HandlerRegistry,
    tracker: AckTracker,
}

impl Updater {
    pub fn new(config: UpdaterConfig, registry: HandlerRegistry) -> Self {
        let tracker = AckTracker::open(&config.ack_store_path);
        Self {
            config,
            registry,
            tracker,
        }
    }

    /// Build an updater whose registry holds the configured command handlers.
    pub fn from_config(config: UpdaterConfig) -> Result<Self, UpdaterError> {
        let mut registry = HandlerRegistry::new();
        HandlersConfig::load(&config.handlers_path)?.register_all(&mut registry);
        Ok(Self::new(config, registry))
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &AckTracker {
        &self.tracker
    }

    /// Version below which nothing is reported as new.
    pub fn checkpoint_version(&self) -> Option<String> {
        let stored = self.tracker.store().last_acknowledged_version.as_deref();
        match (self.config.baseline_version.as_deref(), stored) {
            (Some(baseline), Some(stored)) => {
                if compare_versions(baseline, stored).is_ge() {
                    Some(baseline.to_string())
                } else {
                    Some(stored.to_string())
                }
            }
            (baseline, stored) => baseline.or(stored).map(str::to_string),
        }
    }

    pub fn check_for_updates(&self) -> Result<UpdateCheck, UpdaterError> {
        let content = read_changelog(&self.config.changelog_path)?;
        let store = self.tracker.store();

        let checkpoint = Checkpoint {
            last_acknowledged_version: self.checkpoint_version(),
            acknowledged_entry_ids: store.records.keys().cloned().collect(),
        };
        let diff = detect_diff(&content, &checkpoint);
        let new_entries = self.tracker.filter(classify_entries(&diff.new_entries));

        tracing::info!(
            parsed = diff.new_entries.len(),
            unacknowledged = new_entries.len(),
            to = %diff.to_version,
            "checked for changelog updates"
        );

        Ok(UpdateCheck {
            has_updates: !new_entries.is_empty(),
            new_entries,
            from_version: store.latest_record().map(|r| r.version.clone()),
            to_version: diff.to_version,
            new_versions: diff.new_versions,
            metadata: diff.metadata,
        })
    }

    /// Process entries with category defaults for anything not in `choices`.
    pub async fn process(
        &mut self,
        check: &UpdateCheck,
        choices: &HashMap<String, UserAction>,
        options: &BatchOptions,
    ) -> Result<ExecutionReport, UpdaterError> {
        self.process_with(check, choices, PlanStrategy::Default, options)
            .await
    }

    pub async fn process_with(
        &mut self,
        check: &UpdateCheck,
        choices: &HashMap<String, UserAction>,
        strategy: PlanStrategy,
        options: &BatchOptions,
    ) -> Result<ExecutionReport, UpdaterError> {
        let plan = ActionRouter::new(&self.registry).build_plan(&check.new_entries, choices, strategy);
        let result = execute_batch(&plan, options).await;

        let mut acknowledged = 0;
        if !options.dry_run {
            let requests: Vec<AckRequest> = result
                .successful
                .iter()
                .chain(result.skipped.iter().filter(|i| !i.action.requires_handler()))
                .map(|item| AckRequest::for_entry(&item.entry, item.action.ack_status()))
                .collect();
            self.tracker.ack_many(&requests)?;
            acknowledged = requests.len();
            if acknowledged > 0 {
                let content = read_changelog(&self.config.changelog_path)?;
                self.advance_checkpoint(&content)?;
            }
        }

        Ok(ExecutionReport {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            from_version: check.from_version.clone(),
            to_version: check.to_version.clone(),
            result,
            acknowledged,
        })
    }

    /// Prune, check, then process whatever is new with default actions.
    pub async fn run_cycle(&mut self, options: &BatchOptions) -> Result<CycleOutcome, UpdaterError> {
        let pruned = match self.config.retention_days {
            Some(days) => self.tracker.cleanup(days)?,
            None => 0,
        };

        let check = self.check_for_updates()?;
        let summary = check.summary();
        let report = if check.has_updates {
            Some(self.process(&check, &HashMap::new(), options).await?)
        } else {
            None
        };

        Ok(CycleOutcome {
            pruned,
            check,
            summary,
            report,
        })
    }

    /// Mark every entry in the changelog as seen, returning how many were new.
    ///
    /// Entries that already have a record keep their existing status.
    pub fn acknowledge_all(&mut self) -> Result<usize, UpdaterError> {
        let content = read_changelog(&self.config.changelog_path)?;
        let entries = self
            .tracker
            .filter(parse_changelog_sections(&content).all_entries());
        let requests: Vec<AckRequest> = entries
            .iter()
            .map(|e| AckRequest::for_entry(e, AckStatus::Seen))
            .collect();
        self.tracker.ack_many(&requests)?;
        self.advance_checkpoint(&content)?;
        Ok(requests.len())
    }

    /// Move the stored checkpoint past every fully acknowledged version.
    ///
    /// Versions are walked oldest first; the walk stops at the first version
    /// that still has an entry without a record.
    fn advance_checkpoint(&mut self, content: &str) -> Result<(), UpdaterError> {
        let sections = parse_changelog_sections(content);
        let current = self.checkpoint_version();
        let store = self.tracker.store();

        let mut versions = sections.versions();
        versions.sort_by(|a, b| compare_versions(a, b));

        let mut reached = None;
        for version in versions {
            let covered = current
                .as_deref()
                .is_some_and(|c| compare_versions(&version, c).is_le());
            let complete = covered
                || sections
                    .get(&version)
                    .unwrap_or_default()
                    .iter()
                    .all(|e| store.records.contains_key(&e.id()));
            if !complete {
                break;
            }
            reached = Some(version);
        }

        if let Some(version) = reached {
            self.tracker.advance_checkpoint(&version)?;
        }
        Ok(())
    }

    /// Drop expired acknowledgments that the checkpoint already covers.
    pub fn prune(&mut self, max_age_days: u32) -> Result<usize, UpdaterError> {
        Ok(self.tracker.cleanup(max_age_days)?)
    }

    pub fn stats(&self) -> AckStats {
        self.tracker.stats()
    }
}
