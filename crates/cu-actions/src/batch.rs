// batch.rs — Execute a plan and account for every item.
//
// Every plan item ends in exactly one of `successful`, `failed` or
// `skipped`. Acknowledgment-only and handler-less items are skipped without
// running anything. Handler failures, whether reported as a failure result
// or returned as an error, are captured as text and never abort the batch
// unless sequential stop-on-error is requested.
//
// Parallel mode runs every executable item concurrently with `join_all`,
// which yields outcomes in input order, so each outcome is attributed to
// the item at the same position.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::handler::{ActionHandler, ActionResult};
use crate::plan::ExecutionPlanItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Skip every item without invoking any handler.
    pub dry_run: bool,
    /// Run executable items concurrently.
    pub parallel: bool,
    /// Sequential only: after the first failure, skip the rest.
    pub stop_on_error: bool,
}

#[derive(Debug, Clone)]
pub struct FailedItem {
    pub item: ExecutionPlanItem,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub successful: Vec<ExecutionPlanItem>,
    pub failed: Vec<FailedItem>,
    pub skipped: Vec<ExecutionPlanItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len() + self.skipped.len()
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            total: self.total(),
            successful: self.successful.len(),
            failed: self.failed.len(),
            skipped: self.skipped.len(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        let mut parts = Vec::new();
        if stats.successful > 0 {
            parts.push(format!("{} successful", stats.successful));
        }
        if stats.failed > 0 {
            parts.push(format!("{} failed", stats.failed));
        }
        if stats.skipped > 0 {
            parts.push(format!("{} skipped", stats.skipped));
        }
        if parts.is_empty() {
            parts.push("nothing to do".to_string());
        }
        write!(f, "Batch complete: {} ({} total)", parts.join(", "), stats.total)
    }
}

/// Run one item's handler, folding both failure shapes into an error string.
async fn run_item(
    handler: &Arc<dyn ActionHandler>,
    item: &ExecutionPlanItem,
) -> Result<String, String> {
    match handler.execute(&item.entry, item.action).await {
        Ok(ActionResult::Success { message, .. }) => Ok(message),
        Ok(ActionResult::Failure { error, recoverable }) => {
            tracing::warn!(entry = %item.id(), action = %item.action, recoverable, %error, "action failed");
            Err(error)
        }
        Err(e) => {
            tracing::warn!(entry = %item.id(), action = %item.action, error = %e, "handler error");
            Err(e.to_string())
        }
    }
}

/// Execute items in plan order.
pub async fn execute_batch_sequential(
    plan: &[ExecutionPlanItem],
    stop_on_error: bool,
) -> BatchResult {
    let mut result = BatchResult::default();

    for (index, item) in plan.iter().enumerate() {
        let Some(handler) = item.executable_handler() else {
            result.skipped.push(item.clone());
            continue;
        };

        match run_item(handler, item).await {
            Ok(message) => {
                tracing::debug!(entry = %item.id(), %message, "action succeeded");
                result.successful.push(item.clone());
            }
            Err(error) => {
                result.failed.push(FailedItem {
                    item: item.clone(),
                    error,
                });
                if stop_on_error {
                    let remaining = &plan[index + 1..];
                    if !remaining.is_empty() {
                        tracing::info!(skipped = remaining.len(), "stopping batch after failure");
                    }
                    result.skipped.extend(remaining.iter().cloned());
                    break;
                }
            }
        }
    }

    result
}

/// Execute every executable item concurrently. All calls run to completion.
pub async fn execute_batch_parallel(plan: &[ExecutionPlanItem]) -> BatchResult {
    let mut result = BatchResult::default();
    let mut to_run = Vec::new();

    for item in plan {
        match item.executable_handler() {
            Some(handler) => to_run.push((item, handler)),
            None => result.skipped.push(item.clone()),
        }
    }

    let outcomes = join_all(to_run.iter().map(|(item, handler)| run_item(handler, item))).await;

    for ((item, _), outcome) in to_run.into_iter().zip(outcomes) {
        match outcome {
            Ok(_) => result.successful.push(item.clone()),
            Err(error) => result.failed.push(FailedItem {
                item: item.clone(),
                error,
            }),
        }
    }

    result
}

/// Execute a plan according to `options`.
pub async fn execute_batch(plan: &[ExecutionPlanItem], options: &BatchOptions) -> BatchResult {
    let result = if options.dry_run {
        BatchResult {
            skipped: plan.to_vec(),
            ..BatchResult::default()
        }
    } else if options.parallel {
        execute_batch_parallel(plan).await
    } else {
        execute_batch_sequential(plan, options.stop_on_error).await
    };

    tracing::info!(
        dry_run = options.dry_run,
        parallel = options.parallel,
        successful = result.successful.len(),
        failed = result.failed.len(),
        skipped = result.skipped.len(),
        "batch finished"
    );
    result
}
