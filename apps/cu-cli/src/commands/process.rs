// process.rs — `cu process`: route new entries to handlers and acknowledge.
//
// Command-line flags are OR-ed with the `[batch]` defaults from
// `.changelog/updater.toml`. A dry run prints the plan preview instead of
// running anything.

use std::collections::HashMap;

use clap::{Args, ValueEnum};

use cu_actions::{preview, ActionRouter, BatchOptions, PlanStrategy};
use cu_updater::{Updater, UpdaterConfig};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StrategyArg {
    /// Category default action for every entry.
    #[default]
    Default,
    /// Recommended action, escalating breaking changes to migration.
    Recommended,
    /// Mark everything as seen without running handlers.
    AcknowledgeAll,
}

impl From<StrategyArg> for PlanStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Default => PlanStrategy::Default,
            StrategyArg::Recommended => PlanStrategy::Recommended,
            StrategyArg::AcknowledgeAll => PlanStrategy::AcknowledgeAll,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Show what would run without executing or acknowledging anything.
    #[arg(long)]
    pub dry_run: bool,
    /// Run handlers concurrently.
    #[arg(long)]
    pub parallel: bool,
    /// Stop after the first failure (sequential mode only).
    #[arg(long)]
    pub stop_on_error: bool,
    /// How to pick an action for each entry.
    #[arg(long, value_enum, default_value_t = StrategyArg::Default)]
    pub strategy: StrategyArg,
}

impl ProcessArgs {
    fn options(&self, defaults: &BatchOptions) -> BatchOptions {
        BatchOptions {
            dry_run: self.dry_run || defaults.dry_run,
            parallel: self.parallel || defaults.parallel,
            stop_on_error: self.stop_on_error || defaults.stop_on_error,
        }
    }
}

pub async fn execute(args: &ProcessArgs, config: &UpdaterConfig) -> anyhow::Result<()> {
    let mut updater = Updater::from_config(config.clone())?;
    let options = args.options(&config.batch);
    let strategy = PlanStrategy::from(args.strategy);

    if let Some(days) = config.retention_days {
        let pruned = updater.prune(days)?;
        if pruned > 0 {
            println!("Pruned {} acknowledgment(s) older than {} days.", pruned, days);
        }
    }

    let check = updater.check_for_updates()?;
    println!("{}", check.summary());
    if !check.has_updates {
        return Ok(());
    }

    let choices = HashMap::new();
    if options.dry_run {
        let plan =
            ActionRouter::new(updater.registry()).build_plan(&check.new_entries, &choices, strategy);
        println!();
        println!("Dry run, nothing will be executed or acknowledged:");
        for item in preview(&plan) {
            let mark = if item.will_execute { "run " } else { "skip" };
            println!("  {} {:<14} {} ({})", mark, item.action, item.entry_id, item.reason);
        }
        return Ok(());
    }

    let report = updater
        .process_with(&check, &choices, strategy, &options)
        .await?;

    println!();
    println!("{}", report.result);
    for failed in &report.result.failed {
        println!("  FAILED {} ({}): {}", failed.item.id(), failed.item.action, failed.error);
    }
    println!(
        "Acknowledged {} entr{} (run {}).",
        report.acknowledged,
        if report.acknowledged == 1 { "y" } else { "ies" },
        report.run_id
    );

    if report.result.has_failures() {
        anyhow::bail!(
            "{} action(s) failed; they will be offered again on the next run",
            report.result.failed.len()
        );
    }
    Ok(())
}
