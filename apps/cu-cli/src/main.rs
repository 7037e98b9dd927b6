//! # cu-cli
//!
//! Command-line interface for the changelog updater.
//!
//! - `cu check` — list changelog entries not yet acknowledged
//! - `cu process` — run actions for new entries and record the outcome
//! - `cu ack-all` — mark every entry as seen
//! - `cu stats` / `cu prune` — inspect and trim the acknowledgment store
//! - `cu handlers` — list configured command handlers

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cu_updater::{resolve_project_root, UpdaterConfig};

/// Changelog updater: surface and act on new changelog entries.
#[derive(Parser)]
#[command(name = "cu", version, about)]
struct Cli {
    /// Project root directory (defaults to the nearest enclosing project).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show new, unacknowledged changelog entries.
    Check,
    /// Execute actions for new entries and acknowledge the results.
    Process {
        #[command(flatten)]
        args: commands::process::ProcessArgs,
    },
    /// Mark every changelog entry as seen.
    AckAll,
    /// Show acknowledgment store statistics.
    Stats,
    /// Remove acknowledgments older than the given age.
    Prune {
        /// Maximum record age in days.
        #[arg(long)]
        days: u32,
    },
    /// List configured command handlers.
    Handlers,
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("cu_updater=info".parse()?)
        .add_directive("cu_actions=info".parse()?)
        .add_directive("cu_ack=info".parse()?);

    // Logs go to stderr so stdout carries only report output.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let start = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let project_root = resolve_project_root(&start);
    let config = UpdaterConfig::load(&project_root)?;
    tracing::debug!(root = %project_root.display(), "resolved project root");

    match &cli.command {
        Commands::Check => commands::check::execute(&config),
        Commands::Process { args } => commands::process::execute(args, &config).await,
        Commands::AckAll => commands::ack::execute_ack_all(&config),
        Commands::Stats => commands::ack::execute_stats(&config),
        Commands::Prune { days } => commands::ack::execute_prune(*days, &config),
        Commands::Handlers => commands::handlers::execute(&config),
    }
}
