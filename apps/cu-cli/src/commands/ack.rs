// ack.rs — Acknowledgment store commands: ack-all, stats, prune.

use chrono::{DateTime, Utc};

use cu_updater::{Updater, UpdaterConfig};

pub fn execute_ack_all(config: &UpdaterConfig) -> anyhow::Result<()> {
    let mut updater = Updater::new(config.clone(), Default::default());
    let count = updater.acknowledge_all()?;
    if count == 0 {
        println!("All changelog entries were already acknowledged.");
    } else {
        println!("Marked {} changelog entr{} as seen.", count, if count == 1 { "y" } else { "ies" });
    }
    Ok(())
}

pub fn execute_stats(config: &UpdaterConfig) -> anyhow::Result<()> {
    let updater = Updater::new(config.clone(), Default::default());
    let stats = updater.stats();

    println!("Store: {}", updater.tracker().path().display());
    match updater.checkpoint_version() {
        Some(version) => println!("Checkpoint: {}", version),
        None => println!("Checkpoint: none"),
    }
    println!("Acknowledged entries: {}", stats.total);
    for (status, count) in &stats.by_status {
        println!("  {:<10} {}", status, count);
    }
    if let Some(oldest) = stats.oldest.and_then(format_millis) {
        println!("Oldest: {}", oldest);
    }
    if let Some(newest) = stats.newest.and_then(format_millis) {
        println!("Newest: {}", newest);
    }
    Ok(())
}

pub fn execute_prune(days: u32, config: &UpdaterConfig) -> anyhow::Result<()> {
    let mut updater = Updater::new(config.clone(), Default::default());
    let removed = updater.prune(days)?;
    println!(
        "Removed {} acknowledgment(s) older than {} days at or below the checkpoint.",
        removed, days
    );
    Ok(())
}

fn format_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|t| t.to_rfc3339())
}
