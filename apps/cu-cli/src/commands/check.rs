// check.rs — `cu check`: list new changelog entries grouped by category.

use cu_classify::{detect_breaking_change, group_by_category};
use cu_updater::{Updater, UpdaterConfig};

pub fn execute(config: &UpdaterConfig) -> anyhow::Result<()> {
    let updater = Updater::from_config(config.clone())?;
    let check = updater.check_for_updates()?;

    println!("{}", check.summary());
    if !check.has_updates {
        return Ok(());
    }

    match &check.from_version {
        Some(from) => println!("Versions: {} -> {}", from, check.to_version),
        None => println!("Versions: {} (first run)", check.to_version),
    }

    for (category, entries) in group_by_category(&check.new_entries) {
        println!();
        println!("{} ({}):", category, entries.len());
        for entry in entries {
            let marker = if entry.action_required { "!" } else { " " };
            println!("  {} [{}] {}", marker, entry.version(), entry.content());
            if !entry.extracted_details.is_empty() {
                let details: Vec<&str> = entry.extracted_details.all().collect();
                println!("      details: {}", details.join(", "));
            }
            if let Some(info) = detect_breaking_change(entry) {
                println!(
                    "      {:?} change in {} (severity {:?})",
                    info.kind, info.affected_area, info.severity
                );
            }
        }
    }
    Ok(())
}
