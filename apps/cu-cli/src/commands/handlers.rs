// handlers.rs — `cu handlers`: list configured command handlers.

use cu_updater::{Updater, UpdaterConfig};

pub fn execute(config: &UpdaterConfig) -> anyhow::Result<()> {
    let updater = Updater::from_config(config.clone())?;
    let registry = updater.registry();

    if registry.is_empty() {
        println!(
            "No handlers configured. Add [[handler]] entries to {}",
            config.handlers_path.display()
        );
        return Ok(());
    }

    println!("{} handler(s) from {}:", registry.len(), config.handlers_path.display());
    for description in registry.describe_all() {
        println!("  - {}", description);
    }
    Ok(())
}
