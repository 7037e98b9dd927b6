//! # Command Handlers
//!
//! Configuration-driven external commands that carry out actions.
//!
//! Example `.changelog/handlers.toml`:
//! ```toml
//! [[handler]]
//! action = "apply"
//! category = "config"
//! command = "scripts/add-env-var.sh"
//! args = ["{detail}", "{version}"]
//! description = "Append new environment variables to .envrc"
//!
//! [[handler]]
//! action = "try_command"
//! versions = "2.1.*"
//! command = "notify-send"
//! args = ["Try {detail}", "{content}"]
//!
//! [[handler]]
//! action = "view_migration"
//! command = "open"
//! args = ["https://example.com/migrations/{version}"]
//! ```
//!
//! Rules are registered in file order; the registry's first-match lookup
//! makes the first matching rule win.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use cu_classify::{ClassifiedEntry, EntryCategory};

use crate::action::UserAction;
use crate::error::ActionError;
use crate::handler::{ActionHandler, ActionResult};
use crate::registry::HandlerRegistry;

/// Handler rules loaded from `.changelog/handlers.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HandlersConfig {
    /// Rules, evaluated in order.
    #[serde(default)]
    pub handler: Vec<HandlerRule>,
}

/// One rule mapping an action (and optionally a category and version range)
/// to an external command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerRule {
    pub action: UserAction,
    /// Only entries of this category.
    #[serde(default)]
    pub category: Option<EntryCategory>,
    /// Glob over the entry version, e.g. `"2.1.*"`.
    #[serde(default)]
    pub versions: Option<String>,
    pub command: String,
    /// Arguments; `{content}`, `{version}`, `{entry_id}` and `{detail}` are
    /// substituted per entry.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl HandlersConfig {
    /// Load handler rules from a TOML file.
    ///
    /// Returns an empty config if the file doesn't exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ActionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ActionError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let config: HandlersConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), rules = config.handler.len(), "loaded handler rules");
        Ok(config)
    }

    /// Load from the standard location (`.changelog/handlers.toml` in the project root).
    pub fn load_from_project<P: AsRef<Path>>(project_root: P) -> Result<Self, ActionError> {
        Self::load(project_root.as_ref().join(".changelog/handlers.toml"))
    }

    /// Register one [`CommandHandler`] per rule, in order.
    pub fn register_all(self, registry: &mut HandlerRegistry) {
        for rule in self.handler {
            registry.register(Arc::new(CommandHandler::new(rule)));
        }
    }
}

impl HandlerRule {
    pub fn matches(&self, entry: &ClassifiedEntry, action: UserAction) -> bool {
        if self.action != action {
            return false;
        }
        if self.category.is_some_and(|c| c != entry.category) {
            return false;
        }
        match &self.versions {
            Some(pattern) => version_matches(pattern, entry.version()),
            None => true,
        }
    }
}

fn version_matches(pattern: &str, version: &str) -> bool {
    match glob::Pattern::new(pattern) {
        Ok(glob_pattern) => glob_pattern.matches(version),
        Err(_) => false,
    }
}

/// Substitute per-entry placeholders in one argument.
fn expand_arg(arg: &str, entry: &ClassifiedEntry) -> String {
    let detail = entry.extracted_details.all().next().unwrap_or_default();
    arg.replace("{content}", entry.content())
        .replace("{version}", entry.version())
        .replace("{entry_id}", &entry.id())
        .replace("{detail}", detail)
}

/// Runs an external command for entries matching its rule.
pub struct CommandHandler {
    rule: HandlerRule,
}

impl CommandHandler {
    pub fn new(rule: HandlerRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> &HandlerRule {
        &self.rule
    }
}

#[async_trait]
impl ActionHandler for CommandHandler {
    fn can_handle(&self, entry: &ClassifiedEntry, action: UserAction) -> bool {
        self.rule.matches(entry, action)
    }

    async fn execute(
        &self,
        entry: &ClassifiedEntry,
        action: UserAction,
    ) -> Result<ActionResult, ActionError> {
        let args: Vec<String> = self
            .rule
            .args
            .iter()
            .map(|arg| expand_arg(arg, entry))
            .collect();

        let output = Command::new(&self.rule.command)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ActionError::CommandNotFound(self.rule.command.clone())
                } else {
                    ActionError::LaunchFailed(format!("{}: {}", self.rule.command, e))
                }
            })?;

        tracing::info!(
            command = %self.rule.command,
            entry = %entry.id(),
            %action,
            status = %output.status,
            "ran handler command"
        );

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let mut result = ActionResult::success(format!("{} completed", self.describe()));
            if let ActionResult::Success { details, .. } = &mut result {
                details.insert("stdout".to_string(), stdout);
            }
            Ok(result)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let mut error = format!("{} exited with {}", self.rule.command, output.status);
            if !stderr.is_empty() {
                error.push_str(": ");
                error.push_str(&stderr);
            }
            Ok(ActionResult::failure(error, true))
        }
    }

    fn describe(&self) -> String {
        self.rule
            .description
            .clone()
            .unwrap_or_else(|| format!("{} via {}", self.rule.action, self.rule.command))
    }
}
