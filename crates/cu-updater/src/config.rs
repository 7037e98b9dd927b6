// config.rs — Updater configuration.
//
// UpdaterConfig determines where the updater reads the changelog and keeps
// its state. `for_project()` generates the standard layout under a
// `.changelog/` directory in the project root; an optional
// `.changelog/updater.toml` overrides individual settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cu_actions::BatchOptions;

use crate::error::UpdaterError;

/// Directories searched for the changelog, in order.
const CHANGELOG_DIRS: [&str; 4] = ["DOCUMENTATION", "docs", "", ".changelog"];
const CHANGELOG_NAMES: [&str; 2] = ["changelog.md", "CHANGELOG.md"];

/// Files or directories that mark a project root.
const ROOT_MARKERS: [&str; 4] = [".changelog", "Cargo.toml", "package.json", ".git"];

/// Fully resolved configuration for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    pub project_root: PathBuf,

    /// Changelog document to read.
    pub changelog_path: PathBuf,

    /// Acknowledgment store file.
    pub ack_store_path: PathBuf,

    /// Command handler rules.
    pub handlers_path: PathBuf,

    /// Versions at or below this are never reported.
    #[serde(default)]
    pub baseline_version: Option<String>,

    /// Prune acknowledgments older than this many days at the start of a cycle.
    #[serde(default)]
    pub retention_days: Option<u32>,

    #[serde(default)]
    pub batch: BatchOptions,
}

/// Contents of `.changelog/updater.toml`. Relative paths are resolved
/// against the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdaterSettings {
    #[serde(default)]
    pub changelog: Option<PathBuf>,
    #[serde(default)]
    pub ack_store: Option<PathBuf>,
    #[serde(default)]
    pub handlers: Option<PathBuf>,
    #[serde(default)]
    pub baseline_version: Option<String>,
    #[serde(default)]
    pub retention_days: Option<u32>,
    #[serde(default)]
    pub batch: BatchOptions,
}

impl UpdaterConfig {
    /// Create a config with the standard `.changelog/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let state_dir = root.join(".changelog");
        Self {
            changelog_path: find_changelog(&root)
                .unwrap_or_else(|| root.join("DOCUMENTATION").join(CHANGELOG_NAMES[0])),
            ack_store_path: state_dir.join("ack-store.json"),
            handlers_path: state_dir.join("handlers.toml"),
            baseline_version: None,
            retention_days: None,
            batch: BatchOptions::default(),
            project_root: root,
        }
    }

    /// Path of the settings file for a project.
    pub fn settings_path(project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(".changelog").join("updater.toml")
    }

    /// Standard layout with `.changelog/updater.toml` applied on top.
    ///
    /// A missing settings file is not an error; invalid TOML is.
    pub fn load(project_root: impl AsRef<Path>) -> Result<Self, UpdaterError> {
        let root = project_root.as_ref();
        let mut config = Self::for_project(root);
        let path = Self::settings_path(root);
        if !path.exists() {
            return Ok(config);
        }
        let content = std::fs::read_to_string(&path).map_err(|source| UpdaterError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        let settings: UpdaterSettings = toml::from_str(&content)?;
        config.apply(settings);
        Ok(config)
    }

    /// Like [`load`](Self::load), falling back to the standard layout on error.
    pub fn load_or_default(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        Self::load(root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring invalid updater settings");
            Self::for_project(root)
        })
    }

    fn apply(&mut self, settings: UpdaterSettings) {
        let root = &self.project_root;
        if let Some(p) = settings.changelog {
            self.changelog_path = root.join(p);
        }
        if let Some(p) = settings.ack_store {
            self.ack_store_path = root.join(p);
        }
        if let Some(p) = settings.handlers {
            self.handlers_path = root.join(p);
        }
        if settings.baseline_version.is_some() {
            self.baseline_version = settings.baseline_version;
        }
        if settings.retention_days.is_some() {
            self.retention_days = settings.retention_days;
        }
        self.batch = settings.batch;
    }
}

/// First existing changelog under the project root, in search order.
pub fn find_changelog(project_root: &Path) -> Option<PathBuf> {
    CHANGELOG_DIRS
        .iter()
        .flat_map(|dir| {
            CHANGELOG_NAMES
                .iter()
                .map(move |name| project_root.join(dir).join(name))
        })
        .find(|candidate| candidate.is_file())
}

/// Walk up from `start` to the nearest directory containing a root marker.
///
/// Falls back to `start` when no ancestor qualifies.
pub fn resolve_project_root(start: impl AsRef<Path>) -> PathBuf {
    let start = start.as_ref();
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .unwrap_or(start)
        .to_path_buf()
}
