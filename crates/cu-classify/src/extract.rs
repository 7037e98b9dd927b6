// extract.rs — Pull concrete tokens out of entry text.
//
// Changelog bullets quote the things a user has to type or set in
// backticks. Anything that looks like an environment variable, a slash
// command, a JSON settings file or a long flag inside backticks is
// collected, plus bare Ctrl+/Cmd+ shortcuts. Matches keep their order of
// appearance.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([A-Z][A-Z0-9_]+)`").expect("invalid env var regex"));

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(/\w+)`").expect("invalid command regex"));

static SETTINGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([\w.]+\.json)`").expect("invalid settings regex"));

static FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(--[\w-]+)`").expect("invalid flag regex"));

static SHORTCUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Ctrl|Cmd)\+(\w+)").expect("invalid shortcut regex"));

/// Tokens found in one entry. Empty lists are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDetails {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<String>,
}

impl ExtractedDetails {
    pub fn is_empty(&self) -> bool {
        self.env_vars.is_empty()
            && self.commands.is_empty()
            && self.settings.is_empty()
            && self.flags.is_empty()
            && self.shortcuts.is_empty()
    }

    /// Every token in a fixed kind order, for display and argument templating.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.env_vars
            .iter()
            .chain(&self.commands)
            .chain(&self.settings)
            .chain(&self.flags)
            .chain(&self.shortcuts)
            .map(String::as_str)
    }
}

fn captures(re: &Regex, content: &str) -> Vec<String> {
    re.captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Extract every token kind from `content`.
pub fn extract_details(content: &str) -> ExtractedDetails {
    let shortcuts = SHORTCUT_RE
        .captures_iter(content)
        .map(|c| format!("{}+{}", &c[1], &c[2]))
        .collect();

    ExtractedDetails {
        env_vars: captures(&ENV_VAR_RE, content),
        commands: captures(&COMMAND_RE, content),
        settings: captures(&SETTINGS_RE, content),
        flags: captures(&FLAG_RE, content),
        shortcuts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_env_var() {
        let d = extract_details("New `CLAUDE_CODE_TMPDIR` env var");
        assert_eq!(d.env_vars, vec!["CLAUDE_CODE_TMPDIR"]);
        assert!(d.commands.is_empty());
    }

    #[test]
    fn extracts_command_and_settings() {
        let d = extract_details("Use `/teleport` after editing `settings.json`");
        assert_eq!(d.commands, vec!["/teleport"]);
        assert_eq!(d.settings, vec!["settings.json"]);
    }

    #[test]
    fn extracts_flags_with_dashes() {
        let d = extract_details("Added `--no-color` and `--verbose` flags");
        assert_eq!(d.flags, vec!["--no-color", "--verbose"]);
    }

    #[test]
    fn extracts_shortcuts_without_backticks() {
        let d = extract_details("Press Ctrl+R to search, cmd+k to clear");
        assert_eq!(d.shortcuts, vec!["Ctrl+R", "cmd+k"]);
    }

    #[test]
    fn lowercase_backtick_word_is_not_env_var() {
        let d = extract_details("Renamed `foo_bar` option");
        assert!(d.env_vars.is_empty());
    }

    #[test]
    fn plain_text_yields_nothing() {
        let d = extract_details("Faster startup");
        assert!(d.is_empty());
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn all_chains_kinds_in_order() {
        let d = extract_details("`FOO_BAR` with `/cmd` and `--x` via Ctrl+X");
        let all: Vec<&str> = d.all().collect();
        assert_eq!(all, vec!["FOO_BAR", "/cmd", "--x", "Ctrl+X"]);
    }
}
