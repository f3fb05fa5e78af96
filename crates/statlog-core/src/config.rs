use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub squash: SquashConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Pruning thresholds handed through to storage.
///
/// Values stay in their human-readable form (`"336h"`, `"5G"`); nothing
/// here parses or range-checks them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_age")]
    pub max_status_history_age: String,
    #[serde(default = "default_history_size")]
    pub max_status_history_size: String,
    #[serde(default = "default_history_age")]
    pub max_action_results_age: String,
    #[serde(default = "default_history_size")]
    pub max_action_results_size: String,
    #[serde(default = "default_update_status_interval")]
    pub update_status_hook_interval: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_status_history_age: default_history_age(),
            max_status_history_size: default_history_size(),
            max_action_results_age: default_history_age(),
            max_action_results_size: default_history_size(),
            update_status_hook_interval: default_update_status_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquashConfig {
    #[serde(default = "default_cycle_size")]
    pub cycle_size: usize,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            cycle_size: default_cycle_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Records kept per entity by the in-memory store.
    #[serde(default = "default_window_capacity")]
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: default_window_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".statlog/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("statlog/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        user.output.as_deref(),
        env_format.as_deref(),
        std::io::stdout().is_terminal(),
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
    is_tty: bool,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if is_tty { "pretty" } else { "text" }.to_string()
}

fn default_history_age() -> String {
    "336h".to_string()
}

fn default_history_size() -> String {
    "5G".to_string()
}

fn default_update_status_interval() -> String {
    "5m".to_string()
}

const fn default_cycle_size() -> usize {
    1
}

const fn default_window_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.history.max_status_history_age, "336h");
        assert_eq!(cfg.history.max_status_history_size, "5G");
        assert_eq!(cfg.history.max_action_results_age, "336h");
        assert_eq!(cfg.history.max_action_results_size, "5G");
        assert_eq!(cfg.history.update_status_hook_interval, "5m");
        assert_eq!(cfg.squash.cycle_size, 1);
        assert_eq!(cfg.window.capacity, 100);
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let dir = root.path().join(".statlog");
        std::fs::create_dir_all(&dir).expect("create .statlog");
        std::fs::write(
            dir.join("config.toml"),
            "[history]\nmax_status_history_age = \"72h\"\n\n[squash]\ncycle_size = 3\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.history.max_status_history_age, "72h");
        assert_eq!(cfg.history.max_status_history_size, "5G");
        assert_eq!(cfg.squash.cycle_size, 3);
        assert_eq!(cfg.window.capacity, 100);
    }

    #[test]
    fn malformed_project_config_names_the_file() {
        let root = tempfile::tempdir().expect("temp dir must be created");
        let dir = root.path().join(".statlog");
        std::fs::create_dir_all(&dir).expect("create .statlog");
        std::fs::write(dir.join("config.toml"), "[squash\ncycle_size = ").expect("write config");

        let err = load_project_config(root.path()).expect_err("parse should fail");
        assert!(err.to_string().contains("Failed to parse"), "{err}");
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(true, Some("pretty"), Some("text"), true);
        assert_eq!(output, "json");
    }

    #[test]
    fn env_beats_user_config() {
        assert_eq!(resolve_output(false, Some("json"), Some("text"), true), "text");
        assert_eq!(resolve_output(false, Some("json"), Some("bogus"), true), "json");
    }

    #[test]
    fn legacy_aliases_are_normalized() {
        assert_eq!(resolve_output(false, Some("table"), Some("human"), false), "pretty");
        assert_eq!(resolve_output(false, Some("human"), Some("table"), false), "text");
    }

    #[test]
    fn tty_decides_when_nothing_is_configured() {
        assert_eq!(resolve_output(false, None, None, true), "pretty");
        assert_eq!(resolve_output(false, None, None, false), "text");
    }

    #[test]
    fn user_config_parses_output() {
        let cfg: UserConfig = toml::from_str("output = \"json\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("json"));
    }
}
