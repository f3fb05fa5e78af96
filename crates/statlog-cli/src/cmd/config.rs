//! `statlog config` — print the effective configuration.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use statlog_core::config::EffectiveConfig;
use std::io::{self, Write};

fn entries(config: &EffectiveConfig) -> Vec<(&'static str, String)> {
    let history = &config.project.history;
    vec![
        (
            "history.max_status_history_age",
            history.max_status_history_age.clone(),
        ),
        (
            "history.max_status_history_size",
            history.max_status_history_size.clone(),
        ),
        (
            "history.max_action_results_age",
            history.max_action_results_age.clone(),
        ),
        (
            "history.max_action_results_size",
            history.max_action_results_size.clone(),
        ),
        (
            "history.update_status_hook_interval",
            history.update_status_hook_interval.clone(),
        ),
        ("squash.cycle_size", config.project.squash.cycle_size.to_string()),
        ("window.capacity", config.project.window.capacity.to_string()),
        ("output", config.resolved_output.clone()),
    ]
}

fn render_config_text(config: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in entries(config) {
        writeln!(w, "{key}={value}")?;
    }
    Ok(())
}

fn render_config_human(config: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Effective configuration")?;
    for (key, value) in entries(config) {
        pretty_kv(w, key, value)?;
    }
    Ok(())
}

/// Execute `statlog config`.
///
/// # Errors
///
/// Returns an error if output rendering fails.
pub fn run_config(config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<()> {
    render_mode(output, config, render_config_text, render_config_human)
}
