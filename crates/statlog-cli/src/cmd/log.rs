//! `statlog log` — show (and optionally squash) one entity's status history.

use crate::input;
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};
use chrono::{DateTime, Duration, Local, Utc};
use clap::Args;
use serde::Serialize;
use statlog_core::config::ProjectConfig;
use statlog_core::{
    ErrorCode, History, InstanceStatusHistoryGetter, Status, StatusHistoryFilter,
    StatusHistoryGetter, StatusRecord,
};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

/// Records returned when no selector is given.
pub const DEFAULT_SIZE: usize = 20;

#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Entity to inspect (e.g. `mysql/0`).
    pub entity: String,

    /// JSON-lines file of status records.
    #[arg(short, long, value_name = "PATH")]
    pub file: PathBuf,

    /// Return at most this many records.
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Only records at/after this RFC3339 timestamp.
    #[arg(long, value_name = "RFC3339")]
    pub from_date: Option<String>,

    /// Only records from the last N days.
    #[arg(long)]
    pub days: Option<u32>,

    /// Only records from the last N hours.
    #[arg(long)]
    pub hours: Option<u32>,

    /// Leave out records with this status (repeatable).
    #[arg(long = "exclude", value_name = "STATUS")]
    pub exclude: Vec<String>,

    /// Collapse repeated cycles of N records. Without N, uses the
    /// configured `squash.cycle_size`.
    #[arg(long, value_name = "N", num_args = 0..=1)]
    pub squash: Option<Option<usize>>,

    /// Show provider instance history instead of agent/workload history.
    #[arg(long)]
    pub instance: bool,
}

#[derive(Debug, Serialize)]
pub struct LogOutput {
    pub entity: String,
    pub instance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash_cycle: Option<usize>,
    pub fetched: usize,
    pub records: History,
}

fn fail(output: OutputMode, code: ErrorCode, message: String) -> anyhow::Result<()> {
    render_error(output, &CliError::from_code(code, message.clone()))?;
    anyhow::bail!(message)
}

/// Build the query filter from the selector flags.
///
/// The filter is handed on as given; the history source validates it, so
/// conflicting flags surface as an invalid-filter error there.
fn build_filter(args: &LogArgs) -> Result<StatusHistoryFilter, CliError> {
    let from_date = args
        .from_date
        .as_deref()
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| {
                    CliError::from_code(
                        ErrorCode::InvalidFilter,
                        format!("invalid --from-date timestamp '{raw}': {e}"),
                    )
                })
        })
        .transpose()?;

    let delta = match (args.days, args.hours) {
        (None, None) => None,
        (days, hours) => Some(
            Duration::days(i64::from(days.unwrap_or(0)))
                + Duration::hours(i64::from(hours.unwrap_or(0))),
        ),
    };

    let size = match (args.size, from_date, delta) {
        (None, None, None) => DEFAULT_SIZE,
        (size, _, _) => size.unwrap_or(0),
    };

    let exclude: BTreeSet<Status> = args
        .exclude
        .iter()
        .map(|raw| raw.parse::<Status>())
        .collect::<Result<_, _>>()
        .map_err(|e| CliError::from_code(ErrorCode::InvalidEnumValue, e.to_string()))?;

    Ok(StatusHistoryFilter {
        size,
        from_date,
        delta,
        exclude,
    })
}

/// Execute `statlog log <entity>`.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the filter is invalid,
/// the entity has no history, or output rendering fails.
pub fn run_log(args: &LogArgs, config: &ProjectConfig, output: OutputMode) -> anyhow::Result<()> {
    let filter = match build_filter(args) {
        Ok(filter) => filter,
        Err(e) => {
            render_error(output, &e)?;
            anyhow::bail!(e.message);
        }
    };

    let store = match input::load_file(&args.file, config.window.capacity) {
        Ok(store) => store,
        Err(e) => return fail(output, ErrorCode::InputParseError, format!("{e:#}")),
    };

    let fetched = if args.instance {
        store.instance_status_history(&args.entity, &filter)
    } else {
        store.status_history(&args.entity, &filter)
    };
    let history = match fetched {
        Ok(history) => history,
        Err(e) => return fail(output, e.code(), e.to_string()),
    };

    let squash_cycle = args
        .squash
        .map(|cycle| cycle.unwrap_or(config.squash.cycle_size));
    let fetched = history.len();
    let records = match squash_cycle {
        Some(cycle) => match history.squash_logs(cycle) {
            Ok(squashed) => squashed,
            Err(e) => return fail(output, e.code(), e.to_string()),
        },
        None => history,
    };

    let log = LogOutput {
        entity: args.entity.clone(),
        instance: args.instance,
        squash_cycle,
        fetched,
        records,
    };

    render_mode(output, &log, render_log_text, render_log_human)
}

fn format_since(since: Option<DateTime<Utc>>) -> String {
    since.map_or_else(
        || "-".to_string(),
        |ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

fn kind_label(record: &StatusRecord) -> &'static str {
    record.kind.map_or("-", |kind| kind.as_str())
}

fn render_log_text(log: &LogOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "since  kind  status  info")?;
    for record in &log.records {
        let since = record
            .since
            .map_or_else(|| "-".to_string(), |ts| ts.to_rfc3339());
        writeln!(
            w,
            "{since}  {}  {}  {}",
            kind_label(record),
            record.status,
            record.info
        )?;
    }
    Ok(())
}

fn render_log_human(log: &LogOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let scope = if log.instance { "instance " } else { "" };
    pretty_section(w, &format!("{}: {scope}status history", log.entity))?;
    if log.records.is_empty() {
        writeln!(w, "(no records)")?;
        return Ok(());
    }
    for record in &log.records {
        let status = record.status.to_string();
        writeln!(
            w,
            "{:<19}  {:<14}  {:<18}  {}",
            format_since(record.since),
            kind_label(record),
            if status.is_empty() { "-" } else { status.as_str() },
            record.info
        )?;
        if let Some(err) = &record.err {
            writeln!(w, "{:<19}  error: {err}", "")?;
        }
    }
    if let Some(cycle) = log.squash_cycle {
        writeln!(
            w,
            "\n{} records fetched, {} shown after squashing cycles of {cycle}",
            log.fetched,
            log.records.len()
        )?;
    }
    Ok(())
}
