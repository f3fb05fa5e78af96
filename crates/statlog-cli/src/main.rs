#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use statlog_core::ErrorCode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "statlog: status history viewer with cycle squashing",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Show an entity's status history",
        long_about = "Show the status history of one entity from a JSON-lines record file, \
                      optionally collapsing repeated cycles of statuses.",
        after_help = "EXAMPLES:\n    # Last 20 records (default)\n    statlog log mysql/0 --file status.jsonl\n\n    # Last two days, without idle records\n    statlog log mysql/0 --file status.jsonl --days 2 --exclude idle\n\n    # Collapse repeated update-status pairs\n    statlog log mysql/0 --file status.jsonl -n 200 --squash 2\n\n    # Provider instance history\n    statlog log 0 --file status.jsonl --instance\n\n    # Emit machine-readable output\n    statlog log mysql/0 --file status.jsonl --json"
    )]
    Log(cmd::log::LogArgs),

    #[command(
        next_help_heading = "Read",
        about = "List history kinds",
        long_about = "List every history kind a status record can carry, with its description.",
        after_help = "EXAMPLES:\n    # List kinds\n    statlog kinds\n\n    # Emit machine-readable output\n    statlog kinds --json"
    )]
    Kinds,

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Show effective configuration",
        long_about = "Print the configuration after merging project config, user config and environment.",
        after_help = "EXAMPLES:\n    # Show configuration\n    statlog config\n\n    # Emit machine-readable output\n    statlog config --json"
    )]
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STATLOG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "statlog=debug,info"
        } else {
            "statlog=info,warn"
        })
    });

    let format = env::var("STATLOG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let effective = match statlog_core::config::resolve_config(&project_root, cli.json) {
        Ok(effective) => effective,
        Err(e) => {
            let mode = if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Text
            };
            render_error(
                mode,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };
    let output = OutputMode::from_resolved(&effective.resolved_output);

    match cli.command {
        Commands::Log(ref args) => cmd::log::run_log(args, &effective.project, output),
        Commands::Kinds => cmd::kinds::run_kinds(output),
        Commands::Config => cmd::config::run_config(&effective, output),
    }
}
