//! tracelog CLI
//!
//! - `tracelog replay events.jsonl` feeds a recorded event stream through
//!   the logging handler and writes a trace file
//! - `tracelog inspect trace.log` summarizes an existing trace file

mod inspect;
mod replay;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracelog::{LoggerConfig, TraceLoggerBuilder, WriteMode};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Log root override, applied after the config file
const ROOT_ENV: &str = "TRACELOG_ROOT";

#[derive(Debug, Parser)]
#[command(name = "tracelog", version, about = "Agent reasoning-trace logger")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a JSONL event stream into a new trace file
    Replay {
        /// One event notification per line
        events: PathBuf,

        /// Directory holding the json/ trace directory
        #[arg(long, env = ROOT_ENV)]
        log_root: Option<PathBuf>,

        /// Write through a temp file and rename
        #[arg(long)]
        atomic: bool,
    },
    /// Summarize a trace file
    Inspect {
        /// Trace file written by the handler
        trace: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Replay {
            events,
            log_root,
            atomic,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut builder = TraceLoggerBuilder::new().config(config);
            if let Some(root) = log_root {
                builder = builder.log_root(root);
            }
            if atomic {
                builder = builder.write_mode(WriteMode::Atomic);
            }
            let handler = builder.build().context("Failed to create trace file")?;
            let report = replay::replay_file(handler, &events)?;
            println!("{}", report);
            Ok(())
        }
        Command::Inspect { trace, json } => {
            let summary = inspect::inspect_file(&trace)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<LoggerConfig> {
    match path {
        Some(path) => LoggerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(LoggerConfig::default()),
    }
}
