use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "runstream")]
#[command(about = "Replay build/run telemetry as diagnostic lines and run state", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $RUNSTREAM_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Feed a JSONL recording through the reducer and print the console
    Replay {
        /// One envelope per line; unparseable lines become raw lines
        file: PathBuf,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,

        /// Console buffer capacity (overrides config)
        #[arg(long)]
        max_lines: Option<usize>,

        /// Reset the stream to this run before replaying
        #[arg(long)]
        run_id: Option<String>,

        /// Treat every console line as build output
        #[arg(long)]
        build_context: bool,
    },

    /// Replay a recording and print the derived validation state as JSON
    Validation {
        file: PathBuf,

        #[arg(long)]
        run_id: Option<String>,
    },

    /// List every accepted event type and the operation it maps to
    Aliases {
        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}
