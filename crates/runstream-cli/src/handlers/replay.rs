use crate::config::Config;
use crate::output::LineView;
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use runstream_engine::{RunStream, StreamSnapshot};
use runstream_normalize::{StreamContext, read_envelopes};
use std::path::Path;

/// Options shared by every command that replays a recording
pub struct ReplayOptions {
    pub max_lines: Option<usize>,
    pub run_id: Option<String>,
    pub build_context: bool,
}

/// Read `file` and fold every envelope into a fresh stream.
pub fn load_snapshot(config: &Config, file: &Path, options: ReplayOptions) -> Result<StreamSnapshot> {
    let envelopes = read_envelopes(file)
        .with_context(|| format!("Failed to read recording {}", file.display()))?;

    let context = if options.build_context || config.build_context {
        StreamContext::Build
    } else {
        StreamContext::Mixed
    };
    let capacity = options.max_lines.unwrap_or(config.max_console_lines);
    tracing::info!(
        file = %file.display(),
        envelopes = envelopes.len(),
        capacity,
        "replaying recording"
    );

    let mut stream = RunStream::new(capacity).with_context(context);
    if options.run_id.is_some() {
        stream.reset(options.run_id, Vec::new());
    }
    stream.extend(envelopes);
    Ok(stream.into_snapshot())
}

pub fn handle(config: &Config, file: &Path, format: OutputFormat, options: ReplayOptions) -> Result<()> {
    let snapshot = load_snapshot(config, file, options)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Plain => {
            let enable_color = config.output.color.enabled(std::io::stdout().is_terminal());
            for line in snapshot.lines() {
                println!("{}", LineView { line, enable_color });
            }
            println!(
                "status: {} ({} lines)",
                snapshot.status,
                snapshot.console_lines.len()
            );
        }
    }

    Ok(())
}
