use super::replay::{ReplayOptions, load_snapshot};
use crate::config::Config;
use anyhow::Result;
use runstream_engine::derive_validation_state;
use std::path::Path;

pub fn handle(config: &Config, file: &Path, run_id: Option<String>) -> Result<()> {
    let options = ReplayOptions {
        max_lines: None,
        run_id,
        build_context: false,
    };
    let snapshot = load_snapshot(config, file, options)?;
    let state = derive_validation_state(&snapshot, None);

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
