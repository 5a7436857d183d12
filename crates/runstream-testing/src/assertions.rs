//! Assertions over serialized snapshots and CLI JSON output.
//!
//! Everything takes a `serde_json::Value` so the same checks work on
//! `serde_json::to_value(snapshot)` and on `runstream replay --format json`.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;

fn console_lines(json: &Value) -> Result<&Vec<Value>> {
    json["console_lines"]
        .as_array()
        .context("Expected 'console_lines' array in JSON")
}

/// Assert the snapshot lifecycle status.
pub fn assert_status(json: &Value, expected: &str) -> Result<()> {
    let status = json["status"]
        .as_str()
        .context("Expected 'status' string in JSON")?;

    if status != expected {
        anyhow::bail!("Expected status {}, got {}", expected, status);
    }

    Ok(())
}

pub fn assert_line_count(json: &Value, expected: usize) -> Result<()> {
    let lines = console_lines(json)?;

    if lines.len() != expected {
        anyhow::bail!("Expected {} console lines, got {}", expected, lines.len());
    }

    Ok(())
}

/// Assert some console line contains `needle` and has the given level.
pub fn assert_line_with(json: &Value, needle: &str, level: &str) -> Result<()> {
    let lines = console_lines(json)?;

    let found = lines.iter().any(|line| {
        line["level"].as_str() == Some(level)
            && line["message"].as_str().is_some_and(|m| m.contains(needle))
    });

    if !found {
        let messages: Vec<&str> = lines
            .iter()
            .filter_map(|l| l["message"].as_str())
            .collect();
        anyhow::bail!(
            "No {} line containing {:?} in {:?}",
            level,
            needle,
            messages
        );
    }

    Ok(())
}

/// Assert every console line has a non-empty, distinct id.
pub fn assert_unique_line_ids(json: &Value) -> Result<()> {
    let lines = console_lines(json)?;
    let mut seen = HashSet::new();

    for (i, line) in lines.iter().enumerate() {
        let id = line["id"]
            .as_str()
            .with_context(|| format!("Line {} missing id", i))?;

        if id.is_empty() {
            anyhow::bail!("Line {} has an empty id", i);
        }
        if !seen.insert(id.to_string()) {
            anyhow::bail!("Line {} reuses id {}", i, id);
        }
    }

    Ok(())
}

/// Assert a phase in `build_phases` or `run_phases` has the given status.
pub fn assert_phase(json: &Value, map: &str, phase: &str, expected: &str) -> Result<()> {
    let status = json[map][phase]["status"]
        .as_str()
        .with_context(|| format!("Expected phase {} in {}", phase, map))?;

    if status != expected {
        anyhow::bail!(
            "Expected {}.{} to be {}, got {}",
            map,
            phase,
            expected,
            status
        );
    }

    Ok(())
}
