//! TestWorld pattern for CLI integration tests.
//!
//! Each world owns a temp directory holding fixtures and an isolated config
//! file, so a developer's own `runstream` config never leaks into a test.

use anyhow::Result;
use assert_cmd::Command;
use runstream_types::Envelope;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::to_jsonl;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use assert_cmd::Command;
/// use runstream_testing::{TestWorld, fixtures};
///
/// let world = TestWorld::new().with_config("max_console_lines = 50\n");
/// let fixture = world.write_fixture("run.jsonl", &fixtures::unknown_type()).unwrap();
///
/// let mut cmd = Command::new("runstream");
/// world.configure_command(&mut cmd).arg("replay").arg(fixture);
/// cmd.assert().success();
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        Self {
            temp_dir,
            config_path,
            env_vars: HashMap::new(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the isolated config file. It only exists after `with_config`.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the isolated config file.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write envelopes as a JSONL fixture and return its path.
    pub fn write_fixture(&self, name: &str, envelopes: &[Envelope]) -> Result<PathBuf> {
        self.write_raw_fixture(name, &to_jsonl(envelopes))
    }

    /// Write arbitrary text, for fixtures with malformed lines.
    pub fn write_raw_fixture(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Point the command at this world's config and environment.
    ///
    /// The caller provides the base command (e.g. from `cargo_bin_cmd!("runstream")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(self.temp_dir.path())
            .env("RUNSTREAM_CONFIG", &self.config_path)
            .env_remove("RUNSTREAM_LOG")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }
}
