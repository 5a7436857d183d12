use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineLevel {
    Info,
    Warning,
    Success,
    Error,
}

impl LineLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineLevel::Info => "info",
            LineLevel::Warning => "warning",
            LineLevel::Success => "success",
            LineLevel::Error => "error",
        }
    }
}

/// Which stream a line came from.
///
/// `Raw` marks envelopes that could not be classified at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOrigin {
    Build,
    Run,
    Raw,
}

impl LineOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineOrigin::Build => "build",
            LineOrigin::Run => "run",
            LineOrigin::Raw => "raw",
        }
    }
}

/// Normalized, human-readable output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticLine {
    /// Stable identifier. Empty until the line is appended to a console buffer,
    /// then assigned exactly once.
    #[serde(default)]
    pub id: String,

    pub level: LineLevel,

    pub origin: LineOrigin,

    /// One or more newline-joined summary lines
    pub message: String,

    /// Display timestamp (`HH:MM:SS`), empty when the source time was unusable
    #[serde(default)]
    pub timestamp: String,

    /// The original envelope, kept for audit
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl DiagnosticLine {
    pub fn new(level: LineLevel, origin: LineOrigin, message: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            level,
            origin,
            message: message.into(),
            timestamp: String::new(),
            raw: Value::Null,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}
