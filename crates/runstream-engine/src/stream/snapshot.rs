use super::console::{ConsoleBuffer, LineIds};
use chrono::{DateTime, Utc};
use runstream_normalize::StreamContext;
use runstream_types::{DiagnosticLine, PhaseMap, RunMode, RunStreamStatus, ValidationSummary};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_MAX_CONSOLE_LINES: usize = 1000;

/// Everything a viewer needs to render one run attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub run_id: Option<String>,
    pub run_mode: Option<RunMode>,
    pub status: RunStreamStatus,
    pub build_phases: PhaseMap,
    pub run_phases: PhaseMap,
    pub console_lines: ConsoleBuffer,
    pub validation_summary: ValidationSummary,
    /// Payload of the run-completion event, as received
    pub completed_payload: Option<Value>,
    pub completed_at: Option<DateTime<Utc>>,
    pub max_console_lines: usize,

    #[serde(skip)]
    pub(crate) context: StreamContext,
    #[serde(skip)]
    pub(crate) line_ids: LineIds,
}

impl StreamSnapshot {
    pub fn new(max_console_lines: usize) -> Self {
        Self::with_line_ids(max_console_lines, LineIds::random())
    }

    pub fn with_line_ids(max_console_lines: usize, line_ids: LineIds) -> Self {
        let console_lines = ConsoleBuffer::new(max_console_lines);
        Self {
            run_id: None,
            run_mode: None,
            status: RunStreamStatus::Idle,
            build_phases: PhaseMap::new(),
            run_phases: PhaseMap::new(),
            max_console_lines: console_lines.capacity(),
            console_lines,
            validation_summary: ValidationSummary::default(),
            completed_payload: None,
            completed_at: None,
            context: StreamContext::default(),
            line_ids,
        }
    }

    /// Stand-in while the real snapshot is moved through `reduce`
    pub(crate) fn placeholder() -> Self {
        Self::with_line_ids(1, LineIds::seeded(String::new()))
    }

    pub fn context(&self) -> StreamContext {
        self.context
    }

    /// Append a line, assigning an id if it has none.
    pub(crate) fn append_line(&mut self, mut line: DiagnosticLine, at: Option<DateTime<Utc>>) {
        if !line.has_id() {
            line.id = self
                .line_ids
                .next_id(line.origin, at.map(|t| t.timestamp_millis()));
        }
        let evicted = self.console_lines.push(line);
        if evicted > 0 {
            tracing::trace!(evicted, capacity = self.max_console_lines, "console buffer full");
        }
    }

    /// Blank state for a new run attempt.
    ///
    /// Capacity, context and the line id sequence carry over; everything else
    /// starts empty.
    pub(crate) fn restart(self, run_id: Option<String>) -> Self {
        let mut fresh = Self::with_line_ids(self.max_console_lines, self.line_ids);
        fresh.context = self.context;
        fresh.run_id = run_id;
        fresh
    }

    pub fn lines(&self) -> impl Iterator<Item = &DiagnosticLine> {
        self.console_lines.iter()
    }
}

impl Default for StreamSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONSOLE_LINES)
    }
}
