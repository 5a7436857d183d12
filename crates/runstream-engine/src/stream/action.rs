use runstream_types::{DiagnosticLine, Envelope, RunMode};

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum StreamAction {
    /// Start over, optionally seeding the console with carried-over lines
    Reset {
        run_id: Option<String>,
        seed_lines: Vec<DiagnosticLine>,
    },
    /// Switch to another run; the current console lines are carried over
    AttachRun {
        run_id: Option<String>,
        run_mode: Option<RunMode>,
    },
    ClearConsole,
    /// A line formatted by the caller
    AppendLine(DiagnosticLine),
    Event(Envelope),
}

impl From<Envelope> for StreamAction {
    fn from(envelope: Envelope) -> Self {
        StreamAction::Event(envelope)
    }
}

impl From<DiagnosticLine> for StreamAction {
    fn from(line: DiagnosticLine) -> Self {
        StreamAction::AppendLine(line)
    }
}
