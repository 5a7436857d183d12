//! Run stream state: a pure reducer over envelopes plus a small owner type.
//!
//! `reduce` is the whole state machine. `RunStream` only holds the current
//! snapshot so callers can dispatch without threading it through themselves.

mod action;
mod console;
mod reducer;
mod snapshot;
mod transitions;

pub use action::StreamAction;
pub use console::{ConsoleBuffer, LineIds};
pub use reducer::reduce;
pub use snapshot::{DEFAULT_MAX_CONSOLE_LINES, StreamSnapshot};
pub use transitions::{completion_status, next_status};

use runstream_normalize::StreamContext;
use runstream_types::{DiagnosticLine, Envelope};

#[derive(Debug, Clone, Default)]
pub struct RunStream {
    snapshot: StreamSnapshot,
}

impl RunStream {
    pub fn new(max_console_lines: usize) -> Self {
        Self {
            snapshot: StreamSnapshot::new(max_console_lines),
        }
    }

    /// Stream with a fixed id salt, so line ids are reproducible.
    pub fn with_line_ids(max_console_lines: usize, line_ids: LineIds) -> Self {
        Self {
            snapshot: StreamSnapshot::with_line_ids(max_console_lines, line_ids),
        }
    }

    /// Treat every console line as build output, for streams known to carry only build events.
    pub fn with_context(mut self, context: StreamContext) -> Self {
        self.snapshot.context = context;
        self
    }

    pub fn reset(&mut self, run_id: Option<String>, seed_lines: Vec<DiagnosticLine>) {
        self.dispatch(StreamAction::Reset { run_id, seed_lines });
    }

    pub fn dispatch(&mut self, action: StreamAction) {
        let current = std::mem::replace(&mut self.snapshot, StreamSnapshot::placeholder());
        self.snapshot = reduce(current, action);
    }

    pub fn dispatch_envelope(&mut self, envelope: Envelope) {
        self.dispatch(StreamAction::Event(envelope));
    }

    pub fn snapshot(&self) -> &StreamSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> StreamSnapshot {
        self.snapshot
    }
}

impl Extend<Envelope> for RunStream {
    fn extend<I: IntoIterator<Item = Envelope>>(&mut self, envelopes: I) {
        for envelope in envelopes {
            self.dispatch_envelope(envelope);
        }
    }
}
