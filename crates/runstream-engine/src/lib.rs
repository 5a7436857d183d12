// Engine module - formatting and state reduction over normalized envelopes
// This layer sits between the normalizer and whatever renders the stream

pub mod format;
pub mod stream;
mod validation_state;

pub use format::{display_timestamp, format_duration, format_envelope, format_event};
pub use stream::{
    ConsoleBuffer, DEFAULT_MAX_CONSOLE_LINES, LineIds, RunStream, StreamAction, StreamSnapshot,
    next_status, reduce,
};
pub use validation_state::{ValidationState, ValidationStatus, derive_validation_state};

use runstream_normalize::StreamContext;
use runstream_types::Envelope;

// Façade API - what the CLI and other consumers call

/// Replay envelopes in order into a fresh stream.
pub fn replay<I>(envelopes: I, max_console_lines: usize, context: StreamContext) -> StreamSnapshot
where
    I: IntoIterator<Item = Envelope>,
{
    let mut stream = RunStream::new(max_console_lines).with_context(context);
    stream.extend(envelopes);
    stream.into_snapshot()
}
