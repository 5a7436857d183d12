// NOTE: Formatter Design
//
// One pure function per canonical operation, dispatched by an exhaustive
// match over EventPayload. Each branch returns (level, message); the
// dispatcher attaches origin, display timestamp and the raw envelope.
//
// Nothing here can fail. Unknown operations fall through to a line holding
// the payload as JSON, so a producer ahead of this code still shows up.

mod coverage;
mod detector;
mod lifecycle;
mod time;
mod validation;

pub use time::{display_timestamp, display_timestamp_in, format_duration};

use lifecycle::Kind;
use runstream_normalize::{EventPayload, NormalizedEvent, StreamContext, normalize};
use runstream_types::{DiagnosticLine, Envelope, LineLevel};

/// Format a classified event. Pure: identical input gives identical output.
///
/// The returned line has no id and no raw envelope attached.
pub fn format_event(event: &NormalizedEvent, timestamp: &str) -> DiagnosticLine {
    let (level, message) = match &event.payload {
        EventPayload::BuildCreated(p) => lifecycle::build_created(p),
        EventPayload::BuildStarted(p) => lifecycle::build_started(p),
        EventPayload::BuildPhaseStarted(p) => lifecycle::phase_started(Kind::Build, p),
        EventPayload::BuildPhaseCompleted(p) => lifecycle::phase_completed(Kind::Build, p),
        EventPayload::BuildCompleted(p) => lifecycle::completion(Kind::Build, p),
        EventPayload::ConsoleLine(p) => lifecycle::console_line(p),
        EventPayload::RunQueued(p) => lifecycle::run_queued(p),
        EventPayload::RunWaitingForBuild(p) => lifecycle::waiting_for_build(p),
        EventPayload::RunStarted(p) => lifecycle::run_started(p),
        EventPayload::RunPhaseStarted(p) => lifecycle::phase_started(Kind::Run, p),
        EventPayload::RunPhaseCompleted(p) => lifecycle::phase_completed(Kind::Run, p),
        EventPayload::TableSummary(s)
        | EventPayload::SheetSummary(s)
        | EventPayload::FileSummary(s)
        | EventPayload::RunSummary(s) => coverage::coverage(s),
        EventPayload::ColumnDetectorScore(p) => detector::column_detector(p),
        EventPayload::RowDetectorScore(p) => detector::row_detector(p),
        EventPayload::ValidationIssue(p) => validation::issue(p),
        EventPayload::ValidationSummary(p) => validation::summary(p),
        EventPayload::ConfigLoaded(p) => lifecycle::config_loaded(p),
        EventPayload::RunError(p) => lifecycle::run_error(p),
        EventPayload::RunCompleted(p) => lifecycle::completion(Kind::Run, p),
        EventPayload::Unrecognized(payload) => (LineLevel::Info, payload.to_string()),
        EventPayload::Unclassified(raw) => (LineLevel::Info, raw.to_string()),
    };

    DiagnosticLine::new(level, event.origin, message).with_timestamp(timestamp)
}

/// Classify and format an envelope, keeping the envelope as the line's raw record.
pub fn format_envelope(envelope: &Envelope, context: StreamContext) -> DiagnosticLine {
    let event = normalize(envelope, context);
    format_line(&event, envelope)
}

pub(crate) fn format_line(event: &NormalizedEvent, envelope: &Envelope) -> DiagnosticLine {
    let timestamp = display_timestamp(envelope.created_at());
    format_event(event, &timestamp).with_raw(envelope.raw().clone())
}
