use super::action::StreamAction;
use super::snapshot::StreamSnapshot;
use super::transitions::next_status;
use crate::format::format_line;
use runstream_normalize::{EventPayload, PhaseCompleted, PhaseStarted, ValidationPatch, normalize};
use runstream_types::{DiagnosticLine, Envelope, PhaseMap, PhaseStatus, RunMode, ValidationSummary};

/// Fold one action into the snapshot.
///
/// Total over every action and every envelope: nothing here returns an error
/// or panics, whatever order events arrive in.
pub fn reduce(state: StreamSnapshot, action: StreamAction) -> StreamSnapshot {
    match action {
        StreamAction::Reset { run_id, seed_lines } => {
            tracing::debug!(run_id = ?run_id, seeded = seed_lines.len(), "reset stream");
            seed(state.restart(run_id), seed_lines)
        }
        StreamAction::AttachRun { run_id, run_mode } => {
            tracing::debug!(run_id = ?run_id, mode = ?run_mode, "attach run");
            let mut state = state;
            let carried = state.console_lines.drain_all();
            let mut next = seed(state.restart(run_id), carried);
            next.run_mode = run_mode;
            next
        }
        StreamAction::ClearConsole => {
            let mut state = state;
            state.console_lines.clear();
            state
        }
        StreamAction::AppendLine(line) => {
            let mut state = state;
            state.append_line(line, None);
            state
        }
        StreamAction::Event(envelope) => apply_event(state, &envelope),
    }
}

fn seed(mut state: StreamSnapshot, lines: Vec<DiagnosticLine>) -> StreamSnapshot {
    for line in lines {
        state.append_line(line, None);
    }
    state
}

fn apply_event(mut state: StreamSnapshot, envelope: &Envelope) -> StreamSnapshot {
    let event = normalize(envelope, state.context());
    tracing::trace!(event = envelope.event_type(), op = ?event.op, "dispatch event");
    let at = envelope.timestamp();
    state.append_line(format_line(&event, envelope), at);

    match &event.payload {
        EventPayload::BuildPhaseStarted(p) => start_phase(&mut state.build_phases, p),
        EventPayload::BuildPhaseCompleted(p) => complete_phase(&mut state.build_phases, p),
        EventPayload::RunPhaseStarted(p) => start_phase(&mut state.run_phases, p),
        EventPayload::RunPhaseCompleted(p) => complete_phase(&mut state.run_phases, p),
        EventPayload::RunStarted(p) => {
            if let Some(mode) = p.mode {
                state.run_mode = Some(mode);
            }
        }
        EventPayload::ValidationIssue(issue) => {
            state.validation_summary.push_issue(issue.clone());
        }
        EventPayload::ValidationSummary(patch) => {
            apply_patch(&mut state.validation_summary, patch, true);
        }
        EventPayload::RunCompleted(completion) => {
            state.completed_payload = Some(envelope.payload().clone());
            state.completed_at = at;
            if let Some(patch) = &completion.validation {
                apply_patch(&mut state.validation_summary, patch, false);
            }
        }
        EventPayload::RunError(error) => {
            if state.run_mode == Some(RunMode::Validation)
                && let Some(message) = &error.message
            {
                state.validation_summary.error = Some(message.clone());
            }
        }
        _ => {}
    }

    if state.run_id.is_none()
        && let Some(run_id) = envelope.correlation_id()
    {
        state.run_id = Some(run_id.to_string());
    }

    let status = next_status(state.status, &event.payload);
    if status != state.status {
        tracing::debug!(from = %state.status, to = %status, event = envelope.event_type(), "status change");
    }
    state.status = status;
    state
}

fn start_phase(phases: &mut PhaseMap, p: &PhaseStarted) {
    let Some(name) = &p.phase else {
        return;
    };
    let record = phases.entry(name.clone()).or_default();
    if record.status.is_terminal() {
        tracing::trace!(phase = %name, "start after completion ignored");
        return;
    }
    record.status = PhaseStatus::Running;
    if p.message.is_some() {
        record.message = p.message.clone();
    }
}

fn complete_phase(phases: &mut PhaseMap, p: &PhaseCompleted) {
    let Some(name) = &p.phase else {
        return;
    };
    let record = phases.entry(name.clone()).or_default();
    record.status = PhaseStatus::from_completion(p.status.as_deref());
    record.duration_ms = p
        .duration_ms
        .filter(|d| d.is_finite() && *d >= 0.0)
        .map(|d| d.round() as u64);
    if p.message.is_some() {
        record.message = p.message.clone();
    }
}

/// `replace_issues` is set for summary events, which restate the whole list.
/// Completion events only merge what they carry.
fn apply_patch(summary: &mut ValidationSummary, patch: &ValidationPatch, replace_issues: bool) {
    match (&patch.issues, replace_issues) {
        (Some(issues), _) => {
            summary.issues = issues.clone();
            summary.issues_total = patch.issues_total.unwrap_or(issues.len() as u64);
        }
        (None, true) => {
            summary.issues.clear();
            summary.issues_total = patch.issues_total.unwrap_or(0);
        }
        (None, false) => {
            if let Some(total) = patch.issues_total {
                summary.issues_total = total;
            }
        }
    }
    if patch.max_severity.is_some() {
        summary.max_severity = patch.max_severity;
    }
    if patch.content_digest.is_some() {
        summary.content_digest = patch.content_digest.clone();
    }
    if patch.error.is_some() {
        summary.error = patch.error.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::LineIds;
    use runstream_types::{LineLevel, LineOrigin, RunStreamStatus, Severity};
    use serde_json::{Value, json};

    fn state() -> StreamSnapshot {
        StreamSnapshot::with_line_ids(50, LineIds::seeded("t"))
    }

    fn event(event_type: &str, payload: Value) -> StreamAction {
        StreamAction::Event(Envelope::new(
            event_type,
            Some(json!("2025-06-01T12:00:00Z")),
            payload,
        ))
    }

    fn fold(actions: Vec<StreamAction>) -> StreamSnapshot {
        actions.into_iter().fold(state(), reduce)
    }

    #[test]
    fn test_phase_lifecycle() {
        let s = fold(vec![
            event("build.phase.start", json!({"phase": "install"})),
            event(
                "build.phase.complete",
                json!({"phase": "install", "status": "succeeded", "duration_ms": 1234.4}),
            ),
        ]);
        let record = &s.build_phases["install"];
        assert_eq!(record.status, PhaseStatus::Succeeded);
        assert_eq!(record.duration_ms, Some(1234));
        assert!(s.run_phases.is_empty());
    }

    #[test]
    fn test_phase_start_after_completion_is_ignored() {
        let s = fold(vec![
            event("run.phase.completed", json!({"phase": "mapping", "status": "failed"})),
            event("run.phase.started", json!({"phase": "mapping"})),
        ]);
        assert_eq!(s.run_phases["mapping"].status, PhaseStatus::Failed);
    }

    #[test]
    fn test_phase_without_name_is_line_only() {
        let s = fold(vec![event("run.phase.started", json!({}))]);
        assert!(s.run_phases.is_empty());
        assert_eq!(s.console_lines.len(), 1);
    }

    #[test]
    fn test_issues_accumulate_then_summary_replaces() {
        let s = fold(vec![
            event("run.validation.issue", json!({"level": "warning", "message": "a"})),
            event("run.validation.issue", json!({"level": "error", "message": "b"})),
        ]);
        assert_eq!(s.validation_summary.issues_total, 2);
        assert_eq!(s.validation_summary.max_severity, Some(Severity::Error));

        let s = reduce(
            s,
            event(
                "run.validation.summary",
                json!({"issues_total": 7, "content_digest": "sha256:1"}),
            ),
        );
        assert!(s.validation_summary.issues.is_empty());
        assert_eq!(s.validation_summary.issues_total, 7);
        assert_eq!(s.validation_summary.max_severity, Some(Severity::Error));
        assert_eq!(s.validation_summary.content_digest.as_deref(), Some("sha256:1"));
    }

    #[test]
    fn test_completion_merges_validation() {
        let s = fold(vec![
            event("run.validation.issue", json!({"level": "info", "message": "a"})),
            event(
                "run.completed",
                json!({"status": "succeeded", "validation": {"content_digest": "d"}}),
            ),
        ]);
        assert_eq!(s.validation_summary.issues.len(), 1);
        assert_eq!(s.validation_summary.content_digest.as_deref(), Some("d"));
        assert_eq!(s.status, RunStreamStatus::Succeeded);
        assert!(s.completed_payload.is_some());
        assert!(s.completed_at.is_some());
    }

    #[test]
    fn test_run_error_sets_error_in_validation_mode_only() {
        let extraction = fold(vec![
            event("run.started", json!({"mode": "extraction"})),
            event("run.error", json!({"message": "boom"})),
        ]);
        assert_eq!(extraction.status, RunStreamStatus::Failed);
        assert_eq!(extraction.validation_summary.error, None);

        let validation = fold(vec![
            event("run.started", json!({"validate_only": true})),
            event("run.error", json!({"message": "boom"})),
        ]);
        assert_eq!(validation.run_mode, Some(RunMode::Validation));
        assert_eq!(validation.validation_summary.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_attach_run_carries_console_lines() {
        let s = fold(vec![
            event("build.started", json!({})),
            event("run.error", json!({"message": "old"})),
            StreamAction::AttachRun {
                run_id: Some("run-2".to_string()),
                run_mode: Some(RunMode::Validation),
            },
        ]);
        assert_eq!(s.status, RunStreamStatus::Idle);
        assert_eq!(s.run_id.as_deref(), Some("run-2"));
        assert_eq!(s.run_mode, Some(RunMode::Validation));
        assert_eq!(s.console_lines.len(), 2);
        assert_eq!(s.validation_summary, ValidationSummary::default());
    }

    #[test]
    fn test_reset_seeds_lines_and_keeps_their_ids() {
        let mut carried = DiagnosticLine::new(LineLevel::Info, LineOrigin::Build, "carried");
        carried.id = "build-1-0-x".to_string();
        let s = fold(vec![
            event("run.queued", json!({})),
            StreamAction::Reset {
                run_id: None,
                seed_lines: vec![
                    carried,
                    DiagnosticLine::new(LineLevel::Info, LineOrigin::Run, "fresh"),
                ],
            },
        ]);
        let ids: Vec<_> = s.lines().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["build-1-0-x", "run-na-1-t"]);
        assert_eq!(s.status, RunStreamStatus::Idle);
    }

    #[test]
    fn test_clear_console_keeps_state() {
        let s = fold(vec![event("run.started", json!({})), StreamAction::ClearConsole]);
        assert!(s.console_lines.is_empty());
        assert_eq!(s.status, RunStreamStatus::Running);
    }

    #[test]
    fn test_run_id_adopted_from_first_envelope() {
        let env = Envelope::with_run_id("run.queued", None, Some("run-9".to_string()), json!({}));
        let s = reduce(state(), StreamAction::Event(env));
        assert_eq!(s.run_id.as_deref(), Some("run-9"));
    }
}
