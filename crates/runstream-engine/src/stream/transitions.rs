use runstream_normalize::EventPayload;
use runstream_types::RunStreamStatus;

/// Lifecycle transition for one event. Unlisted operations keep `current`.
pub fn next_status(current: RunStreamStatus, payload: &EventPayload) -> RunStreamStatus {
    match payload {
        EventPayload::RunQueued(_) => RunStreamStatus::Queued,
        EventPayload::RunWaitingForBuild(_) => RunStreamStatus::WaitingForBuild,
        EventPayload::BuildStarted(_) => RunStreamStatus::Building,
        EventPayload::RunStarted(_) => RunStreamStatus::Running,
        EventPayload::RunError(_) => RunStreamStatus::Failed,
        EventPayload::RunCompleted(completion) => completion_status(completion.status.as_deref()),
        _ => current,
    }
}

/// Status reported by a run-completion event.
///
/// Unrecognized values keep the run `running` rather than dropping the event.
pub fn completion_status(status: Option<&str>) -> RunStreamStatus {
    match status {
        Some("succeeded") => RunStreamStatus::Succeeded,
        Some("failed") => RunStreamStatus::Failed,
        Some("cancelled") | Some("canceled") => RunStreamStatus::Canceled,
        Some("waiting_for_build") => RunStreamStatus::WaitingForBuild,
        _ => RunStreamStatus::Running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runstream_normalize::{CanonicalOp, all_aliases};
    use serde_json::json;

    const ALL_STATES: [RunStreamStatus; 8] = [
        RunStreamStatus::Idle,
        RunStreamStatus::Queued,
        RunStreamStatus::WaitingForBuild,
        RunStreamStatus::Building,
        RunStreamStatus::Running,
        RunStreamStatus::Succeeded,
        RunStreamStatus::Failed,
        RunStreamStatus::Canceled,
    ];

    fn expected(op: CanonicalOp, current: RunStreamStatus) -> RunStreamStatus {
        match op {
            CanonicalOp::RunQueued => RunStreamStatus::Queued,
            CanonicalOp::RunWaitingForBuild => RunStreamStatus::WaitingForBuild,
            CanonicalOp::BuildStarted => RunStreamStatus::Building,
            CanonicalOp::RunStarted => RunStreamStatus::Running,
            CanonicalOp::RunError => RunStreamStatus::Failed,
            CanonicalOp::RunCompleted => RunStreamStatus::Succeeded,
            _ => current,
        }
    }

    #[test]
    fn test_transition_table_is_total() {
        let payload = json!({"status": "succeeded"});
        for state in ALL_STATES {
            for (literal, op) in all_aliases() {
                let lifted = EventPayload::lift(*op, &payload);
                assert_eq!(
                    next_status(state, &lifted),
                    expected(*op, state),
                    "{} from {}",
                    literal,
                    state
                );
            }
        }
    }

    #[test]
    fn test_unrecognized_operations_keep_state() {
        for state in ALL_STATES {
            assert_eq!(next_status(state, &EventPayload::Unrecognized(json!({}))), state);
            assert_eq!(next_status(state, &EventPayload::Unclassified(json!(1))), state);
        }
    }

    #[test]
    fn test_completion_status_vocabulary() {
        assert_eq!(completion_status(Some("failed")), RunStreamStatus::Failed);
        assert_eq!(completion_status(Some("cancelled")), RunStreamStatus::Canceled);
        assert_eq!(completion_status(Some("canceled")), RunStreamStatus::Canceled);
        assert_eq!(
            completion_status(Some("waiting_for_build")),
            RunStreamStatus::WaitingForBuild
        );
        assert_eq!(completion_status(Some("exploded")), RunStreamStatus::Running);
        assert_eq!(completion_status(None), RunStreamStatus::Running);
    }

    #[test]
    fn test_run_error_is_idempotent() {
        let error = EventPayload::lift(CanonicalOp::RunError, &json!({"message": "x"}));
        let once = next_status(RunStreamStatus::Running, &error);
        assert_eq!(next_status(once, &error), RunStreamStatus::Failed);
    }
}
