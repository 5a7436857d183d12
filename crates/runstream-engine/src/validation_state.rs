use crate::stream::StreamSnapshot;
use chrono::{DateTime, Utc};
use runstream_types::{RunMode, RunStreamStatus, ValidationIssue};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Idle,
    Running,
    Success,
    Error,
}

/// What a validation panel shows for one run attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationState {
    pub status: ValidationStatus,
    pub messages: Vec<ValidationIssue>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub digest: Option<String>,
}

/// Derive the validation view from a snapshot.
///
/// `seed_issues` come from an earlier run the caller still shows; they stand
/// in for the issue list until this run records its own.
pub fn derive_validation_state(
    snapshot: &StreamSnapshot,
    seed_issues: Option<&[ValidationIssue]>,
) -> ValidationState {
    let summary = &snapshot.validation_summary;
    let seeded = seed_issues.unwrap_or_default();

    let status = if snapshot.status.is_in_progress() && snapshot.run_mode == Some(RunMode::Validation)
    {
        ValidationStatus::Running
    } else if summary.error.is_some()
        || matches!(
            snapshot.status,
            RunStreamStatus::Failed | RunStreamStatus::Canceled
        )
    {
        ValidationStatus::Error
    } else if summary.has_issues()
        || !seeded.is_empty()
        || snapshot.status == RunStreamStatus::Succeeded
    {
        ValidationStatus::Success
    } else {
        ValidationStatus::Idle
    };

    let messages = if summary.issues.is_empty() {
        seeded.to_vec()
    } else {
        summary.issues.clone()
    };

    ValidationState {
        status,
        messages,
        last_run_at: snapshot.completed_at,
        error: summary.error.clone(),
        digest: summary.content_digest.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runstream_types::Severity;

    fn snapshot(status: RunStreamStatus, mode: Option<RunMode>) -> StreamSnapshot {
        let mut s = StreamSnapshot::new(10);
        s.status = status;
        s.run_mode = mode;
        s
    }

    #[test]
    fn test_running_only_in_validation_mode() {
        let s = snapshot(RunStreamStatus::Running, Some(RunMode::Validation));
        assert_eq!(derive_validation_state(&s, None).status, ValidationStatus::Running);

        let s = snapshot(RunStreamStatus::Running, Some(RunMode::Extraction));
        assert_eq!(derive_validation_state(&s, None).status, ValidationStatus::Idle);
    }

    #[test]
    fn test_error_precedence() {
        let mut s = snapshot(RunStreamStatus::Succeeded, None);
        s.validation_summary.error = Some("bad schema".to_string());
        let state = derive_validation_state(&s, None);
        assert_eq!(state.status, ValidationStatus::Error);
        assert_eq!(state.error.as_deref(), Some("bad schema"));

        let s = snapshot(RunStreamStatus::Canceled, None);
        assert_eq!(derive_validation_state(&s, None).status, ValidationStatus::Error);
    }

    #[test]
    fn test_seed_issues_fill_in_until_recorded() {
        let seed = [ValidationIssue::new(Severity::Warning, "from last run")];
        let s = snapshot(RunStreamStatus::Idle, None);
        let state = derive_validation_state(&s, Some(&seed));
        assert_eq!(state.status, ValidationStatus::Success);
        assert_eq!(state.messages, seed.to_vec());

        let mut s = snapshot(RunStreamStatus::Idle, None);
        s.validation_summary
            .push_issue(ValidationIssue::new(Severity::Error, "fresh"));
        let state = derive_validation_state(&s, Some(&seed));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].message, "fresh");
    }

    #[test]
    fn test_idle_by_default() {
        let state = derive_validation_state(&StreamSnapshot::new(10), None);
        assert_eq!(state.status, ValidationStatus::Idle);
        assert!(state.messages.is_empty());
        assert_eq!(state.last_run_at, None);
    }
}
