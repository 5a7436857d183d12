use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Progress of a single build or run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl PhaseStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PhaseStatus::Succeeded | PhaseStatus::Failed | PhaseStatus::Skipped
        )
    }

    /// Terminal status reported by a phase-completion event.
    ///
    /// Anything other than `failed` / `skipped` counts as success, matching
    /// how completion lines are colored.
    pub fn from_completion(status: Option<&str>) -> Self {
        match status {
            Some("failed") => PhaseStatus::Failed,
            Some("skipped") => PhaseStatus::Skipped,
            _ => PhaseStatus::Succeeded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Running => "running",
            PhaseStatus::Succeeded => "succeeded",
            PhaseStatus::Failed => "failed",
            PhaseStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub status: PhaseStatus,

    /// Only set on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Phase name -> record. Ordered so snapshots serialize deterministically.
pub type PhaseMap = BTreeMap<String, PhaseRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_status_mapping() {
        assert_eq!(PhaseStatus::from_completion(Some("failed")), PhaseStatus::Failed);
        assert_eq!(PhaseStatus::from_completion(Some("skipped")), PhaseStatus::Skipped);
        assert_eq!(
            PhaseStatus::from_completion(Some("succeeded")),
            PhaseStatus::Succeeded
        );
        assert_eq!(PhaseStatus::from_completion(None), PhaseStatus::Succeeded);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!PhaseStatus::Pending.is_terminal());
        assert!(!PhaseStatus::Running.is_terminal());
        assert!(PhaseStatus::Succeeded.is_terminal());
        assert!(PhaseStatus::Failed.is_terminal());
        assert!(PhaseStatus::Skipped.is_terminal());
    }
}
