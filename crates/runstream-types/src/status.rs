use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// NOTE: Two status vocabularies
//
// The stream tracks its own lifecycle (RunStreamStatus), which has states the
// backend never reports (`idle`, `building`) and spells cancellation
// `canceled`. Persisted run records use RunStatus, which spells it
// `cancelled`. Anything comparing the two goes through `From<RunStatus>`.

/// Lifecycle of one run attempt as seen by the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStreamStatus {
    #[default]
    Idle,
    Queued,
    WaitingForBuild,
    Building,
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl RunStreamStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            RunStreamStatus::Queued
                | RunStreamStatus::WaitingForBuild
                | RunStreamStatus::Building
                | RunStreamStatus::Running
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStreamStatus::Succeeded | RunStreamStatus::Failed | RunStreamStatus::Canceled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStreamStatus::Idle => "idle",
            RunStreamStatus::Queued => "queued",
            RunStreamStatus::WaitingForBuild => "waiting_for_build",
            RunStreamStatus::Building => "building",
            RunStreamStatus::Running => "running",
            RunStreamStatus::Succeeded => "succeeded",
            RunStreamStatus::Failed => "failed",
            RunStreamStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for RunStreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status vocabulary of persisted run records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    WaitingForBuild,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::WaitingForBuild => "waiting_for_build",
            RunStatus::Running => "running",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(RunStatus::Queued),
            "waiting_for_build" => Ok(RunStatus::WaitingForBuild),
            "running" => Ok(RunStatus::Running),
            "succeeded" => Ok(RunStatus::Succeeded),
            "failed" => Ok(RunStatus::Failed),
            "cancelled" | "canceled" => Ok(RunStatus::Cancelled),
            other => Err(format!("unknown run status: {}", other)),
        }
    }
}

impl From<RunStatus> for RunStreamStatus {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Queued => RunStreamStatus::Queued,
            RunStatus::WaitingForBuild => RunStreamStatus::WaitingForBuild,
            RunStatus::Running => RunStreamStatus::Running,
            RunStatus::Succeeded => RunStreamStatus::Succeeded,
            RunStatus::Failed => RunStreamStatus::Failed,
            RunStatus::Cancelled => RunStreamStatus::Canceled,
        }
    }
}

/// Map a persisted status string onto the stream vocabulary.
pub fn normalize_run_status(status: &str) -> Option<RunStreamStatus> {
    status.parse::<RunStatus>().ok().map(RunStreamStatus::from)
}

/// What the run was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Validation,
    Extraction,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Validation => "validation",
            RunMode::Extraction => "extraction",
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validation" | "validate" => Ok(RunMode::Validation),
            "extraction" | "extract" => Ok(RunMode::Extraction),
            other => Err(format!("unknown run mode: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_maps_to_stream_vocabulary() {
        assert_eq!(
            RunStreamStatus::from(RunStatus::Cancelled),
            RunStreamStatus::Canceled
        );
        assert_eq!(
            normalize_run_status("waiting_for_build"),
            Some(RunStreamStatus::WaitingForBuild)
        );
        assert_eq!(normalize_run_status("canceled"), Some(RunStreamStatus::Canceled));
        assert_eq!(normalize_run_status("building"), None);
    }

    #[test]
    fn test_progress_and_terminal_partition() {
        let all = [
            RunStreamStatus::Idle,
            RunStreamStatus::Queued,
            RunStreamStatus::WaitingForBuild,
            RunStreamStatus::Building,
            RunStreamStatus::Running,
            RunStreamStatus::Succeeded,
            RunStreamStatus::Failed,
            RunStreamStatus::Canceled,
        ];

        for status in all {
            assert!(
                !(status.is_in_progress() && status.is_terminal()),
                "{} cannot be both",
                status
            );
        }

        let in_progress: Vec<_> = all.iter().filter(|s| s.is_in_progress()).collect();
        assert_eq!(in_progress.len(), 4);
        assert!(!RunStreamStatus::Idle.is_in_progress());
        assert!(!RunStreamStatus::Idle.is_terminal());
    }

    #[test]
    fn test_stream_status_serializes_snake_case() {
        let json = serde_json::to_string(&RunStreamStatus::WaitingForBuild).unwrap();
        assert_eq!(json, "\"waiting_for_build\"");
    }
}
