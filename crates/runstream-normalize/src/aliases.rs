use runstream_types::LineOrigin;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Alias-resolved operation, independent of which literal type string arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalOp {
    BuildCreated,
    BuildStarted,
    BuildPhaseStarted,
    BuildPhaseCompleted,
    BuildCompleted,
    ConsoleLine,
    RunQueued,
    RunWaitingForBuild,
    RunStarted,
    RunPhaseStarted,
    RunPhaseCompleted,
    TableSummary,
    SheetSummary,
    FileSummary,
    RunSummary,
    ColumnDetectorScore,
    RowDetectorScore,
    ValidationIssue,
    ValidationSummary,
    ConfigLoaded,
    RunError,
    RunCompleted,
}

impl CanonicalOp {
    /// Stream the operation belongs to. `ConsoleLine` is shared and decided
    /// per envelope, so it reports `Run` here as the default.
    pub fn origin(&self) -> LineOrigin {
        match self {
            CanonicalOp::BuildCreated
            | CanonicalOp::BuildStarted
            | CanonicalOp::BuildPhaseStarted
            | CanonicalOp::BuildPhaseCompleted
            | CanonicalOp::BuildCompleted => LineOrigin::Build,
            _ => LineOrigin::Run,
        }
    }

    /// Current spelling, used when listing aliases
    pub fn canonical_type(&self) -> &'static str {
        match self {
            CanonicalOp::BuildCreated => "build.created",
            CanonicalOp::BuildStarted => "build.started",
            CanonicalOp::BuildPhaseStarted => "build.phase.started",
            CanonicalOp::BuildPhaseCompleted => "build.phase.completed",
            CanonicalOp::BuildCompleted => "build.completed",
            CanonicalOp::ConsoleLine => "console.line",
            CanonicalOp::RunQueued => "run.queued",
            CanonicalOp::RunWaitingForBuild => "run.waiting_for_build",
            CanonicalOp::RunStarted => "run.started",
            CanonicalOp::RunPhaseStarted => "run.phase.started",
            CanonicalOp::RunPhaseCompleted => "run.phase.completed",
            CanonicalOp::TableSummary => "run.table.summary",
            CanonicalOp::SheetSummary => "run.sheet.summary",
            CanonicalOp::FileSummary => "run.file.summary",
            CanonicalOp::RunSummary => "run.summary",
            CanonicalOp::ColumnDetectorScore => "run.column_detector.score",
            CanonicalOp::RowDetectorScore => "run.row_detector.score",
            CanonicalOp::ValidationIssue => "run.validation.issue",
            CanonicalOp::ValidationSummary => "run.validation.summary",
            CanonicalOp::ConfigLoaded => "config.loaded",
            CanonicalOp::RunError => "run.error",
            CanonicalOp::RunCompleted => "run.completed",
        }
    }
}

/// Every literal type string the producers have ever emitted, current
/// spelling first within each group.
const ALIASES: &[(&str, CanonicalOp)] = &[
    ("build.created", CanonicalOp::BuildCreated),
    ("build.started", CanonicalOp::BuildStarted),
    ("build.start", CanonicalOp::BuildStarted),
    ("build.phase.started", CanonicalOp::BuildPhaseStarted),
    ("build.phase.start", CanonicalOp::BuildPhaseStarted),
    ("build.phase.completed", CanonicalOp::BuildPhaseCompleted),
    ("build.phase.complete", CanonicalOp::BuildPhaseCompleted),
    ("build.completed", CanonicalOp::BuildCompleted),
    ("build.complete", CanonicalOp::BuildCompleted),
    ("console.line", CanonicalOp::ConsoleLine),
    ("run.queued", CanonicalOp::RunQueued),
    ("run.waiting_for_build", CanonicalOp::RunWaitingForBuild),
    ("run.started", CanonicalOp::RunStarted),
    ("run.start", CanonicalOp::RunStarted),
    ("engine.start", CanonicalOp::RunStarted),
    ("run.phase.started", CanonicalOp::RunPhaseStarted),
    ("run.phase.start", CanonicalOp::RunPhaseStarted),
    ("engine.phase.start", CanonicalOp::RunPhaseStarted),
    ("run.phase.completed", CanonicalOp::RunPhaseCompleted),
    ("run.phase.complete", CanonicalOp::RunPhaseCompleted),
    ("engine.phase.complete", CanonicalOp::RunPhaseCompleted),
    ("run.table.summary", CanonicalOp::TableSummary),
    ("engine.table.summary", CanonicalOp::TableSummary),
    ("run.sheet.summary", CanonicalOp::SheetSummary),
    ("engine.sheet.summary", CanonicalOp::SheetSummary),
    ("run.file.summary", CanonicalOp::FileSummary),
    ("engine.file.summary", CanonicalOp::FileSummary),
    ("run.summary", CanonicalOp::RunSummary),
    ("engine.run.summary", CanonicalOp::RunSummary),
    ("run.column_detector.score", CanonicalOp::ColumnDetectorScore),
    ("engine.detector.column.score", CanonicalOp::ColumnDetectorScore),
    ("run.row_detector.score", CanonicalOp::RowDetectorScore),
    ("engine.detector.row.score", CanonicalOp::RowDetectorScore),
    ("run.validation.issue", CanonicalOp::ValidationIssue),
    ("engine.validation.issue", CanonicalOp::ValidationIssue),
    ("run.validation.summary", CanonicalOp::ValidationSummary),
    ("engine.validation.summary", CanonicalOp::ValidationSummary),
    ("config.loaded", CanonicalOp::ConfigLoaded),
    ("engine.config.loaded", CanonicalOp::ConfigLoaded),
    ("run.error", CanonicalOp::RunError),
    ("engine.error", CanonicalOp::RunError),
    ("run.completed", CanonicalOp::RunCompleted),
    ("run.complete", CanonicalOp::RunCompleted),
    ("engine.complete", CanonicalOp::RunCompleted),
];

static ALIAS_TABLE: LazyLock<HashMap<&'static str, CanonicalOp>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Resolve a literal event type to its canonical operation.
pub fn resolve_alias(event_type: &str) -> Option<CanonicalOp> {
    ALIAS_TABLE.get(event_type).copied()
}

/// The full alias table in declaration order.
pub fn all_aliases() -> &'static [(&'static str, CanonicalOp)] {
    ALIASES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alias_literals_are_unique() {
        let literals: HashSet<_> = ALIASES.iter().map(|(literal, _)| *literal).collect();
        assert_eq!(literals.len(), ALIASES.len());
    }

    #[test]
    fn test_canonical_type_resolves_to_itself() {
        for (_, op) in ALIASES {
            assert_eq!(resolve_alias(op.canonical_type()), Some(*op));
        }
    }

    #[test]
    fn test_renamed_types_share_an_operation() {
        assert_eq!(
            resolve_alias("build.phase.start"),
            resolve_alias("build.phase.started")
        );
        assert_eq!(resolve_alias("run.complete"), Some(CanonicalOp::RunCompleted));
        assert_eq!(resolve_alias("engine.complete"), Some(CanonicalOp::RunCompleted));
        assert_eq!(
            resolve_alias("engine.detector.column.score"),
            Some(CanonicalOp::ColumnDetectorScore)
        );
        assert_eq!(resolve_alias("run.totally_unknown_event"), None);
    }

    #[test]
    fn test_build_operations_have_build_origin() {
        assert_eq!(CanonicalOp::BuildPhaseCompleted.origin(), LineOrigin::Build);
        assert_eq!(CanonicalOp::RunCompleted.origin(), LineOrigin::Run);
        assert_eq!(CanonicalOp::ConfigLoaded.origin(), LineOrigin::Run);
    }
}
