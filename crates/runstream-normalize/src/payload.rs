use runstream_types::{RunMode, Severity, ValidationIssue};
use serde_json::Value;

use crate::aliases::CanonicalOp;
use crate::fields::FieldExt;

/// Typed payload, one variant per canonical operation.
///
/// Lifting from JSON never fails. Fields the producer omitted, or sent with an
/// unexpected type, are simply `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    BuildCreated(BuildCreated),
    BuildStarted(BuildStarted),
    BuildPhaseStarted(PhaseStarted),
    BuildPhaseCompleted(PhaseCompleted),
    BuildCompleted(Completion),
    ConsoleLine(ConsoleLine),
    RunQueued(RunQueued),
    RunWaitingForBuild(WaitingForBuild),
    RunStarted(RunStarted),
    RunPhaseStarted(PhaseStarted),
    RunPhaseCompleted(PhaseCompleted),
    TableSummary(CoverageSummary),
    SheetSummary(CoverageSummary),
    FileSummary(CoverageSummary),
    RunSummary(CoverageSummary),
    ColumnDetectorScore(ColumnDetector),
    RowDetectorScore(RowDetector),
    ValidationIssue(ValidationIssue),
    ValidationSummary(ValidationPatch),
    ConfigLoaded(ConfigLoaded),
    RunError(RunError),
    RunCompleted(Completion),

    /// Known namespace, operation not in the alias table
    Unrecognized(Value),

    /// Envelope matched no namespace; holds the whole envelope
    Unclassified(Value),
}

impl EventPayload {
    pub fn lift(op: CanonicalOp, payload: &Value) -> Self {
        match op {
            CanonicalOp::BuildCreated => EventPayload::BuildCreated(BuildCreated::lift(payload)),
            CanonicalOp::BuildStarted => EventPayload::BuildStarted(BuildStarted::lift(payload)),
            CanonicalOp::BuildPhaseStarted => {
                EventPayload::BuildPhaseStarted(PhaseStarted::lift(payload))
            }
            CanonicalOp::BuildPhaseCompleted => {
                EventPayload::BuildPhaseCompleted(PhaseCompleted::lift(payload))
            }
            CanonicalOp::BuildCompleted => EventPayload::BuildCompleted(Completion::lift(payload)),
            CanonicalOp::ConsoleLine => EventPayload::ConsoleLine(ConsoleLine::lift(payload)),
            CanonicalOp::RunQueued => EventPayload::RunQueued(RunQueued::lift(payload)),
            CanonicalOp::RunWaitingForBuild => {
                EventPayload::RunWaitingForBuild(WaitingForBuild::lift(payload))
            }
            CanonicalOp::RunStarted => EventPayload::RunStarted(RunStarted::lift(payload)),
            CanonicalOp::RunPhaseStarted => {
                EventPayload::RunPhaseStarted(PhaseStarted::lift(payload))
            }
            CanonicalOp::RunPhaseCompleted => {
                EventPayload::RunPhaseCompleted(PhaseCompleted::lift(payload))
            }
            CanonicalOp::TableSummary => {
                EventPayload::TableSummary(CoverageSummary::lift(SummaryScope::Table, payload))
            }
            CanonicalOp::SheetSummary => {
                EventPayload::SheetSummary(CoverageSummary::lift(SummaryScope::Sheet, payload))
            }
            CanonicalOp::FileSummary => {
                EventPayload::FileSummary(CoverageSummary::lift(SummaryScope::File, payload))
            }
            CanonicalOp::RunSummary => {
                EventPayload::RunSummary(CoverageSummary::lift(SummaryScope::Run, payload))
            }
            CanonicalOp::ColumnDetectorScore => {
                EventPayload::ColumnDetectorScore(ColumnDetector::lift(payload))
            }
            CanonicalOp::RowDetectorScore => {
                EventPayload::RowDetectorScore(RowDetector::lift(payload))
            }
            CanonicalOp::ValidationIssue => {
                // Some producers wrap the issue: {"issue": {...}}
                let issue = payload.child("issue").unwrap_or(payload);
                EventPayload::ValidationIssue(lift_issue(issue))
            }
            CanonicalOp::ValidationSummary => {
                EventPayload::ValidationSummary(ValidationPatch::lift(payload))
            }
            CanonicalOp::ConfigLoaded => EventPayload::ConfigLoaded(ConfigLoaded::lift(payload)),
            CanonicalOp::RunError => EventPayload::RunError(RunError::lift(payload)),
            CanonicalOp::RunCompleted => EventPayload::RunCompleted(Completion::lift(payload)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildCreated {
    pub build_id: Option<String>,
    pub reason: Option<String>,
}

impl BuildCreated {
    fn lift(v: &Value) -> Self {
        Self {
            build_id: v.text("build_id"),
            reason: v.text("reason"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildStarted {
    pub build_id: Option<String>,
    pub reason: Option<String>,
}

impl BuildStarted {
    fn lift(v: &Value) -> Self {
        Self {
            build_id: v.text("build_id"),
            reason: v.text("reason"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseStarted {
    pub phase: Option<String>,
    pub message: Option<String>,
}

impl PhaseStarted {
    fn lift(v: &Value) -> Self {
        Self {
            phase: v.text("phase"),
            message: v.text("message"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseCompleted {
    pub phase: Option<String>,
    pub status: Option<String>,
    /// Raw reading; formatters only use it when non-negative
    pub duration_ms: Option<f64>,
    pub message: Option<String>,
}

impl PhaseCompleted {
    fn lift(v: &Value) -> Self {
        Self {
            phase: v.text("phase"),
            status: v.text("status"),
            duration_ms: v.number("duration_ms"),
            message: v.text("message"),
        }
    }
}

/// Terminal event for a build or a run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Completion {
    pub status: Option<String>,
    pub exit_code: Option<i64>,
    pub error_message: Option<String>,
    pub failure_message: Option<String>,
    pub summary: Option<String>,
    pub duration_ms: Option<f64>,
    /// Validation fields reported alongside completion
    pub validation: Option<ValidationPatch>,
}

impl Completion {
    fn lift(v: &Value) -> Self {
        Self {
            status: v.text("status"),
            exit_code: v.integer("exit_code"),
            error_message: v.text("error_message"),
            failure_message: v.child("failure").and_then(|f| f.text("message")),
            // Only a plain-text summary is usable as a message
            summary: match v.field("summary") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
                _ => None,
            },
            duration_ms: v.number("duration_ms"),
            validation: v.child("validation").map(ValidationPatch::lift),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsoleLine {
    pub scope: Option<String>,
    pub stream: Option<String>,
    pub level: Option<String>,
    pub message: String,
}

impl ConsoleLine {
    fn lift(v: &Value) -> Self {
        Self {
            scope: v.text("scope"),
            stream: v.text("stream"),
            level: v.text("level"),
            message: v
                .field("message")
                .or_else(|| v.field("text"))
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn is_build_scope(&self) -> bool {
        self.scope.as_deref() == Some("build")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunQueued {
    pub queue_position: Option<u64>,
}

impl RunQueued {
    fn lift(v: &Value) -> Self {
        Self {
            queue_position: v.count("queue_position"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaitingForBuild {
    pub build_id: Option<String>,
    pub reason: Option<String>,
}

impl WaitingForBuild {
    fn lift(v: &Value) -> Self {
        Self {
            build_id: v.text("build_id"),
            reason: v.text("reason"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStarted {
    pub mode: Option<RunMode>,
    pub engine_version: Option<String>,
}

impl RunStarted {
    fn lift(v: &Value) -> Self {
        let mode = v
            .text("mode")
            .and_then(|m| m.parse::<RunMode>().ok())
            .or_else(|| match v.flag("validate_only") {
                Some(true) => Some(RunMode::Validation),
                _ => None,
            });

        Self {
            mode,
            engine_version: v.text("engine_version"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryScope {
    Table,
    Sheet,
    File,
    Run,
}

impl SummaryScope {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "table" => Some(SummaryScope::Table),
            "sheet" => Some(SummaryScope::Sheet),
            "file" => Some(SummaryScope::File),
            "run" => Some(SummaryScope::Run),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryScope::Table => "Table",
            SummaryScope::Sheet => "Sheet",
            SummaryScope::File => "File",
            SummaryScope::Run => "Run",
        }
    }
}

// NOTE: Two summary shapes
//
// Schema-tagged summaries carry `schema_id` + `scope` and report coverage
// through `counts`, `fields[]` and `columns[]`. The older table summary has
// no `schema_id` and no `counts`, and reports coverage through
// `mapping.mapped_columns` / `mapping.unmapped_columns`. Both are still
// accepted; a table summary that sends `counts` without a `schema_id` is read
// as tagged.

#[derive(Debug, Clone, PartialEq)]
pub enum CoverageSummary {
    Tagged(TaggedSummary),
    LegacyTable(LegacyTableSummary),
}

impl CoverageSummary {
    fn lift(default_scope: SummaryScope, v: &Value) -> Self {
        let schema_id = v.text("schema_id");
        if schema_id.is_none() && v.child("counts").is_none() && default_scope == SummaryScope::Table
        {
            return CoverageSummary::LegacyTable(LegacyTableSummary::lift(v));
        }
        CoverageSummary::Tagged(TaggedSummary::lift(schema_id, default_scope, v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSummary {
    pub schema_id: Option<String>,
    /// Scope as reported; falls back to the scope implied by the event type
    pub scope: SummaryScope,
    /// Reported scope string when it is not one we know
    pub scope_label: Option<String>,
    pub file_name: Option<String>,
    pub sheet_name: Option<String>,
    pub table_index: Option<u64>,
    pub rows_total: Option<u64>,
    pub columns: Option<ColumnCounts>,
    pub fields: Option<FieldCounts>,
    pub field_entries: Vec<FieldEntry>,
    pub column_entries: Vec<ColumnEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnCounts {
    pub physical_total: Option<u64>,
    pub mapped: Option<u64>,
    pub unmapped: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldCounts {
    pub total: Option<u64>,
    pub required: Option<u64>,
    pub mapped: Option<u64>,
    pub required_unmapped: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldEntry {
    pub field: String,
    pub required: bool,
    pub mapped: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnEntry {
    pub header: Option<String>,
    pub column_index: Option<u64>,
    pub mapped: bool,
}

impl TaggedSummary {
    fn lift(schema_id: Option<String>, default_scope: SummaryScope, v: &Value) -> Self {
        let reported_scope = v.text("scope");
        let scope = reported_scope
            .as_deref()
            .and_then(SummaryScope::parse)
            .unwrap_or(default_scope);
        let scope_label = reported_scope.filter(|s| SummaryScope::parse(s).is_none());

        let source = v.child("source");
        let source_text = |key: &str| source.and_then(|s| s.text(key)).or_else(|| v.text(key));

        let counts = v.child("counts");
        let columns = counts.and_then(|c| c.child("columns")).map(|c| ColumnCounts {
            physical_total: c.count("physical_total").or_else(|| c.count("total")),
            mapped: c.count("mapped"),
            unmapped: c.count("unmapped"),
        });
        let fields = counts.and_then(|c| c.child("fields")).map(|c| FieldCounts {
            total: c.count("total"),
            required: c.count("required"),
            mapped: c.count("mapped"),
            required_unmapped: c.count("required_unmapped"),
        });
        let rows_total = counts
            .and_then(|c| c.child("rows"))
            .and_then(|r| r.count("total"));

        let field_entries = v
            .list("fields")
            .iter()
            .filter_map(|f| {
                let field = f.text("field").or_else(|| f.text("name"))?;
                Some(FieldEntry {
                    field,
                    required: f.flag("required").unwrap_or(false),
                    mapped: f.flag("mapped").unwrap_or(false),
                })
            })
            .collect();

        let column_entries = v
            .list("columns")
            .iter()
            .filter(|c| c.is_object())
            .map(|c| ColumnEntry {
                header: c.text("header"),
                column_index: c.count("column_index").or_else(|| c.count("index")),
                mapped: c
                    .flag("mapped")
                    .unwrap_or_else(|| c.text("field").is_some()),
            })
            .collect();

        Self {
            schema_id,
            scope,
            scope_label,
            file_name: source_text("file_name"),
            sheet_name: source_text("sheet_name"),
            table_index: source
                .and_then(|s| s.count("table_index"))
                .or_else(|| v.count("table_index")),
            rows_total,
            columns,
            fields,
            field_entries,
            column_entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyTableSummary {
    pub source_file: Option<String>,
    pub source_sheet: Option<String>,
    pub table_index: Option<u64>,
    pub row_count: Option<u64>,
    pub mapped_columns: Vec<MappedColumn>,
    pub unmapped_headers: Vec<String>,
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedColumn {
    pub field: String,
    pub header: Option<String>,
    pub score: Option<f64>,
}

impl LegacyTableSummary {
    fn lift(v: &Value) -> Self {
        let mapping = v.child("mapping");
        let mapping_list = |key: &str| mapping.map(|m| m.list(key)).unwrap_or_default();

        let mapped_columns = mapping_list("mapped_columns")
            .iter()
            .filter_map(|c| {
                Some(MappedColumn {
                    field: c.text("field")?,
                    header: c.text("header"),
                    score: c.number("score"),
                })
            })
            .collect();

        let unmapped_headers = mapping_list("unmapped_columns")
            .iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other
                    .text("header")
                    .or_else(|| other.count("column_index").map(|i| format!("col {}", i)))
                    .unwrap_or_else(|| "(blank)".to_string()),
            })
            .collect();

        let required_fields = v
            .list("required_fields")
            .iter()
            .filter_map(|f| f.as_str().map(str::to_string))
            .collect();

        Self {
            source_file: v.text("source_file"),
            source_sheet: v.text("source_sheet"),
            table_index: v.count("table_index"),
            row_count: v.count("row_count"),
            mapped_columns,
            unmapped_headers,
            required_fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectorCandidate {
    pub header: Option<String>,
    pub column_index: Option<u64>,
    pub score: Option<f64>,
    pub passed_threshold: Option<bool>,
}

impl DetectorCandidate {
    fn lift(v: &Value) -> Self {
        Self {
            header: v.text("header"),
            column_index: v.count("column_index"),
            score: v.number("score"),
            passed_threshold: v.flag("passed_threshold"),
        }
    }

    /// Explicit verdict wins; otherwise `score >= threshold`.
    pub fn passes(&self, threshold: Option<f64>) -> bool {
        if let Some(passed) = self.passed_threshold {
            return passed;
        }
        match (self.score, threshold) {
            (Some(score), Some(threshold)) => score >= threshold,
            _ => false,
        }
    }

    pub fn is_same_column(&self, other: &DetectorCandidate) -> bool {
        match (self.column_index, other.column_index) {
            (Some(a), Some(b)) => a == b,
            _ => self.header.is_some() && self.header == other.header,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDetector {
    pub field: Option<String>,
    pub threshold: Option<f64>,
    pub chosen: Option<DetectorCandidate>,
    pub candidates: Vec<DetectorCandidate>,
}

impl ColumnDetector {
    fn lift(v: &Value) -> Self {
        Self {
            field: v.text("field"),
            threshold: v.number("threshold"),
            chosen: v.child("chosen").map(DetectorCandidate::lift),
            candidates: v
                .list("candidates")
                .iter()
                .filter(|c| c.is_object())
                .map(DetectorCandidate::lift)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDetector {
    pub sheet_name: Option<String>,
    pub header_row_index: Option<u64>,
    pub header_score: Option<f64>,
    pub header_threshold: Option<f64>,
    pub data_row_start: Option<u64>,
    pub data_score: Option<f64>,
    pub data_threshold: Option<f64>,
}

impl RowDetector {
    fn lift(v: &Value) -> Self {
        let thresholds = v.child("thresholds");
        Self {
            sheet_name: v.text("sheet_name"),
            header_row_index: v.count("header_row_index"),
            header_score: v.number("header_score"),
            header_threshold: thresholds
                .and_then(|t| t.number("header"))
                .or_else(|| v.number("header_threshold")),
            data_row_start: v.count("data_row_start"),
            data_score: v.number("data_score"),
            data_threshold: thresholds
                .and_then(|t| t.number("data"))
                .or_else(|| v.number("data_threshold")),
        }
    }
}

/// Validation summary fields as supplied by one event; `None` means "not sent".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationPatch {
    pub issues: Option<Vec<ValidationIssue>>,
    pub issues_total: Option<u64>,
    pub max_severity: Option<Severity>,
    pub content_digest: Option<String>,
    pub error: Option<String>,
}

impl ValidationPatch {
    fn lift(v: &Value) -> Self {
        let issues = match v.field("issues") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter(|i| i.is_object())
                    .map(lift_issue)
                    .collect(),
            ),
            _ => None,
        };

        Self {
            issues,
            issues_total: v.count("issues_total"),
            max_severity: v.text("max_severity").map(|s| Severity::parse_lenient(&s)),
            content_digest: v.text("content_digest"),
            error: v.text("error"),
        }
    }
}

fn lift_issue(v: &Value) -> ValidationIssue {
    ValidationIssue {
        level: v
            .text("level")
            .or_else(|| v.text("severity"))
            .map(|s| Severity::parse_lenient(&s))
            .unwrap_or(Severity::Info),
        message: v.text("message").unwrap_or_default(),
        path: v.text("path"),
        code: v.text("code"),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLoaded {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl ConfigLoaded {
    fn lift(v: &Value) -> Self {
        Self {
            name: v.text("name").or_else(|| v.text("config_id")),
            version: v.text("version"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunError {
    pub message: Option<String>,
    pub code: Option<String>,
}

impl RunError {
    fn lift(v: &Value) -> Self {
        Self {
            message: v.text("message").or_else(|| v.text("error")),
            code: v.text("code"),
        }
    }
}
