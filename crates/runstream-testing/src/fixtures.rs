//! Envelope builders and canned event sequences.
//!
//! Scenarios mirror what a real build + validation run emits, so engine and
//! CLI tests can share them.

use runstream_normalize::{CanonicalOp, all_aliases};
use runstream_types::Envelope;
use serde_json::{Value, json};

/// Base instant for fixture timestamps
pub const BASE_TIME: &str = "2025-06-01T12:00:00Z";

/// Epoch seconds of [`BASE_TIME`]
const BASE_EPOCH: i64 = 1_748_779_200;

/// Fluent builder for a single wire envelope.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event_type: String,
    created_at: Option<Value>,
    run_id: Option<String>,
    payload: Value,
}

impl EventBuilder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            created_at: Some(Value::String(BASE_TIME.to_string())),
            run_id: None,
            payload: Value::Null,
        }
    }

    /// Timestamp `seconds` after [`BASE_TIME`], sent as epoch seconds.
    pub fn after(mut self, seconds: i64) -> Self {
        self.created_at = Some(json!(BASE_EPOCH + seconds));
        self
    }

    pub fn at(mut self, created_at: Value) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.created_at = None;
        self
    }

    pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(self) -> Envelope {
        Envelope::with_run_id(self.event_type, self.created_at, self.run_id, self.payload)
    }

    /// Wire JSON, one line, as it would appear in a recorded stream
    pub fn to_json_line(self) -> String {
        self.build().raw().to_string()
    }
}

/// Shorthand for `EventBuilder::new(event_type).payload(payload).build()`
pub fn event(event_type: &str, payload: Value) -> Envelope {
    EventBuilder::new(event_type).payload(payload).build()
}

/// Serialize envelopes as JSON Lines.
pub fn to_jsonl(envelopes: &[Envelope]) -> String {
    let mut out = String::new();
    for envelope in envelopes {
        out.push_str(&envelope.raw().to_string());
        out.push('\n');
    }
    out
}

/// Aliases grouped by the operation they resolve to, in table order.
pub fn alias_groups() -> Vec<(CanonicalOp, Vec<&'static str>)> {
    let mut groups: Vec<(CanonicalOp, Vec<&'static str>)> = Vec::new();
    for (literal, op) in all_aliases() {
        match groups.iter_mut().find(|(existing, _)| existing == op) {
            Some((_, literals)) => literals.push(literal),
            None => groups.push((*op, vec![literal])),
        }
    }
    groups
}

/// A payload that exercises the interesting fields of `op`.
pub fn sample_payload(op: CanonicalOp) -> Value {
    match op {
        CanonicalOp::BuildCreated => json!({"build_id": "b-1", "reason": "config changed"}),
        CanonicalOp::BuildStarted => json!({"build_id": "b-1"}),
        CanonicalOp::BuildPhaseStarted | CanonicalOp::RunPhaseStarted => {
            json!({"phase": "install", "message": "resolving"})
        }
        CanonicalOp::BuildPhaseCompleted | CanonicalOp::RunPhaseCompleted => {
            json!({"phase": "install", "status": "succeeded", "duration_ms": 1250})
        }
        CanonicalOp::BuildCompleted => json!({"status": "failed", "exit_code": 2}),
        CanonicalOp::ConsoleLine => json!({"scope": "build", "stream": "stderr", "message": "pip: error"}),
        CanonicalOp::RunQueued => json!({"queue_position": 3}),
        CanonicalOp::RunWaitingForBuild => json!({"build_id": "b-1", "reason": "stale"}),
        CanonicalOp::RunStarted => json!({"mode": "validation", "engine_version": "1.4.0"}),
        CanonicalOp::TableSummary
        | CanonicalOp::SheetSummary
        | CanonicalOp::FileSummary
        | CanonicalOp::RunSummary => coverage_payload(1),
        CanonicalOp::ColumnDetectorScore => json!({
            "field": "sku",
            "threshold": 0.5,
            "chosen": {"header": "SKU", "column_index": 0, "score": 0.9, "passed_threshold": true},
            "candidates": [
                {"header": "SKU", "column_index": 0, "score": 0.9},
                {"header": "Item", "column_index": 3, "score": 0.4}
            ]
        }),
        CanonicalOp::RowDetectorScore => json!({
            "sheet_name": "Orders",
            "header_row_index": 1,
            "header_score": 0.8,
            "data_row_start": 2,
            "data_score": 0.3,
            "thresholds": {"header": 0.6, "data": 0.5}
        }),
        CanonicalOp::ValidationIssue => {
            json!({"level": "warning", "message": "qty is negative", "path": "rows[4].qty", "code": "range"})
        }
        CanonicalOp::ValidationSummary => {
            json!({"issues_total": 2, "max_severity": "warning", "content_digest": "sha256:ab12"})
        }
        CanonicalOp::ConfigLoaded => json!({"name": "orders", "version": "3"}),
        CanonicalOp::RunError => json!({"message": "worker crashed", "code": "E_WORKER"}),
        CanonicalOp::RunCompleted => json!({"status": "succeeded", "summary": "2 tables extracted"}),
    }
}

/// Schema-tagged coverage payload with `required_unmapped` required fields missing.
pub fn coverage_payload(required_unmapped: u64) -> Value {
    let mut fields = vec![json!({"field": "sku", "required": true, "mapped": true})];
    for i in 0..required_unmapped {
        fields.push(json!({"field": format!("required_{}", i), "required": true, "mapped": false}));
    }
    let required = 1 + required_unmapped;

    json!({
        "schema_id": "coverage.v1",
        "scope": "table",
        "source": {"file_name": "orders.xlsx", "sheet_name": "Orders", "table_index": 0},
        "counts": {
            "rows": {"total": 120},
            "columns": {"physical_total": 2, "mapped": 1, "unmapped": 1},
            "fields": {
                "total": required,
                "required": required,
                "mapped": 1,
                "required_unmapped": required_unmapped
            }
        },
        "fields": fields,
        "columns": [
            {"header": "SKU", "column_index": 0, "field": "sku"},
            {"header": "Notes", "column_index": 1}
        ]
    })
}

/// Build, validation run and completion, all succeeding.
pub fn successful_validation_run() -> Vec<Envelope> {
    let run = "run-ok";
    vec![
        EventBuilder::new("run.queued").after(0).run_id(run).payload(json!({"queue_position": 1})).build(),
        EventBuilder::new("build.started").after(1).run_id(run).build(),
        EventBuilder::new("build.phase.started").after(2).run_id(run).payload(json!({"phase": "install"})).build(),
        EventBuilder::new("console.line")
            .after(3)
            .run_id(run)
            .payload(json!({"scope": "build", "stream": "stdout", "message": "Collecting pandas"}))
            .build(),
        EventBuilder::new("build.phase.completed")
            .after(4)
            .run_id(run)
            .payload(json!({"phase": "install", "status": "succeeded", "duration_ms": 1800}))
            .build(),
        EventBuilder::new("build.completed").after(5).run_id(run).payload(json!({"status": "succeeded"})).build(),
        EventBuilder::new("run.started").after(6).run_id(run).payload(json!({"mode": "validation"})).build(),
        EventBuilder::new("run.validation.issue")
            .after(7)
            .run_id(run)
            .payload(json!({"level": "warning", "message": "qty is negative", "path": "rows[4].qty"}))
            .build(),
        EventBuilder::new("run.validation.summary")
            .after(8)
            .run_id(run)
            .payload(json!({
                "issues": [{"level": "warning", "message": "qty is negative", "path": "rows[4].qty"}],
                "issues_total": 1,
                "max_severity": "warning",
                "content_digest": "sha256:ab12"
            }))
            .build(),
        EventBuilder::new("run.completed")
            .after(9)
            .run_id(run)
            .payload(json!({"status": "succeeded", "summary": "Validation finished"}))
            .build(),
    ]
}

/// Extraction run whose table summary is missing a required field.
pub fn coverage_failure() -> Vec<Envelope> {
    vec![
        EventBuilder::new("run.started").after(0).payload(json!({"mode": "extraction"})).build(),
        EventBuilder::new("run.table.summary").after(1).payload(coverage_payload(1)).build(),
        EventBuilder::new("run.completed")
            .after(2)
            .payload(json!({"status": "failed", "error_message": "required fields missing"}))
            .build(),
    ]
}

/// Column detector choosing a candidate above threshold.
pub fn detector_pass() -> Vec<Envelope> {
    vec![
        EventBuilder::new("engine.detector.column.score")
            .payload(sample_payload(CanonicalOp::ColumnDetectorScore))
            .build(),
    ]
}

/// A run-namespaced type nobody knows about.
pub fn unknown_type() -> Vec<Envelope> {
    vec![EventBuilder::new("run.totally_unknown_event").payload(json!({"foo": 1})).build()]
}

/// Raw object for a non-envelope record, as some producers interleave them.
pub fn stray_record() -> Value {
    json!({"message": "not an envelope", "level": "info"})
}
