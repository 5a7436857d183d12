use runstream_normalize::{ColumnDetector, DetectorCandidate, RowDetector};
use runstream_types::LineLevel;

const MAX_RUNNER_UPS: usize = 3;

fn score(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

fn mark(passed: bool) -> &'static str {
    if passed { "✓" } else { "✗" }
}

fn column_label(c: &DetectorCandidate) -> String {
    match (&c.header, c.column_index) {
        (Some(header), Some(index)) => format!("\"{}\" (col {})", header, index),
        (Some(header), None) => format!("\"{}\"", header),
        (None, Some(index)) => format!("col {}", index),
        (None, None) => "unnamed column".to_string(),
    }
}

pub fn column_detector(p: &ColumnDetector) -> (LineLevel, String) {
    let field = p.field.as_deref().unwrap_or("unknown field");
    let threshold = p
        .threshold
        .map(|t| format!(" (threshold {:.2})", t))
        .unwrap_or_default();

    let Some(chosen) = &p.chosen else {
        return (
            LineLevel::Warning,
            format!("Column detector {}: no candidate chosen{}", field, threshold),
        );
    };

    let passed = chosen.passes(p.threshold);
    let mut lines = vec![format!(
        "Column detector {}: {} score {}{} {}",
        field,
        column_label(chosen),
        score(chosen.score),
        threshold,
        mark(passed)
    )];

    lines.extend(
        p.candidates
            .iter()
            .filter(|c| !c.is_same_column(chosen))
            .take(MAX_RUNNER_UPS)
            .map(|c| {
                format!(
                    "  runner-up {} score {} {}",
                    column_label(c),
                    score(c.score),
                    mark(c.passes(p.threshold))
                )
            }),
    );

    let level = if passed {
        LineLevel::Success
    } else {
        LineLevel::Warning
    };
    (level, lines.join("\n"))
}

fn below(score: Option<f64>, threshold: Option<f64>) -> bool {
    matches!((score, threshold), (Some(s), Some(t)) if s < t)
}

fn scored_part(label: String, value: Option<f64>, threshold: Option<f64>) -> String {
    let mut part = format!("{} score {}", label, score(value));
    if let Some(t) = threshold {
        part.push_str(&format!(" (threshold {:.2})", t));
    }
    if below(value, threshold) {
        part.push_str(" below threshold");
    }
    part
}

pub fn row_detector(p: &RowDetector) -> (LineLevel, String) {
    let title = match &p.sheet_name {
        Some(sheet) => format!("Row detector {}", sheet),
        None => "Row detector".to_string(),
    };

    let header_label = match p.header_row_index {
        Some(row) => format!("header row {}", row),
        None => "header row".to_string(),
    };
    let data_label = match p.data_row_start {
        Some(row) => format!("data from row {}", row),
        None => "data rows".to_string(),
    };

    let message = format!(
        "{}: {}; {}",
        title,
        scored_part(header_label, p.header_score, p.header_threshold),
        scored_part(data_label, p.data_score, p.data_threshold)
    );

    let level = if below(p.header_score, p.header_threshold) || below(p.data_score, p.data_threshold)
    {
        LineLevel::Warning
    } else {
        LineLevel::Info
    };
    (level, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(header: &str, index: u64, score: f64, passed: Option<bool>) -> DetectorCandidate {
        DetectorCandidate {
            header: Some(header.to_string()),
            column_index: Some(index),
            score: Some(score),
            passed_threshold: passed,
        }
    }

    #[test]
    fn test_column_detector_pass() {
        let p = ColumnDetector {
            field: Some("sku".to_string()),
            threshold: Some(0.5),
            chosen: Some(candidate("SKU", 0, 0.9, Some(true))),
            candidates: vec![],
        };
        let (level, message) = column_detector(&p);
        assert_eq!(level, LineLevel::Success);
        assert!(message.contains("0.90"));
    }

    #[test]
    fn test_column_detector_runner_ups_capped_at_three() {
        let p = ColumnDetector {
            field: Some("qty".to_string()),
            threshold: Some(0.6),
            chosen: Some(candidate("Qty", 2, 0.55, None)),
            candidates: vec![
                candidate("Qty", 2, 0.55, None),
                candidate("Amount", 3, 0.7, None),
                candidate("Count", 4, 0.4, None),
                candidate("Units", 5, 0.3, None),
                candidate("Other", 6, 0.1, None),
            ],
        };
        let (level, message) = column_detector(&p);
        assert_eq!(level, LineLevel::Warning);
        insta::assert_snapshot!(message, @r#"
        Column detector qty: "Qty" (col 2) score 0.55 (threshold 0.60) ✗
          runner-up "Amount" (col 3) score 0.70 ✓
          runner-up "Count" (col 4) score 0.40 ✗
          runner-up "Units" (col 5) score 0.30 ✗
        "#);
    }

    #[test]
    fn test_column_detector_without_choice() {
        let (level, message) = column_detector(&ColumnDetector::default());
        assert_eq!(level, LineLevel::Warning);
        assert_eq!(message, "Column detector unknown field: no candidate chosen");
    }

    #[test]
    fn test_row_detector_levels() {
        let ok = RowDetector {
            sheet_name: Some("Sheet1".to_string()),
            header_row_index: Some(1),
            header_score: Some(0.8),
            header_threshold: Some(0.6),
            data_row_start: Some(2),
            data_score: Some(0.7),
            data_threshold: Some(0.5),
        };
        let (level, message) = row_detector(&ok);
        assert_eq!(level, LineLevel::Info);
        assert_eq!(
            message,
            "Row detector Sheet1: header row 1 score 0.80 (threshold 0.60); data from row 2 score 0.70 (threshold 0.50)"
        );

        let weak_data = RowDetector {
            data_score: Some(0.2),
            ..ok
        };
        let (level, message) = row_detector(&weak_data);
        assert_eq!(level, LineLevel::Warning);
        assert!(message.ends_with("score 0.20 (threshold 0.50) below threshold"));
    }
}
