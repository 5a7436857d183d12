use runstream_normalize::{CoverageSummary, LegacyTableSummary, TaggedSummary};
use runstream_types::LineLevel;
use std::collections::HashSet;

// NOTE: Unmapped lists are never truncated. Operators use them to fix the
// config, and a partial list sends them looking in the wrong place.

pub fn coverage(summary: &CoverageSummary) -> (LineLevel, String) {
    match summary {
        CoverageSummary::Tagged(s) => tagged(s),
        CoverageSummary::LegacyTable(s) => legacy_table(s),
    }
}

fn source_line(title: &str, parts: &[Option<String>]) -> String {
    let parts: Vec<&str> = parts.iter().filter_map(|p| p.as_deref()).collect();
    if parts.is_empty() {
        title.to_string()
    } else {
        format!("{}: {}", title, parts.join(" / "))
    }
}

fn severity(required_missing: u64, anything_unmapped: bool) -> LineLevel {
    if required_missing > 0 {
        LineLevel::Error
    } else if anything_unmapped {
        LineLevel::Warning
    } else {
        LineLevel::Success
    }
}

fn tagged(s: &TaggedSummary) -> (LineLevel, String) {
    let title = match &s.scope_label {
        Some(label) => format!("{} summary", label),
        None => format!("{} summary", s.scope.label()),
    };
    let mut lines = vec![source_line(
        &title,
        &[
            s.file_name.clone(),
            s.sheet_name.clone(),
            s.table_index.map(|i| format!("table {}", i)),
        ],
    )];

    // Counts win; per-entry lists fill in whatever the counts omit
    let entries = &s.field_entries;
    let counts = s.fields.clone().unwrap_or_default();
    let has_field_data = s.fields.is_some() || !entries.is_empty();

    let fields_total = counts.total.unwrap_or(entries.len() as u64);
    let fields_mapped = counts
        .mapped
        .unwrap_or(entries.iter().filter(|f| f.mapped).count() as u64);
    let required = counts
        .required
        .unwrap_or(entries.iter().filter(|f| f.required).count() as u64);
    let required_missing = counts
        .required_unmapped
        .unwrap_or(entries.iter().filter(|f| f.required && !f.mapped).count() as u64);

    if has_field_data {
        lines.push(format!(
            "Fields mapped {}/{} (required missing {}/{})",
            fields_mapped, fields_total, required_missing, required
        ));
    }

    let column_entries = &s.column_entries;
    let mut columns_unmapped = 0;
    if let Some(columns) = &s.columns {
        let total = columns
            .physical_total
            .unwrap_or(column_entries.len() as u64);
        let mapped = columns
            .mapped
            .unwrap_or(column_entries.iter().filter(|c| c.mapped).count() as u64);
        columns_unmapped = columns.unmapped.unwrap_or(total.saturating_sub(mapped));
        lines.push(format!("Columns mapped {}/{}", mapped, total));
    } else if !column_entries.is_empty() {
        let mapped = column_entries.iter().filter(|c| c.mapped).count();
        columns_unmapped = (column_entries.len() - mapped) as u64;
        lines.push(format!("Columns mapped {}/{}", mapped, column_entries.len()));
    }

    if let Some(rows) = s.rows_total {
        lines.push(format!("Rows: {}", rows));
    }

    let unmapped_headers: Vec<String> = column_entries
        .iter()
        .filter(|c| !c.mapped)
        .map(|c| match (&c.header, c.column_index) {
            (Some(header), _) => header.clone(),
            (None, Some(index)) => format!("col {}", index),
            (None, None) => "(blank)".to_string(),
        })
        .collect();
    if !unmapped_headers.is_empty() {
        lines.push(format!("Unmapped headers: {}", unmapped_headers.join(", ")));
    }

    let unmapped_fields: Vec<String> = entries
        .iter()
        .filter(|f| !f.mapped)
        .map(|f| {
            if f.required {
                format!("{}*", f.field)
            } else {
                f.field.clone()
            }
        })
        .collect();
    if !unmapped_fields.is_empty() {
        lines.push(format!("Unmapped fields: {}", unmapped_fields.join(", ")));
    }

    let anything_unmapped = columns_unmapped > 0
        || fields_mapped < fields_total
        || !unmapped_headers.is_empty()
        || !unmapped_fields.is_empty();

    (severity(required_missing, anything_unmapped), lines.join("\n"))
}

/// Percentage rounded to one decimal place
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let value = part as f64 / whole as f64 * 100.0;
    (value * 10.0).round() / 10.0
}

fn legacy_table(s: &LegacyTableSummary) -> (LineLevel, String) {
    let mut lines = vec![source_line(
        "Table summary",
        &[
            s.source_file.clone(),
            s.source_sheet.clone(),
            s.table_index.map(|i| format!("table {}", i)),
        ],
    )];

    let mapped = s.mapped_columns.len();
    let total = mapped + s.unmapped_headers.len();
    lines.push(format!(
        "Columns mapped {}/{} ({}%)",
        mapped,
        total,
        percent(mapped, total)
    ));

    let mapped_fields: HashSet<&str> = s.mapped_columns.iter().map(|c| c.field.as_str()).collect();
    let missing: Vec<&str> = s
        .required_fields
        .iter()
        .map(String::as_str)
        .filter(|f| !mapped_fields.contains(f))
        .collect();

    if !s.required_fields.is_empty() {
        lines.push(format!(
            "Fields mapped {} (required missing {}/{})",
            mapped_fields.len(),
            missing.len(),
            s.required_fields.len()
        ));
    }
    if !missing.is_empty() {
        lines.push(format!("Missing required: {}", missing.join(", ")));
    }

    if let Some(rows) = s.row_count {
        lines.push(format!("Rows: {}", rows));
    }

    if !s.unmapped_headers.is_empty() {
        lines.push(format!("Unmapped headers: {}", s.unmapped_headers.join(", ")));
    }

    (
        severity(missing.len() as u64, !s.unmapped_headers.is_empty()),
        lines.join("\n"),
    )
}
