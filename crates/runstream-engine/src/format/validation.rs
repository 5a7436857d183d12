use runstream_normalize::ValidationPatch;
use runstream_types::{LineLevel, Severity, ValidationIssue};

pub fn issue(p: &ValidationIssue) -> (LineLevel, String) {
    let level = match p.level {
        Severity::Error => LineLevel::Error,
        Severity::Warning => LineLevel::Warning,
        Severity::Info => LineLevel::Info,
    };

    let mut message = format!("Validation {}", p.level.as_str());
    if let Some(code) = &p.code {
        message.push_str(&format!(" {}", code));
    }
    if let Some(path) = &p.path {
        message.push_str(&format!(" at {}", path));
    }
    let text = if p.message.is_empty() {
        "(no message)"
    } else {
        p.message.as_str()
    };
    message.push_str(&format!(": {}", text));

    (level, message)
}

pub fn summary(p: &ValidationPatch) -> (LineLevel, String) {
    let total = p
        .issues_total
        .or_else(|| p.issues.as_ref().map(|i| i.len() as u64))
        .unwrap_or(0);

    let level = match p.max_severity {
        Some(Severity::Error) => LineLevel::Error,
        Some(Severity::Warning) => LineLevel::Warning,
        _ if total > 0 => LineLevel::Warning,
        _ => LineLevel::Info,
    };

    let noun = if total == 1 { "issue" } else { "issues" };
    let mut lines = vec![match p.max_severity {
        Some(max) => format!(
            "Validation summary: {} {} (max severity {})",
            total,
            noun,
            max.as_str()
        ),
        None => format!("Validation summary: {} {}", total, noun),
    }];
    if let Some(error) = &p.error {
        lines.push(format!("Validation failed: {}", error));
    }
    if let Some(digest) = &p.content_digest {
        lines.push(format!("Content digest: {}", digest));
    }

    (level, lines.join("\n"))
}
