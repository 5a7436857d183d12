use serde::{Deserialize, Serialize};

/// Severity of a validation issue. Ordered so `max` gives the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Lenient parse: unknown spellings degrade to `Info`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "error" | "fatal" | "critical" => Severity::Error,
            "warning" | "warn" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ValidationIssue {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            path: None,
            code: None,
        }
    }
}

/// Validation issues for one run attempt plus scalar summary fields.
///
/// `issues_total` is authoritative and may exceed `issues.len()` when the
/// producer only sends a sample of the issues.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
    #[serde(default)]
    pub issues_total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationSummary {
    /// Record one more issue, escalating `max_severity` when needed.
    pub fn push_issue(&mut self, issue: ValidationIssue) {
        self.max_severity = Some(match self.max_severity {
            Some(current) => current.max(issue.level),
            None => issue.level,
        });
        self.issues_total += 1;
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        self.issues_total > 0 || !self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_issue_escalates_severity() {
        let mut summary = ValidationSummary::default();
        summary.push_issue(ValidationIssue::new(Severity::Warning, "a"));
        summary.push_issue(ValidationIssue::new(Severity::Info, "b"));
        assert_eq!(summary.max_severity, Some(Severity::Warning));

        summary.push_issue(ValidationIssue::new(Severity::Error, "c"));
        assert_eq!(summary.max_severity, Some(Severity::Error));
        assert_eq!(summary.issues_total, 3);
        assert_eq!(summary.issues.len(), 3);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Severity::parse_lenient("ERROR"), Severity::Error);
        assert_eq!(Severity::parse_lenient("warn"), Severity::Warning);
        assert_eq!(Severity::parse_lenient("notice"), Severity::Info);
    }

    #[test]
    fn test_has_issues_uses_authoritative_total() {
        let summary = ValidationSummary {
            issues_total: 12,
            ..Default::default()
        };
        assert!(summary.has_issues());
        assert!(!ValidationSummary::default().has_issues());
    }
}
