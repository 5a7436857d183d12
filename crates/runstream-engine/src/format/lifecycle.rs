use runstream_normalize::{
    BuildCreated, BuildStarted, Completion, ConfigLoaded, ConsoleLine, PhaseCompleted,
    PhaseStarted, RunError, RunQueued, RunStarted, WaitingForBuild,
};
use runstream_types::LineLevel;

use super::time::format_duration;

/// Which stream a lifecycle line talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Build,
    Run,
}

impl Kind {
    fn label(&self) -> &'static str {
        match self {
            Kind::Build => "Build",
            Kind::Run => "Run",
        }
    }
}

fn with_suffix(mut base: String, suffix: Option<String>) -> String {
    if let Some(suffix) = suffix {
        base.push_str(&suffix);
    }
    base
}

fn phase_label(kind: Kind, phase: Option<&str>) -> String {
    match phase {
        Some(phase) => format!("{} phase {}", kind.label(), phase),
        None => format!("{} phase", kind.label()),
    }
}

pub fn build_created(p: &BuildCreated) -> (LineLevel, String) {
    let base = match &p.build_id {
        Some(id) => format!("Build {} created", id),
        None => "Build created".to_string(),
    };
    (
        LineLevel::Info,
        with_suffix(base, p.reason.as_ref().map(|r| format!(" ({})", r))),
    )
}

pub fn build_started(p: &BuildStarted) -> (LineLevel, String) {
    let base = match &p.build_id {
        Some(id) => format!("Build {} started", id),
        None => "Build started".to_string(),
    };
    (
        LineLevel::Info,
        with_suffix(base, p.reason.as_ref().map(|r| format!(" ({})", r))),
    )
}

pub fn phase_started(kind: Kind, p: &PhaseStarted) -> (LineLevel, String) {
    let base = format!("{} started", phase_label(kind, p.phase.as_deref()));
    (
        LineLevel::Info,
        with_suffix(base, p.message.as_ref().map(|m| format!(": {}", m))),
    )
}

pub fn phase_completed(kind: Kind, p: &PhaseCompleted) -> (LineLevel, String) {
    let status = p.status.as_deref().unwrap_or("completed");
    let level = match status {
        "failed" => LineLevel::Error,
        "skipped" => LineLevel::Warning,
        _ => LineLevel::Success,
    };

    let mut message = format!("{} {}", phase_label(kind, p.phase.as_deref()), status);
    if let Some(ms) = p.duration_ms.filter(|ms| *ms >= 0.0) {
        message.push_str(&format!(" in {}", format_duration(ms)));
    }
    if let Some(note) = &p.message {
        message.push_str(&format!(": {}", note));
    }

    (level, message)
}

/// Terminal line for a build or run.
pub fn completion(kind: Kind, p: &Completion) -> (LineLevel, String) {
    let status = p.status.as_deref().unwrap_or("completed");
    let level = match status {
        "succeeded" | "reused" => LineLevel::Success,
        "cancelled" | "canceled" => LineLevel::Warning,
        "failed" => LineLevel::Error,
        _ => LineLevel::Info,
    };

    let explicit = if status == "failed" {
        p.error_message
            .clone()
            .or_else(|| p.failure_message.clone())
            .or_else(|| p.summary.clone())
    } else {
        p.summary.clone()
    };
    let mut message = explicit.unwrap_or_else(|| format!("{} {}.", kind.label(), status));

    if status == "failed"
        && let Some(code) = p.exit_code
    {
        message.push_str(&format!(" (exit code {})", code));
    }

    (level, message)
}

pub fn console_line(p: &ConsoleLine) -> (LineLevel, String) {
    let level = match p.level.as_deref() {
        Some("error") => LineLevel::Error,
        Some("warning") | Some("warn") => LineLevel::Warning,
        Some("success") => LineLevel::Success,
        _ if p.stream.as_deref() == Some("stderr") => LineLevel::Warning,
        _ => LineLevel::Info,
    };
    (level, p.message.clone())
}

pub fn run_queued(p: &RunQueued) -> (LineLevel, String) {
    let message = with_suffix(
        "Run queued".to_string(),
        p.queue_position.map(|n| format!(" (position {})", n)),
    );
    (LineLevel::Info, message)
}

pub fn waiting_for_build(p: &WaitingForBuild) -> (LineLevel, String) {
    let base = match &p.build_id {
        Some(id) => format!("Run waiting for build {}", id),
        None => "Run waiting for build".to_string(),
    };
    (
        LineLevel::Info,
        with_suffix(base, p.reason.as_ref().map(|r| format!(" ({})", r))),
    )
}

pub fn run_started(p: &RunStarted) -> (LineLevel, String) {
    let mut message = "Run started".to_string();
    if let Some(mode) = p.mode {
        message.push_str(&format!(" ({})", mode.as_str()));
    }
    if let Some(version) = &p.engine_version {
        message.push_str(&format!(", engine {}", version));
    }
    (LineLevel::Info, message)
}

pub fn config_loaded(p: &ConfigLoaded) -> (LineLevel, String) {
    let mut message = "Config loaded".to_string();
    if let Some(name) = &p.name {
        message.push_str(&format!(": {}", name));
    }
    if let Some(version) = &p.version {
        message.push_str(&format!(" ({})", version));
    }
    (LineLevel::Info, message)
}

pub fn run_error(p: &RunError) -> (LineLevel, String) {
    let mut message = format!(
        "Run error: {}",
        p.message.as_deref().unwrap_or("unknown error")
    );
    if let Some(code) = &p.code {
        message.push_str(&format!(" [{}]", code));
    }
    (LineLevel::Error, message)
}
