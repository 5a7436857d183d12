use owo_colors::OwoColorize;
use runstream_types::{DiagnosticLine, LineLevel};
use std::fmt;

/// Plain-text rendering of one console line.
///
/// Multi-line messages keep their continuation lines aligned under the first.
pub struct LineView<'a> {
    pub line: &'a DiagnosticLine,
    pub enable_color: bool,
}

impl LineView<'_> {
    fn tag(&self) -> String {
        let tag = format!("[{}]", self.line.origin.as_str());
        if !self.enable_color {
            return tag;
        }
        tag.dimmed().to_string()
    }

    fn paint(&self, text: &str) -> String {
        if !self.enable_color {
            return text.to_string();
        }
        match self.line.level {
            LineLevel::Error => text.red().to_string(),
            LineLevel::Warning => text.yellow().to_string(),
            LineLevel::Success => text.green().to_string(),
            LineLevel::Info => text.to_string(),
        }
    }
}

impl fmt::Display for LineView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = if self.line.timestamp.is_empty() {
            "--:--:--".to_string()
        } else {
            self.line.timestamp.clone()
        };
        let time = if self.enable_color {
            time.bright_black().to_string()
        } else {
            time
        };

        let mut parts = self.line.message.split('\n');
        let first = parts.next().unwrap_or_default();
        write!(
            f,
            "{} {:<7} {:<7} {}",
            time,
            self.tag(),
            self.line.level.as_str(),
            self.paint(first)
        )?;
        for rest in parts {
            write!(f, "\n{:25}{}", "", self.paint(rest))?;
        }
        Ok(())
    }
}
