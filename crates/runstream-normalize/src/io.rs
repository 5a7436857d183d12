use runstream_types::Envelope;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::Result;

/// Read a recorded JSONL fixture: one envelope per line.
///
/// Blank lines are skipped. Lines that are not valid JSON become raw
/// envelopes holding the line text, so a corrupt record never hides the rest
/// of the recording.
pub fn read_envelopes(path: &Path) -> Result<Vec<Envelope>> {
    let content = fs::read_to_string(path)?;
    Ok(read_envelopes_from_str(&content))
}

pub fn read_envelopes_from_str(content: &str) -> Vec<Envelope> {
    content.lines().filter_map(parse_record).collect()
}

/// Parse a single record. Returns None for blank lines only.
pub fn parse_record(line: &str) -> Option<Envelope> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Envelope::from_json_str(trimmed) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::debug!(error = %err, "record is not JSON; keeping as raw text");
            Some(Envelope::from_value(Value::String(trimmed.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_read_envelopes_skips_blank_and_keeps_garbage() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{"type": "run.queued", "created_at": "2025-01-01T00:00:00Z"}}"#)?;
        writeln!(file)?;
        writeln!(file, "not json at all")?;
        writeln!(file, r#"{{"type": "run.started"}}"#)?;

        let envelopes = read_envelopes(file.path())?;
        assert_eq!(envelopes.len(), 3);
        assert_eq!(envelopes[0].event_type(), "run.queued");
        assert_eq!(envelopes[1].event_type(), "");
        assert_eq!(envelopes[1].raw(), &json!("not json at all"));
        assert_eq!(envelopes[2].event_type(), "run.started");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_envelopes(Path::new("/definitely/not/here.jsonl"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
