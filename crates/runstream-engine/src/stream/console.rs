use runstream_types::{DiagnosticLine, LineOrigin};
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Issues line ids that are unique for the lifetime of one stream.
///
/// An id is `{origin}-{event millis | "na"}-{sequence}-{salt}`. The sequence
/// never rewinds, even across resets, and the salt separates streams that
/// replay the same envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIds {
    salt: String,
    next_seq: u64,
}

impl LineIds {
    /// Deterministic ids, for tests and reproducible replays
    pub fn seeded(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            next_seq: 0,
        }
    }

    /// Random salt per stream
    pub fn random() -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        Self::seeded(&salt[..8])
    }

    pub fn next_id(&mut self, origin: LineOrigin, event_millis: Option<i64>) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = event_millis
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "na".to_string());
        format!("{}-{}-{}-{}", origin.as_str(), at, seq, self.salt)
    }
}

impl Default for LineIds {
    fn default() -> Self {
        Self::random()
    }
}

/// Fixed-capacity line buffer; the oldest line is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleBuffer {
    lines: VecDeque<DiagnosticLine>,
    capacity: usize,
}

impl ConsoleBuffer {
    /// Capacity is at least one line.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append, evicting from the front when full. Returns how many lines were evicted.
    pub fn push(&mut self, line: DiagnosticLine) -> usize {
        let mut evicted = 0;
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
            evicted += 1;
        }
        self.lines.push_back(line);
        evicted
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&DiagnosticLine> {
        self.lines.back()
    }

    pub(crate) fn drain_all(&mut self) -> Vec<DiagnosticLine> {
        self.lines.drain(..).collect()
    }
}

impl Serialize for ConsoleBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.lines.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runstream_types::LineLevel;

    fn line(message: &str) -> DiagnosticLine {
        DiagnosticLine::new(LineLevel::Info, LineOrigin::Run, message)
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut buffer = ConsoleBuffer::new(2);
        assert_eq!(buffer.push(line("a")), 0);
        assert_eq!(buffer.push(line("b")), 0);
        assert_eq!(buffer.push(line("c")), 1);

        let messages: Vec<_> = buffer.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let mut buffer = ConsoleBuffer::new(0);
        buffer.push(line("a"));
        buffer.push(line("b"));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.last().map(|l| l.message.as_str()), Some("b"));
    }

    #[test]
    fn test_line_ids_are_sequential_and_salted() {
        let mut ids = LineIds::seeded("t");
        assert_eq!(ids.next_id(LineOrigin::Build, Some(1000)), "build-1000-0-t");
        assert_eq!(ids.next_id(LineOrigin::Run, Some(1000)), "run-1000-1-t");
        assert_eq!(ids.next_id(LineOrigin::Raw, None), "raw-na-2-t");
    }

    #[test]
    fn test_random_salts_differ() {
        let mut a = LineIds::random();
        let mut b = LineIds::random();
        assert_ne!(
            a.next_id(LineOrigin::Run, Some(1)),
            b.next_id(LineOrigin::Run, Some(1))
        );
    }
}
