//! Shared, append-only record of received lines

use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered log of every complete line received by a server.
///
/// Cloning yields another handle to the same log. Entries are only ever
/// appended; every read and write goes through the same mutex.
#[derive(Debug, Clone, Default)]
pub struct LineLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LineLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, line: String) {
        self.lines.lock().push(line);
    }

    /// Number of lines recorded so far
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Check if no line has been recorded
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Check if any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }

    /// Check if any line equals `expected`
    pub fn contains_line(&self, expected: &str) -> bool {
        self.lines.lock().iter().any(|line| line == expected)
    }

    /// Copy of all lines in arrival order
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(lines: &[&str]) -> LineLog {
        let log = LineLog::new();
        for line in lines {
            log.push((*line).to_string());
        }
        log
    }

    #[test]
    fn test_substring_vs_exact() {
        let log = log_of(&["cool", "neat"]);

        assert!(log.contains("oo"));
        assert!(log.contains("neat"));
        assert!(!log.contains("incomplete"));

        assert!(log.contains_line("cool"));
        assert!(!log.contains_line("oo"));
    }

    #[test]
    fn test_empty_log() {
        let log = LineLog::new();

        assert!(log.is_empty());
        assert!(!log.contains("foo"));
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let log = log_of(&["a"]);
        let before = log.snapshot();

        log.push("b".to_string());

        assert_eq!(before, vec!["a"]);
        assert_eq!(log.snapshot(), vec!["a", "b"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = LineLog::new();
        let writer = log.clone();

        writer.push("shared".to_string());

        assert!(log.contains_line("shared"));
    }
}
