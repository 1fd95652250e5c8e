//! Diagnostic log of low-scoring evaluations.
//!
//! Mismatch entries are appended as JSON lines for later inspection; they
//! never influence control flow, and a failed append is logged rather than
//! raised.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One below-threshold evaluation, with the raw and normalized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MismatchEntry {
    pub input: String,
    pub expected: String,
    pub output: String,
    /// Output after the scorer's normalization or extraction
    pub extracted_output: Option<String>,
}

/// Append-only JSON-lines mismatch log for one benchmark.
#[derive(Debug, Clone)]
pub struct MismatchLog {
    path: PathBuf,
}

impl MismatchLog {
    /// Create a log writing to `<log_dir>/<benchmark>_mismatches.jsonl`.
    pub fn new(log_dir: impl Into<PathBuf>, benchmark: &str) -> Self {
        Self {
            path: log_dir
                .into()
                .join(format!("{}_mismatches.jsonl", benchmark)),
        }
    }

    /// Where entries are written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Purely observational: failures are logged and
    /// swallowed so a full disk or missing directory cannot abort a run.
    pub fn append(&self, entry: &MismatchEntry) {
        if let Err(e) = self.try_append(entry) {
            log::warn!("Failed to append mismatch log entry: {}", e);
        }
    }

    fn try_append(&self, entry: &MismatchEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(input: &str) -> MismatchEntry {
        MismatchEntry {
            input: input.to_string(),
            expected: "expected".to_string(),
            output: "Raw Output!".to_string(),
            extracted_output: Some("raw output".to_string()),
        }
    }

    #[test]
    fn test_append_creates_file_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log = MismatchLog::new(dir.path().join("nested"), "gsm8k");

        log.append(&entry("q1"));
        log.append(&entry("q2"));

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: MismatchEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.input, "q1");
        assert_eq!(first.output, "Raw Output!");
        assert_eq!(first.extracted_output.as_deref(), Some("raw output"));
    }

    #[test]
    fn test_append_failure_does_not_panic() {
        // A path under a file (not a directory) cannot be created.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let log = MismatchLog::new(blocker.join("sub"), "gsm8k");
        log.append(&entry("q1")); // swallowed, logged
    }
}
