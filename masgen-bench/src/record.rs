//! Benchmark records and raw data loading.
//!
//! Each benchmark ships one newline-delimited-record file per split
//! (`<name>_validate.jsonl` / `<name>_test.jsonl`), every record a flat JSON
//! object with benchmark-specific fields. Records are loaded once at
//! benchmark construction and read-only thereafter.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors that can occur when loading benchmark data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchmarkError {
    /// Failed to read a data file
    #[error("Failed to read benchmark data: {0}")]
    Io(#[from] std::io::Error),

    /// A record line was not valid JSON (or not an object)
    #[error("Failed to parse record on line {line} of {file}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// No benchmark registered under the given name
    #[error("Unknown benchmark '{0}'")]
    UnknownBenchmark(String),
}

/// Which split of a benchmark to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Split {
    /// Validation split, used while generating samples
    #[default]
    Validate,
    /// Held-out test split
    Test,
}

impl Split {
    /// Suffix used in split file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Split::Validate => "validate",
            Split::Test => "test",
        }
    }
}

/// One benchmark problem.
///
/// Fields vary by benchmark (question/context/answer text, or a code task
/// plus reference tests); there is always a canonical expected-answer field.
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wrap a parsed JSON object. Returns `None` for non-object values.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Build a record from field pairs (test convenience).
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// String field accessor; `None` when absent or non-string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// String field accessor with an empty-string fallback.
    pub fn text_or_empty(&self, key: &str) -> &str {
        self.text(key).unwrap_or_default()
    }

    /// Raw field accessor.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Path of one split file: `<data_dir>/<name>_<split>.jsonl`.
pub fn split_path(data_dir: &Path, name: &str, split: Split) -> PathBuf {
    data_dir.join(format!("{}_{}.jsonl", name.to_lowercase(), split.suffix()))
}

/// Load every record of a benchmark split.
///
/// Blank lines are skipped; any malformed line fails the whole load, since a
/// silently dropped record would skew every score computed afterwards.
pub async fn load_split(
    data_dir: &Path,
    name: &str,
    split: Split,
) -> Result<Vec<Record>, BenchmarkError> {
    let path = split_path(data_dir, name, split);
    let content = fs::read_to_string(&path).await?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| BenchmarkError::Parse {
            file: path.display().to_string(),
            line: idx + 1,
            message: e.to_string(),
        })?;
        let record = Record::from_value(value).ok_or_else(|| BenchmarkError::Parse {
            file: path.display().to_string(),
            line: idx + 1,
            message: "record is not a JSON object".to_string(),
        })?;
        records.push(record);
    }

    log::debug!(
        "Loaded {} records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_split_path() {
        assert_eq!(
            split_path(Path::new("/data"), "GSM8K", Split::Validate),
            PathBuf::from("/data/gsm8k_validate.jsonl")
        );
        assert_eq!(
            split_path(Path::new("/data"), "drop", Split::Test),
            PathBuf::from("/data/drop_test.jsonl")
        );
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::from_fields([
            ("question", json!("What is 2+2?")),
            ("answer", json!("4")),
            ("level", json!(3)),
        ]);

        assert_eq!(record.text("question"), Some("What is 2+2?"));
        assert_eq!(record.text("level"), None); // not a string
        assert_eq!(record.text_or_empty("missing"), "");
        assert_eq!(record.value("level"), Some(&json!(3)));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("text")).is_none());
        assert!(Record::from_value(json!({"a": 1})).is_some());
    }

    #[tokio::test]
    async fn test_load_split_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy_validate.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"question": "q1", "answer": "a1"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"question": "q2", "answer": "a2"}}"#).unwrap();

        let records = load_split(dir.path(), "toy", Split::Validate).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("question"), Some("q2"));
    }

    #[tokio::test]
    async fn test_load_split_malformed_line_fails_with_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy_test.jsonl");
        std::fs::write(&path, "{\"ok\": true}\nnot json\n").unwrap();

        let err = load_split(dir.path(), "toy", Split::Test).await.unwrap_err();
        match err {
            BenchmarkError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_split_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_split(dir.path(), "absent", Split::Validate).await;
        assert!(matches!(result, Err(BenchmarkError::Io(_))));
    }
}
