//! Evaluation results and summary types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of evaluating one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The natural-language input handed to the workflow
    pub input: String,

    /// Supporting context, for benchmarks that separate it from the question
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The workflow's output (or the stringified error on failure)
    pub output: String,

    /// Expected answer
    pub expected: String,

    /// Numeric score in [0.0, 1.0]
    pub score: f64,

    /// The workflow's execution log (or an error marker on failure)
    pub execution_log: String,
}

impl EvaluationResult {
    /// Result for a record whose workflow invocation exhausted its retries.
    pub fn from_error(
        input: String,
        context: Option<String>,
        expected: String,
        error: &dyn std::fmt::Display,
    ) -> Self {
        Self {
            input,
            context,
            output: error.to_string(),
            expected,
            score: 0.0,
            execution_log: format!("Error: {}", error),
        }
    }
}

/// Aggregate of one dataset-level evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    /// Benchmark name
    pub benchmark: String,

    /// Declared result-column schema for this benchmark
    pub columns: Vec<String>,

    /// Number of records evaluated
    pub total: usize,

    /// Mean score across all records (0.0 for an empty run)
    pub mean_score: f64,

    /// Per-record results, in dataset order
    pub results: Vec<EvaluationResult>,
}

impl EvalSummary {
    /// Build a summary from per-record results.
    pub fn from_results(
        benchmark: impl Into<String>,
        columns: Vec<String>,
        results: Vec<EvaluationResult>,
    ) -> Self {
        let total = results.len();
        let mean_score = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.score).sum::<f64>() / total as f64
        };
        Self {
            benchmark: benchmark.into(),
            columns,
            total,
            mean_score,
            results,
        }
    }

    /// Per-record scores, in dataset order.
    pub fn scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.score).collect()
    }

    /// Write the full result table as pretty JSON.
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Print a short summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("=== Evaluation Summary ===");
        println!("Benchmark: {}", self.benchmark);
        println!("Records: {}", self.total);
        println!("Mean score: {:.4}", self.mean_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64) -> EvaluationResult {
        EvaluationResult {
            input: "q".to_string(),
            context: None,
            output: "o".to_string(),
            expected: "e".to_string(),
            score,
            execution_log: "log".to_string(),
        }
    }

    #[test]
    fn test_mean_score() {
        let summary = EvalSummary::from_results(
            "gsm8k",
            vec!["task".to_string()],
            vec![result(1.0), result(0.0), result(1.0)],
        );
        assert_eq!(summary.total, 3);
        assert!((summary.mean_score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.scores(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_run_is_zero_not_nan() {
        let summary = EvalSummary::from_results("gsm8k", vec![], vec![]);
        assert_eq!(summary.mean_score, 0.0);
    }

    #[test]
    fn test_error_result_shape() {
        let result = EvaluationResult::from_error(
            "input".to_string(),
            None,
            "42".to_string(),
            &"connection reset",
        );
        assert_eq!(result.score, 0.0);
        assert_eq!(result.output, "connection reset");
        assert_eq!(result.execution_log, "Error: connection reset");
    }

    #[test]
    fn test_write_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let summary = EvalSummary::from_results(
            "drop",
            vec!["task".to_string(), "score".to_string()],
            vec![result(0.5)],
        );
        summary.write_json(&path).unwrap();

        let loaded: EvalSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.benchmark, "drop");
        assert_eq!(loaded.columns.len(), 2);
        assert_eq!(loaded.results.len(), 1);
    }

    #[test]
    fn test_context_omitted_when_absent() {
        let json = serde_json::to_string(&result(1.0)).unwrap();
        assert!(!json.contains("context"));
    }
}
