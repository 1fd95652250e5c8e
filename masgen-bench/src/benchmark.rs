//! Benchmark datasets and per-record evaluation.
//!
//! A benchmark owns its loaded records, knows how to assemble each record
//! into a natural-language input, drives the workflow through the
//! [`RetryingInvoker`], scores the output with its scoring strategy, and
//! logs low-scoring mismatches. A retry-exhausted invocation becomes a
//! zero-score result; it never aborts the dataset run.

use crate::mismatch::{MismatchEntry, MismatchLog};
use crate::record::{load_split, BenchmarkError, Record, Split};
use crate::results::EvaluationResult;
use crate::retry::RetryingInvoker;
use crate::scorer::{format_number, NumericTolerance, Scorer, TokenOverlapF1};
use async_trait::async_trait;
use masgen_core::Workflow;
use serde_json::Value;
use std::path::Path;

/// Mismatch threshold for F1-scored benchmarks. An F1 score is graded, so
/// "wrong" cannot be judged as 0-vs-1; anything under this bound is logged.
const F1_MISMATCH_THRESHOLD: f64 = 0.3;

/// A labeled benchmark dataset with its evaluation policy.
#[async_trait]
pub trait Benchmark: Send + Sync {
    /// Dataset name (`gsm8k`, `hotpotqa`, `drop`).
    fn name(&self) -> &str;

    /// The loaded records, in dataset order.
    fn records(&self) -> &[Record];

    /// Declared result-table column schema.
    fn result_columns(&self) -> Vec<String>;

    /// Fixed task description plus three sample records rendered as text,
    /// used as model context. Deterministic given the loaded data.
    fn description(&self) -> String;

    /// Evaluate one record by invoking the workflow and scoring its output.
    async fn evaluate_record(
        &self,
        record: &Record,
        workflow: &dyn Workflow,
    ) -> EvaluationResult;
}

/// Construct a benchmark by name with its split loaded from `data_dir`.
pub async fn create_benchmark(
    name: &str,
    data_dir: &Path,
    log_dir: &Path,
    split: Split,
) -> Result<Box<dyn Benchmark>, BenchmarkError> {
    match name.to_lowercase().as_str() {
        "gsm8k" => Ok(Box::new(Gsm8kBenchmark::load(data_dir, log_dir, split).await?)),
        "hotpotqa" => Ok(Box::new(
            HotpotQaBenchmark::load(data_dir, log_dir, split).await?,
        )),
        "drop" => Ok(Box::new(DropBenchmark::load(data_dir, log_dir, split).await?)),
        other => Err(BenchmarkError::UnknownBenchmark(other.to_string())),
    }
}

const GSM8K_DESCRIPTION: &str = "\
Task: Solve grade school level math word problems with multi-step arithmetic reasoning.
Input: A math problem described as a word problem in natural language, involving quantities and conditions.
Output: A final numeric answer derived through reasoning across the problem text.
The benchmark checks the ability to extract facts, reason logically, and perform calculations.";

/// Grade-school math word problems with numeric answers.
pub struct Gsm8kBenchmark {
    records: Vec<Record>,
    retry: RetryingInvoker,
    mismatch: MismatchLog,
}

impl Gsm8kBenchmark {
    const NAME: &'static str = "gsm8k";

    /// Load the given split from `data_dir`, logging mismatches under
    /// `log_dir`.
    pub async fn load(
        data_dir: &Path,
        log_dir: &Path,
        split: Split,
    ) -> Result<Self, BenchmarkError> {
        let records = load_split(data_dir, Self::NAME, split).await?;
        Ok(Self::from_records(records, log_dir))
    }

    /// Build directly from records (tests, synthetic data).
    pub fn from_records(records: Vec<Record>, log_dir: &Path) -> Self {
        Self {
            records,
            retry: RetryingInvoker::default(),
            mismatch: MismatchLog::new(log_dir, Self::NAME),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryingInvoker) -> Self {
        self.retry = retry;
        self
    }

    /// Expected answer rendered as the extracted number, falling back to the
    /// raw text when nothing is extractable.
    fn expected_answer(record: &Record) -> String {
        let raw = record.text_or_empty("answer");
        NumericTolerance::extract_number(raw)
            .map(format_number)
            .unwrap_or_else(|| raw.to_string())
    }
}

#[async_trait]
impl Benchmark for Gsm8kBenchmark {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn result_columns(&self) -> Vec<String> {
        ["task", "output", "expected_output", "score", "execution_logs"]
            .map(String::from)
            .to_vec()
    }

    fn description(&self) -> String {
        let samples = self.records.iter().take(3).map(|record| {
            format!(
                "Question: {}. Possible Answer: {}",
                record.text_or_empty("question"),
                record.text_or_empty("answer")
            )
        });
        join_description(GSM8K_DESCRIPTION, samples)
    }

    async fn evaluate_record(
        &self,
        record: &Record,
        workflow: &dyn Workflow,
    ) -> EvaluationResult {
        let input = record.text_or_empty("question").to_string();
        let raw_expected = record.text_or_empty("answer");
        let expected = Self::expected_answer(record);

        match self.retry.invoke(|| workflow.call(&input)).await {
            Ok((output, logs)) => {
                let (score, extracted) = NumericTolerance.score(raw_expected, &output);
                if score == 0.0 {
                    self.mismatch.append(&MismatchEntry {
                        input: input.clone(),
                        expected: expected.clone(),
                        output: output.clone(),
                        extracted_output: extracted,
                    });
                }
                EvaluationResult {
                    input,
                    context: None,
                    output,
                    expected,
                    score,
                    execution_log: logs,
                }
            }
            Err(e) => {
                log::info!("Maximum retries reached. Skipping this record. Error: {}", e);
                EvaluationResult::from_error(input, None, expected, &e)
            }
        }
    }
}

const HOTPOTQA_DESCRIPTION: &str = "\
Task: Multi-hop question answering requiring reasoning over multiple paragraphs to answer a complex question.
Input: A natural language question and a set of supporting paragraphs (typically from Wikipedia).
Output: A text answer which can be a span from the paragraphs or a yes/no response.
Relevant facts must be aggregated across documents with multi-step inference to produce the answer.";

/// Multi-hop question answering over supporting paragraphs.
pub struct HotpotQaBenchmark {
    records: Vec<Record>,
    retry: RetryingInvoker,
    mismatch: MismatchLog,
}

impl HotpotQaBenchmark {
    const NAME: &'static str = "hotpotqa";

    pub async fn load(
        data_dir: &Path,
        log_dir: &Path,
        split: Split,
    ) -> Result<Self, BenchmarkError> {
        let records = load_split(data_dir, Self::NAME, split).await?;
        Ok(Self::from_records(records, log_dir))
    }

    pub fn from_records(records: Vec<Record>, log_dir: &Path) -> Self {
        Self {
            records,
            retry: RetryingInvoker::default(),
            mismatch: MismatchLog::new(log_dir, Self::NAME),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryingInvoker) -> Self {
        self.retry = retry;
        self
    }

    /// Join the record's supporting paragraphs into one context block.
    ///
    /// The `context` field is a list of `[title, [sentence, ...]]` pairs;
    /// entries whose second element is not a list are skipped.
    fn assemble_context(record: &Record) -> String {
        let Some(Value::Array(items)) = record.value("context") else {
            return String::new();
        };
        let mut paragraphs = Vec::new();
        for item in items {
            if let Some(sentences) = item.get(1).and_then(Value::as_array) {
                let paragraph: Vec<&str> =
                    sentences.iter().filter_map(Value::as_str).collect();
                paragraphs.push(paragraph.join(" "));
            }
        }
        paragraphs.join("\n")
    }
}

#[async_trait]
impl Benchmark for HotpotQaBenchmark {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn result_columns(&self) -> Vec<String> {
        [
            "question",
            "context",
            "prediction",
            "expected_output",
            "score",
            "execution_logs",
        ]
        .map(String::from)
        .to_vec()
    }

    fn description(&self) -> String {
        let samples = self.records.iter().take(3).map(|record| {
            format!(
                "Context: {}\n\nQuestion: {}\n\nSample Answer: {}",
                record
                    .value("context")
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                record.text_or_empty("question"),
                record.text_or_empty("answer")
            )
        });
        join_description(HOTPOTQA_DESCRIPTION, samples)
    }

    async fn evaluate_record(
        &self,
        record: &Record,
        workflow: &dyn Workflow,
    ) -> EvaluationResult {
        let question = record.text_or_empty("question").to_string();
        let expected = record.text_or_empty("answer").to_string();
        let context = Self::assemble_context(record);
        let input = format!(
            "Context: {}\n\nQuestion: {}\n\nAnswer:",
            context, question
        );

        match self.retry.invoke(|| workflow.call(&input)).await {
            Ok((output, logs)) => {
                let (score, normalized) = TokenOverlapF1.score(&expected, &output);
                if score < F1_MISMATCH_THRESHOLD {
                    self.mismatch.append(&MismatchEntry {
                        input: question.clone(),
                        expected: expected.clone(),
                        output: output.clone(),
                        extracted_output: normalized,
                    });
                }
                EvaluationResult {
                    input: question,
                    context: Some(context),
                    output,
                    expected,
                    score,
                    execution_log: logs,
                }
            }
            Err(e) => {
                log::info!("Maximum retries reached. Skipping this record. Error: {}", e);
                EvaluationResult::from_error(question, Some(context), expected, &e)
            }
        }
    }
}

const DROP_DESCRIPTION: &str = "\
Task: Discrete reasoning over paragraphs. Given a paragraph and a complex question, relevant \
information must be extracted and operations such as addition, subtraction, counting, sorting, \
or comparison executed to produce the correct answer. Understanding both the semantics of the \
paragraph and the logical structure of the question is required, often with event coreference \
resolution and numerical reasoning over multiple data points.";

/// Discrete reasoning over paragraphs, with multi-answer references.
pub struct DropBenchmark {
    records: Vec<Record>,
    retry: RetryingInvoker,
    mismatch: MismatchLog,
}

impl DropBenchmark {
    const NAME: &'static str = "drop";

    pub async fn load(
        data_dir: &Path,
        log_dir: &Path,
        split: Split,
    ) -> Result<Self, BenchmarkError> {
        let records = load_split(data_dir, Self::NAME, split).await?;
        Ok(Self::from_records(records, log_dir))
    }

    pub fn from_records(records: Vec<Record>, log_dir: &Path) -> Self {
        Self {
            records,
            retry: RetryingInvoker::default(),
            mismatch: MismatchLog::new(log_dir, Self::NAME),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryingInvoker) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Benchmark for DropBenchmark {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn result_columns(&self) -> Vec<String> {
        ["task", "output", "expected_output", "score", "execution_logs"]
            .map(String::from)
            .to_vec()
    }

    fn description(&self) -> String {
        let samples = self.records.iter().take(3).map(|record| {
            format!(
                "Question and context: {}. Possible Answer: {}",
                record.text_or_empty("context"),
                record.text_or_empty("ref_text")
            )
        });
        join_description(DROP_DESCRIPTION, samples)
    }

    async fn evaluate_record(
        &self,
        record: &Record,
        workflow: &dyn Workflow,
    ) -> EvaluationResult {
        let input = record.text_or_empty("context").to_string();
        let expected = record.text_or_empty("ref_text").to_string();

        match self.retry.invoke(|| workflow.call(&input)).await {
            Ok((output, logs)) => {
                // TokenOverlapF1 takes the max over `|`-separated reference
                // alternatives and output parts.
                let (score, normalized) = TokenOverlapF1.score(&expected, &output);
                if score < F1_MISMATCH_THRESHOLD {
                    self.mismatch.append(&MismatchEntry {
                        input: input.clone(),
                        expected: expected.clone(),
                        output: output.clone(),
                        extracted_output: normalized,
                    });
                }
                EvaluationResult {
                    input,
                    context: None,
                    output,
                    expected,
                    score,
                    execution_log: logs,
                }
            }
            Err(e) => {
                log::info!("Maximum retries reached. Skipping this record. Error: {}", e);
                EvaluationResult::from_error(input, None, expected, &e)
            }
        }
    }
}

fn join_description(general: &str, samples: impl Iterator<Item = String>) -> String {
    let mut parts = vec![general.to_string()];
    parts.extend(samples);
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_assemble_context_joins_paragraphs() {
        let record = Record::from_fields([(
            "context",
            json!([
                ["Title A", ["First sentence.", "Second sentence."]],
                ["Title B", ["Third sentence."]],
                ["Malformed", "not a list"]
            ]),
        )]);

        let context = HotpotQaBenchmark::assemble_context(&record);
        assert_eq!(
            context,
            "First sentence. Second sentence.\nThird sentence."
        );
    }

    #[test]
    fn test_assemble_context_missing_field() {
        let record = Record::from_fields([("question", json!("q"))]);
        assert_eq!(HotpotQaBenchmark::assemble_context(&record), "");
    }

    #[test]
    fn test_gsm8k_expected_answer_extraction() {
        let record = Record::from_fields([("answer", json!("16 - 3 - 4 = 9\n#### 18"))]);
        assert_eq!(Gsm8kBenchmark::expected_answer(&record), "18");

        let record = Record::from_fields([("answer", json!("no digits"))]);
        assert_eq!(Gsm8kBenchmark::expected_answer(&record), "no digits");
    }

    #[test]
    fn test_result_columns() {
        let dir = log_dir();
        let gsm8k = Gsm8kBenchmark::from_records(vec![], dir.path());
        assert_eq!(gsm8k.result_columns().len(), 5);
        assert_eq!(gsm8k.result_columns()[0], "task");

        let hotpot = HotpotQaBenchmark::from_records(vec![], dir.path());
        assert_eq!(hotpot.result_columns().len(), 6);
        assert!(hotpot.result_columns().contains(&"context".to_string()));
    }

    #[test]
    fn test_description_includes_three_samples() {
        let dir = log_dir();
        let records = (0..5)
            .map(|i| {
                Record::from_fields([
                    ("question", json!(format!("question {}", i))),
                    ("answer", json!(format!("{}", i))),
                ])
            })
            .collect();
        let benchmark = Gsm8kBenchmark::from_records(records, dir.path());

        let description = benchmark.description();
        assert!(description.contains("question 0"));
        assert!(description.contains("question 2"));
        assert!(!description.contains("question 3"));
    }

    #[tokio::test]
    async fn test_create_benchmark_unknown_name() {
        let dir = log_dir();
        let err = create_benchmark("mystery", dir.path(), dir.path(), Split::Validate)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, BenchmarkError::UnknownBenchmark(_)));
        assert!(err.to_string().contains("mystery"));
    }
}
