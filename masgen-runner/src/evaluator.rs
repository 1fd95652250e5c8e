//! Dataset-sweep evaluation of a generated workflow unit.

use crate::loader::{instantiate, LoadError};
use futures_util::stream::{self, StreamExt};
use masgen_bench::{Benchmark, EvalSummary, EvaluationResult};
use masgen_core::{LanguageModel, Workflow};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during an evaluation run.
///
/// Load failures are structural: they carry the sample identity and abort
/// only that sample, never a whole batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// The sample's workflow source could not be read
    #[error("Failed to read workflow source for {dataset}/sample_{sample_id}: {source}")]
    Read {
        dataset: String,
        sample_id: usize,
        source: std::io::Error,
    },

    /// The workflow source is structurally invalid
    #[error("Failed to load workflow for {dataset}/sample_{sample_id}: {source}")]
    Load {
        dataset: String,
        sample_id: usize,
        source: LoadError,
    },

    /// The result table could not be written
    #[error("Failed to write result table: {0}")]
    WriteResults(#[from] std::io::Error),
}

/// Configuration for the evaluator.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EvalConfig {
    /// Maximum number of records evaluated concurrently (default: 5).
    ///
    /// Results keep dataset order regardless; the mean is order-independent.
    pub concurrency: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { concurrency: 5 }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Evaluates workflow units against benchmark datasets.
///
/// # Example
///
/// ```no_run
/// use masgen_runner::{EvalConfig, Evaluator};
/// use masgen_bench::Gsm8kBenchmark;
/// use masgen_core::{HttpLlm, LlmConfig};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let benchmark = Gsm8kBenchmark::load(
///     Path::new("data"),
///     Path::new("logs"),
///     masgen_bench::Split::Validate,
/// )
/// .await?;
/// let exec_llm = Arc::new(HttpLlm::new("api-key", LlmConfig::default()));
///
/// let evaluator = Evaluator::new(EvalConfig::default());
/// let summary = evaluator
///     .evaluate(
///         &benchmark,
///         Path::new("results/gsm8k/sample_0/workflow.mas"),
///         0,
///         exec_llm,
///         Path::new("logs"),
///     )
///     .await?;
/// println!("mean score: {:.4}", summary.mean_score);
/// # Ok(())
/// # }
/// ```
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Load a sample's workflow source, run it over every record of the
    /// benchmark, persist the result table under `log_path`, and return the
    /// summary.
    ///
    /// A structural load failure is logged with the sample identity and
    /// re-raised; per-record failures are contained by the benchmark and
    /// appear only as zero-score rows.
    pub async fn evaluate(
        &self,
        benchmark: &dyn Benchmark,
        workflow_path: &Path,
        sample_id: usize,
        exec_llm: Arc<dyn LanguageModel>,
        log_path: &Path,
    ) -> Result<EvalSummary, EvalError> {
        let source =
            tokio::fs::read_to_string(workflow_path)
                .await
                .map_err(|e| EvalError::Read {
                    dataset: benchmark.name().to_string(),
                    sample_id,
                    source: e,
                })?;

        let workflow =
            instantiate(&source, benchmark.name(), exec_llm).map_err(|e| {
                log::error!(
                    "Structural load failure for {}/sample_{}: {}",
                    benchmark.name(),
                    sample_id,
                    e
                );
                EvalError::Load {
                    dataset: benchmark.name().to_string(),
                    sample_id,
                    source: e,
                }
            })?;

        let summary = self.sweep(benchmark, &workflow).await;

        tokio::fs::create_dir_all(log_path).await?;
        let table_path = log_path.join(format!(
            "{}_sample_{}_results.json",
            benchmark.name(),
            sample_id
        ));
        summary.write_json(&table_path)?;
        log::info!(
            "Evaluated {}/sample_{}: mean score {:.4} over {} records",
            benchmark.name(),
            sample_id,
            summary.mean_score,
            summary.total
        );

        Ok(summary)
    }

    /// Run a workflow over every record of the benchmark, in dataset order.
    pub async fn sweep(&self, benchmark: &dyn Benchmark, workflow: &dyn Workflow) -> EvalSummary {
        let results: Vec<EvaluationResult> = stream::iter(benchmark.records())
            .map(|record| benchmark.evaluate_record(record, workflow))
            .buffered(self.config.concurrency)
            .collect()
            .await;

        EvalSummary::from_results(benchmark.name(), benchmark.result_columns(), results)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_config_default() {
        assert_eq!(EvalConfig::default().concurrency, 5);
    }

    #[test]
    fn test_eval_config_min_concurrency() {
        assert_eq!(EvalConfig::new().with_concurrency(0).concurrency, 1);
    }
}
