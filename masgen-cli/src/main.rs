//! Command-line entry point for workflow sample generation.
//!
//! Generates `--sample` independent workflow samples for one benchmark,
//! evaluating each against the chosen split. One sample's fatal error is
//! logged and the batch continues; only configuration errors (unknown model
//! or dataset) abort before any pipeline work begins.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use masgen_bench::{create_benchmark, Benchmark, Split};
use masgen_core::{HttpLlm, ModelRegistry, Operator};
use masgen_pipeline::{ArtifactStore, DataGenerator, PipelineConfig, SampleKey};
use masgen_runner::{EvalConfig, Evaluator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Generate and evaluate multi-agent workflow samples for a benchmark.
#[derive(Parser, Debug)]
#[command(name = "masgen")]
#[command(about = "Generate multi-agent workflow samples and score them against benchmarks")]
#[command(version)]
struct Args {
    /// Dataset to target: gsm8k, hotpotqa, or drop
    #[arg(long, short = 'd')]
    dataset: String,

    /// Number of independent samples to generate
    #[arg(long, short = 's', default_value = "4")]
    sample: usize,

    /// Model used to generate scenarios, plans, and workflow code
    #[arg(long, default_value = "openai/gpt-oss-20b")]
    gen_model: String,

    /// Model used to execute generated workflows
    #[arg(long, default_value = "openai/gpt-oss-20b")]
    exec_model: String,

    /// Root directory for per-sample artifacts
    #[arg(long, default_value = "generated_data")]
    results_path: PathBuf,

    /// Directory holding benchmark split files (<name>_<split>.jsonl)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for result tables and mismatch logs
    #[arg(long, default_value = "logs")]
    log_path: PathBuf,

    /// Evaluate against the test split instead of validation
    #[arg(long)]
    test: bool,

    /// Fixed scenario length
    #[arg(long, default_value = "5")]
    scenario_len: usize,

    /// Capacity of the scenario candidate pool
    #[arg(long, default_value = "4")]
    max_scenarios: usize,

    /// Maximum concurrent record evaluations
    #[arg(long, default_value = "5")]
    concurrency: usize,

    /// API key for the model endpoint
    #[arg(long, env = "MASGEN_API_KEY")]
    api_key: String,

    /// Base URL of the OpenAI-compatible model endpoint
    #[arg(long, env = "MASGEN_API_BASE", default_value = "https://openrouter.ai/api/v1")]
    api_base: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// What kind of answers a benchmark expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionType {
    Math,
    Qa,
}

/// Per-dataset experiment settings: question type and operator set.
struct ExperimentConfig {
    question_type: QuestionType,
    operators: Vec<Operator>,
}

/// Settings table for the supported benchmarks.
fn experiment_config(dataset: &str) -> Option<ExperimentConfig> {
    match dataset.to_lowercase().as_str() {
        "gsm8k" => Some(ExperimentConfig {
            question_type: QuestionType::Math,
            operators: vec![
                Operator::Custom,
                Operator::ScEnsemble,
                Operator::Programmer,
                Operator::Review,
                Operator::Revise,
                Operator::Format,
                Operator::Debater,
                Operator::Judge,
            ],
        }),
        "hotpotqa" | "drop" => Some(ExperimentConfig {
            question_type: QuestionType::Qa,
            operators: vec![
                Operator::Custom,
                Operator::AnswerGenerate,
                Operator::ScEnsemble,
                Operator::Review,
                Operator::Revise,
                Operator::Format,
                Operator::Debater,
                Operator::Judge,
            ],
        }),
        _ => None,
    }
}

impl Args {
    fn validate(&self) -> Result<(), String> {
        if experiment_config(&self.dataset).is_none() {
            return Err(format!(
                "Unknown dataset '{}'. Use gsm8k, hotpotqa, or drop.",
                self.dataset
            ));
        }
        if self.sample == 0 {
            return Err("sample count must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        Ok(())
    }

    fn split(&self) -> Split {
        if self.test {
            Split::Test
        } else {
            Split::Validate
        }
    }
}

async fn run(args: &Args) -> Result<(), String> {
    let experiment =
        experiment_config(&args.dataset).ok_or_else(|| format!("Unknown dataset '{}'", args.dataset))?;

    // Resolve both models up front: an unknown identifier is fatal before
    // any pipeline work begins.
    let registry = ModelRegistry::with_defaults(&args.api_base);
    let gen_config = registry
        .get(&args.gen_model)
        .map_err(|e| format!("{} (--gen-model)", e))?
        .clone();
    let exec_config = registry
        .get(&args.exec_model)
        .map_err(|e| format!("{} (--exec-model)", e))?
        .clone();

    let gen_llm = Arc::new(HttpLlm::new(args.api_key.clone(), gen_config));
    let exec_llm: Arc<dyn masgen_core::LanguageModel> =
        Arc::new(HttpLlm::new(args.api_key.clone(), exec_config));

    let benchmark = create_benchmark(&args.dataset, &args.data_dir, &args.log_path, args.split())
        .await
        .map_err(|e| format!("Failed to load benchmark: {}", e))?;

    log::info!(
        "Loaded {} ({} records, {:?} questions)",
        benchmark.name(),
        benchmark.records().len(),
        experiment.question_type
    );

    let generator = DataGenerator::new(
        gen_llm,
        ArtifactStore::new(&args.results_path),
        PipelineConfig::new()
            .with_max_scenario_len(args.scenario_len)
            .with_max_scenarios(args.max_scenarios.max(args.sample))
            .with_operators(experiment.operators),
        benchmark.description(),
    );
    let evaluator = Evaluator::new(EvalConfig::new().with_concurrency(args.concurrency));

    let progress = ProgressBar::new(args.sample as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    // One sample's failure never aborts the batch.
    let mut scores = Vec::new();
    for sample_id in 0..args.sample {
        let key = SampleKey::new(benchmark.name(), sample_id);
        progress.set_message(format!("sample_{}", sample_id));

        let sample = match generator.generate_sample(&key).await {
            Ok(sample) => sample,
            Err(e) => {
                log::error!("Generation failed for {}: {}", key, e);
                progress.inc(1);
                continue;
            }
        };

        match evaluator
            .evaluate(
                benchmark.as_ref(),
                &sample.workflow_path,
                sample_id,
                exec_llm.clone(),
                &args.log_path,
            )
            .await
        {
            Ok(summary) => {
                log::info!("{}: mean score {:.4}", key, summary.mean_score);
                scores.push((sample_id, summary.mean_score));
            }
            Err(e) => {
                log::error!("Evaluation failed for {}: {}", key, e);
            }
        }
        progress.inc(1);
    }
    progress.finish_with_message("done");

    println!();
    println!("=== Sample Scores ({}) ===", benchmark.name());
    for (sample_id, score) in &scores {
        println!("sample_{}: {:.4}", sample_id, score);
    }
    if scores.is_empty() {
        println!("No sample completed evaluation.");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    eprintln!("=== masgen ===");
    eprintln!("Dataset: {}", args.dataset);
    eprintln!("Samples: {}", args.sample);
    eprintln!("Gen model: {}", args.gen_model);
    eprintln!("Exec model: {}", args.exec_model);
    eprintln!();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args() -> Args {
        Args {
            dataset: "gsm8k".to_string(),
            sample: 4,
            gen_model: "openai/gpt-oss-20b".to_string(),
            exec_model: "openai/gpt-oss-20b".to_string(),
            results_path: PathBuf::from("generated_data"),
            data_dir: PathBuf::from("data"),
            log_path: PathBuf::from("logs"),
            test: false,
            scenario_len: 5,
            max_scenarios: 4,
            concurrency: 5,
            api_key: "test-key".to_string(),
            api_base: "https://example.test/v1".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_validate_valid_args() {
        assert!(test_args().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_dataset() {
        let mut args = test_args();
        args.dataset = "trivia".to_string();
        let err = args.validate().unwrap_err();
        assert!(err.contains("trivia"));
    }

    #[test]
    fn test_validate_zero_sample() {
        let mut args = test_args();
        args.sample = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut args = test_args();
        args.concurrency = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_split_flag() {
        let mut args = test_args();
        assert_eq!(args.split(), Split::Validate);
        args.test = true;
        assert_eq!(args.split(), Split::Test);
    }

    #[test]
    fn test_experiment_config_math_uses_programmer() {
        let config = experiment_config("GSM8K").unwrap();
        assert_eq!(config.question_type, QuestionType::Math);
        assert!(config.operators.contains(&Operator::Programmer));
        assert!(!config.operators.contains(&Operator::AnswerGenerate));
    }

    #[test]
    fn test_experiment_config_qa_uses_answer_generate() {
        for dataset in ["hotpotqa", "drop"] {
            let config = experiment_config(dataset).unwrap();
            assert_eq!(config.question_type, QuestionType::Qa);
            assert!(config.operators.contains(&Operator::AnswerGenerate));
        }
    }

    #[test]
    fn test_experiment_config_unknown() {
        assert!(experiment_config("humaneval").is_none());
    }
}
