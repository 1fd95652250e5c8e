//! The three-stage artifact pipeline.
//!
//! For each sample, the generator produces a scenario, a plan, and workflow
//! source, in that order, each stage independently memoized on disk:
//! an artifact already present is loaded instead of regenerated, so a
//! re-run with all three artifacts on disk performs zero model calls and
//! zero writes. The cache is write-once; regenerating a sample requires
//! deleting its artifacts externally.

use crate::prompts;
use crate::queue::{QueueClosed, ScenarioQueue};
use crate::store::{ArtifactKind, ArtifactStore, SampleKey};
use masgen_core::{
    invoke_structured, LanguageModel, LlmError, MasCodeResponse, Operator, Plan,
    PlanAlignmentError, ScenarioBatchResponse, ScenarioParseError, ScenarioSpec,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Upper bound on generation batches while filling the candidate queue.
const MAX_FILL_BATCHES: usize = 10;

/// Errors from the artifact pipeline. Fatal per sample, not per batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Artifact storage I/O failed
    #[error("Artifact I/O failed: {0}")]
    Artifact(#[from] std::io::Error),

    /// A generation call to the model failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// A persisted scenario artifact could not be parsed back
    #[error("Persisted scenario is invalid: {0}")]
    Scenario(#[from] ScenarioParseError),

    /// A plan artifact could not be parsed or serialized
    #[error("Plan JSON error: {0}")]
    PlanJson(#[from] serde_json::Error),

    /// The generated plan violates the scenario alignment invariant
    #[error("Generated plan does not align with its scenario: {0}")]
    PlanMismatch(#[from] PlanAlignmentError),

    /// The scenario queue closed while the pipeline was running
    #[error(transparent)]
    QueueClosed(#[from] QueueClosed),

    /// Scenario generation kept producing duplicates or invalid lines
    #[error("Scenario generation stalled after {attempts} batches with {distinct} distinct candidates")]
    ScenarioGenerationStalled { attempts: usize, distinct: usize },
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PipelineConfig {
    /// Fixed scenario length (default: 5)
    pub max_scenario_len: usize,

    /// Capacity of the scenario candidate queue (default: 4)
    pub max_scenarios: usize,

    /// Operator set scenarios may draw from
    pub operators: Vec<Operator>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_scenario_len: 5,
            max_scenarios: 4,
            operators: vec![
                Operator::Custom,
                Operator::AnswerGenerate,
                Operator::ScEnsemble,
                Operator::Review,
                Operator::Revise,
                Operator::Format,
            ],
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed scenario length (at least 1).
    #[must_use]
    pub fn with_max_scenario_len(mut self, len: usize) -> Self {
        self.max_scenario_len = len.max(1);
        self
    }

    /// Set the candidate queue capacity (at least 1).
    #[must_use]
    pub fn with_max_scenarios(mut self, count: usize) -> Self {
        self.max_scenarios = count.max(1);
        self
    }

    /// Set the operator set.
    #[must_use]
    pub fn with_operators(mut self, operators: Vec<Operator>) -> Self {
        self.operators = operators;
        self
    }
}

/// Everything the pipeline produced for one sample.
#[derive(Debug, Clone)]
pub struct GeneratedSample {
    pub key: SampleKey,
    pub scenario: ScenarioSpec,
    pub plan: Plan,
    pub workflow_source: String,
    /// Where the workflow source lives on disk, for the evaluator
    pub workflow_path: PathBuf,
}

/// Drives the scenario, plan, and code stages for each sample.
pub struct DataGenerator {
    gen_llm: Arc<dyn LanguageModel>,
    store: ArtifactStore,
    config: PipelineConfig,
    task_description: String,
    queue: ScenarioQueue,
    queue_filled: OnceCell<()>,
}

impl DataGenerator {
    /// Create a generator over a store, using `task_description` as the
    /// decomposer's notion of what the workflows must solve.
    pub fn new(
        gen_llm: Arc<dyn LanguageModel>,
        store: ArtifactStore,
        config: PipelineConfig,
        task_description: impl Into<String>,
    ) -> Self {
        let queue = ScenarioQueue::new(config.max_scenarios);
        Self {
            gen_llm,
            store,
            config,
            task_description: task_description.into(),
            queue,
            queue_filled: OnceCell::new(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run all three stages for one sample, loading whatever is cached.
    pub async fn generate_sample(&self, key: &SampleKey) -> Result<GeneratedSample, PipelineError> {
        let scenario = self.ensure_scenario(key).await?;
        let plan = self.ensure_plan(key, &scenario).await?;
        let workflow_source = self.ensure_workflow(key, &scenario, &plan).await?;

        Ok(GeneratedSample {
            key: key.clone(),
            scenario,
            plan,
            workflow_source,
            workflow_path: self.store.artifact_path(key, ArtifactKind::Workflow),
        })
    }

    /// Scenario stage: load `scenario.txt` or draw one from the candidate
    /// queue (filling it first, exactly once per generator).
    async fn ensure_scenario(&self, key: &SampleKey) -> Result<ScenarioSpec, PipelineError> {
        if let Some(text) = self
            .store
            .load_if_present(key, ArtifactKind::Scenario)
            .await?
        {
            log::debug!("Reusing cached scenario for {}", key);
            return Ok(ScenarioSpec::parse(&text)?);
        }

        // The queue must hold a full batch of distinct candidates before the
        // first consumption; filling is lazy so cached runs stay model-free.
        self.queue_filled
            .get_or_try_init(|| self.fill_queue())
            .await?;

        let spec = self.queue.pop().await.ok_or(QueueClosed)?;
        self.store
            .persist(key, ArtifactKind::Scenario, &spec.render())
            .await?;
        log::info!("Scenario for {}: {}", key, spec);
        Ok(spec)
    }

    /// Produce exactly `max_scenarios` distinct valid candidates.
    async fn fill_queue(&self) -> Result<(), PipelineError> {
        let operators_desc = Operator::describe_set(&self.config.operators);
        let mut seen: HashSet<String> = HashSet::new();
        let mut attempts = 0;

        while seen.len() < self.config.max_scenarios {
            if attempts >= MAX_FILL_BATCHES {
                return Err(PipelineError::ScenarioGenerationStalled {
                    attempts,
                    distinct: seen.len(),
                });
            }
            attempts += 1;

            let prompt = prompts::render_scenario_prompt(
                &self.task_description,
                &operators_desc,
                self.config.max_scenario_len,
                self.config.max_scenarios - seen.len(),
            );
            let batch: ScenarioBatchResponse =
                invoke_structured(self.gen_llm.as_ref(), prompt).await?;

            for line in batch.scenarios {
                if seen.len() >= self.config.max_scenarios {
                    break;
                }
                let spec = match ScenarioSpec::parse(&line) {
                    Ok(spec) => spec,
                    Err(e) => {
                        log::warn!("Discarding unparseable scenario candidate: {}", e);
                        continue;
                    }
                };
                if spec.len() != self.config.max_scenario_len {
                    log::warn!(
                        "Discarding scenario of length {} (expected {})",
                        spec.len(),
                        self.config.max_scenario_len
                    );
                    continue;
                }
                if spec
                    .operators()
                    .iter()
                    .any(|op| !self.config.operators.contains(op))
                {
                    log::warn!("Discarding scenario using operators outside the configured set");
                    continue;
                }
                if !seen.insert(spec.render()) {
                    continue; // duplicate within the batch
                }
                self.queue.push(spec).await?;
            }
        }

        log::info!(
            "Scenario candidate queue filled: {} distinct candidates in {} batches",
            seen.len(),
            attempts
        );
        Ok(())
    }

    /// Plan stage: load `plan.json` or request a decomposition constrained
    /// to the scenario's operator order and count.
    async fn ensure_plan(
        &self,
        key: &SampleKey,
        scenario: &ScenarioSpec,
    ) -> Result<Plan, PipelineError> {
        if let Some(text) = self.store.load_if_present(key, ArtifactKind::Plan).await? {
            log::debug!("Reusing cached plan for {}", key);
            return Ok(serde_json::from_str(&text)?);
        }

        let prompt = prompts::render_decomposer_prompt(
            &self.task_description,
            &scenario.render(),
            &Operator::describe_set(scenario.operators()),
        );
        let plan: Plan = invoke_structured(self.gen_llm.as_ref(), prompt).await?;
        plan.validate_against(scenario)?;

        self.store
            .persist(key, ArtifactKind::Plan, &serde_json::to_string_pretty(&plan)?)
            .await?;
        log::info!("Plan for {}: {} subtasks", key, plan.len());
        Ok(plan)
    }

    /// Code stage: load `workflow.mas` or request workflow source and wrap
    /// it in the fixed module template.
    async fn ensure_workflow(
        &self,
        key: &SampleKey,
        scenario: &ScenarioSpec,
        plan: &Plan,
    ) -> Result<String, PipelineError> {
        if let Some(source) = self
            .store
            .load_if_present(key, ArtifactKind::Workflow)
            .await?
        {
            log::debug!("Reusing cached workflow source for {}", key);
            return Ok(source);
        }

        let prompt = prompts::render_code_generator_prompt(
            &serde_json::to_string_pretty(plan)?,
            &scenario.render(),
            &Operator::describe_set(scenario.operators()),
        );
        let response: MasCodeResponse = invoke_structured(self.gen_llm.as_ref(), prompt).await?;
        let source = prompts::wrap_in_module_template(&response.mas_code, scenario.operators());

        self.store
            .persist(key, ArtifactKind::Workflow, &source)
            .await?;
        log::info!(
            "Workflow source for {}: {} bytes",
            key,
            source.len()
        );
        Ok(source)
    }
}
