//! Loading generated workflow source as an executable unit.
//!
//! Freshly synthesized source is treated as a callable workflow with no
//! separate compile step visible to the caller: the loader parses the text,
//! validates the `workflow solve` entry point and every step, and returns a
//! [`CompiledWorkflow`] satisfying the [`Workflow`] capability trait.
//! Structural defects surface as [`LoadError`] - they are fatal for the
//! sample and never retried.
//!
//! ## Source format
//!
//! The pipeline wraps the generated block in a fixed module template; the
//! loader accepts the wrapped file:
//!
//! ```text
//! # masgen workflow v1
//! # operators: AnswerGenerate, Review, Format
//!
//! workflow solve {
//!     step subtask_1: AnswerGenerate "Draft an initial answer"
//!     step subtask_2: Review "Check the draft against the question"
//!     step subtask_3: Format "Reduce to the final answer"
//! }
//! ```
//!
//! Comment lines (`#`) and blank lines are ignored everywhere.

use crate::executor::execute_operator;
use async_trait::async_trait;
use masgen_core::{truncate, LanguageModel, Operator, Workflow, WorkflowError, WorkflowOutput};
use std::sync::Arc;
use thiserror::Error;

/// The entry point every workflow unit must declare.
const ENTRY_POINT: &str = "workflow solve {";

/// Structural defects in generated workflow source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// No `workflow solve` block in the source
    #[error("Workflow source has no 'workflow solve' entry point")]
    MissingEntryPoint,

    /// The block opened but never closed
    #[error("Workflow block is never closed")]
    UnterminatedBlock,

    /// A body line did not match the step grammar
    #[error("Malformed step on line {line}: {message}")]
    MalformedStep { line: usize, message: String },

    /// A step named an operator outside the catalog
    #[error("Unknown operator '{operator}' on line {line}")]
    UnknownOperator { line: usize, operator: String },

    /// The block contained no steps
    #[error("Workflow has no steps")]
    EmptySteps,
}

/// One parsed step of a workflow unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStep {
    pub subtask_id: String,
    pub operator: Operator,
    pub objective: String,
}

/// Parse workflow source into its ordered steps.
pub fn parse_workflow(source: &str) -> Result<Vec<WorkflowStep>, LoadError> {
    let mut lines = source.lines().enumerate();

    // Scan for the entry point, ignoring comments and blank lines.
    let mut found = false;
    for (_, line) in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == ENTRY_POINT {
            found = true;
            break;
        }
    }
    if !found {
        return Err(LoadError::MissingEntryPoint);
    }

    let mut steps = Vec::new();
    let mut closed = false;
    for (idx, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "}" {
            closed = true;
            break;
        }
        steps.push(parse_step(idx + 1, trimmed)?);
    }
    if !closed {
        return Err(LoadError::UnterminatedBlock);
    }
    if steps.is_empty() {
        return Err(LoadError::EmptySteps);
    }
    Ok(steps)
}

/// Parse one `step <id>: <Operator> "<objective>"` line.
fn parse_step(line: usize, text: &str) -> Result<WorkflowStep, LoadError> {
    let malformed = |message: &str| LoadError::MalformedStep {
        line,
        message: message.to_string(),
    };

    let rest = text
        .strip_prefix("step ")
        .ok_or_else(|| malformed("expected 'step <id>: <Operator> \"<objective>\"'"))?;
    let (id, rest) = rest
        .split_once(':')
        .ok_or_else(|| malformed("missing ':' after step id"))?;
    let rest = rest.trim_start();
    let (operator_name, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed("missing objective after operator"))?;

    let operator: Operator =
        operator_name
            .parse()
            .map_err(|_| LoadError::UnknownOperator {
                line,
                operator: operator_name.to_string(),
            })?;

    let objective = rest.trim();
    let objective = objective
        .strip_prefix('"')
        .and_then(|o| o.strip_suffix('"'))
        .ok_or_else(|| malformed("objective must be double-quoted"))?;

    Ok(WorkflowStep {
        subtask_id: id.trim().to_string(),
        operator,
        objective: objective.to_string(),
    })
}

/// Parse source and bind it to an execution model and dataset.
pub fn instantiate(
    source: &str,
    dataset: impl Into<String>,
    llm: Arc<dyn LanguageModel>,
) -> Result<CompiledWorkflow, LoadError> {
    let steps = parse_workflow(source)?;
    Ok(CompiledWorkflow {
        dataset: dataset.into(),
        steps,
        llm,
    })
}

/// An executable workflow unit parsed from generated source.
///
/// Each step maps to one structured model call; each step's output is
/// threaded into the next, and the final step's output is the answer.
pub struct CompiledWorkflow {
    dataset: String,
    steps: Vec<WorkflowStep>,
    llm: Arc<dyn LanguageModel>,
}

impl CompiledWorkflow {
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

#[async_trait]
impl Workflow for CompiledWorkflow {
    async fn call(&self, input: &str) -> Result<WorkflowOutput, WorkflowError> {
        let mut current: Option<String> = None;
        let mut log_lines = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let output = execute_operator(
                self.llm.as_ref(),
                step.operator,
                input,
                &step.objective,
                current.as_deref(),
            )
            .await?;
            log_lines.push(format!(
                "[{}] {} -> {}",
                step.subtask_id,
                step.operator,
                truncate(&output, 120)
            ));
            current = Some(output);
        }

        let output = current.ok_or(WorkflowError::NoOutput)?;
        Ok((output, log_lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SOURCE: &str = r#"
# masgen workflow v1
# operators: AnswerGenerate, Review, Format

workflow solve {
    step subtask_1: AnswerGenerate "Draft an initial answer"
    step subtask_2: Review "Check the draft"
    step subtask_3: Format "Reduce to the final answer"
}
"#;

    #[test]
    fn test_parse_valid_source() {
        let steps = parse_workflow(VALID_SOURCE).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].subtask_id, "subtask_1");
        assert_eq!(steps[0].operator, Operator::AnswerGenerate);
        assert_eq!(steps[0].objective, "Draft an initial answer");
        assert_eq!(steps[2].operator, Operator::Format);
    }

    #[test]
    fn test_missing_entry_point() {
        let err = parse_workflow("# just a comment\nstep x: Custom \"y\"").unwrap_err();
        assert!(matches!(err, LoadError::MissingEntryPoint));
    }

    #[test]
    fn test_unterminated_block() {
        let source = "workflow solve {\n    step subtask_1: Custom \"x\"\n";
        let err = parse_workflow(source).unwrap_err();
        assert!(matches!(err, LoadError::UnterminatedBlock));
    }

    #[test]
    fn test_empty_block() {
        let err = parse_workflow("workflow solve {\n}\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptySteps));
    }

    #[test]
    fn test_unknown_operator_reports_line() {
        let source = "workflow solve {\n    step subtask_1: Sorcery \"x\"\n}\n";
        let err = parse_workflow(source).unwrap_err();
        match err {
            LoadError::UnknownOperator { line, operator } => {
                assert_eq!(line, 2);
                assert_eq!(operator, "Sorcery");
            }
            other => panic!("expected UnknownOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_unquoted_objective_is_malformed() {
        let source = "workflow solve {\n    step subtask_1: Custom solve it\n}\n";
        let err = parse_workflow(source).unwrap_err();
        assert!(matches!(err, LoadError::MalformedStep { .. }));
    }

    #[test]
    fn test_missing_step_keyword_is_malformed() {
        let source = "workflow solve {\n    subtask_1: Custom \"x\"\n}\n";
        let err = parse_workflow(source).unwrap_err();
        assert!(matches!(err, LoadError::MalformedStep { .. }));
    }

    #[test]
    fn test_comments_inside_block_ignored() {
        let source =
            "workflow solve {\n    # a note\n    step subtask_1: Custom \"x\"\n}\n";
        let steps = parse_workflow(source).unwrap();
        assert_eq!(steps.len(), 1);
    }
}
