//! Scenarios and plans.
//!
//! A scenario is a fixed-length ordered sequence of operator names defining a
//! workflow's control skeleton. A plan binds one subtask objective to each
//! scenario step, in the same order and count.

use crate::operator::{Operator, UnknownOperator};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Separator used when rendering a scenario as one line of text.
const SCENARIO_SEPARATOR: &str = " -> ";

/// An ordered sequence of operators describing a workflow template.
///
/// Persisted verbatim in its rendered form (`Custom -> Review -> Format`)
/// as the first pipeline artifact, and parsed back on resume.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioSpec {
    operators: Vec<Operator>,
}

impl ScenarioSpec {
    pub fn new(operators: Vec<Operator>) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Render as a single ` -> `-joined line.
    pub fn render(&self) -> String {
        self.operators
            .iter()
            .map(Operator::name)
            .collect::<Vec<_>>()
            .join(SCENARIO_SEPARATOR)
    }

    /// Parse a rendered scenario line back into a spec.
    pub fn parse(text: &str) -> Result<Self, ScenarioParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ScenarioParseError::Empty);
        }
        let operators = trimmed
            .split("->")
            .map(|part| part.trim().parse::<Operator>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(operators))
    }
}

impl fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Errors from parsing a persisted scenario line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScenarioParseError {
    #[error("Scenario text is empty")]
    Empty,

    #[error(transparent)]
    UnknownOperator(#[from] UnknownOperator),
}

/// One step of a plan: an objective bound to the operator that performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub subtask_id: String,
    pub operator: Operator,
    pub objective: String,
}

/// An ordered list of subtasks, one per scenario step.
///
/// Serialized shape matches the decomposer's structured output
/// (`{"detailed_plan": [...]}`), so the persisted `plan.json` and the model
/// response share one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub detailed_plan: Vec<Subtask>,
}

impl Plan {
    pub fn subtasks(&self) -> &[Subtask] {
        &self.detailed_plan
    }

    pub fn len(&self) -> usize {
        self.detailed_plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detailed_plan.is_empty()
    }

    /// Check the alignment invariant against the scenario this plan was
    /// generated for: equal length, and `plan[i].operator == scenario[i]`.
    pub fn validate_against(&self, scenario: &ScenarioSpec) -> Result<(), PlanAlignmentError> {
        if self.len() != scenario.len() {
            return Err(PlanAlignmentError::LengthMismatch {
                plan: self.len(),
                scenario: scenario.len(),
            });
        }
        for (index, (subtask, expected)) in self
            .detailed_plan
            .iter()
            .zip(scenario.operators())
            .enumerate()
        {
            if subtask.operator != *expected {
                return Err(PlanAlignmentError::OperatorMismatch {
                    index,
                    plan: subtask.operator,
                    scenario: *expected,
                });
            }
        }
        Ok(())
    }
}

/// Violations of the plan/scenario alignment invariant.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanAlignmentError {
    #[error("Plan has {plan} subtasks but the scenario has {scenario} steps")]
    LengthMismatch { plan: usize, scenario: usize },

    #[error("Plan step {index} uses operator {plan} but the scenario requires {scenario}")]
    OperatorMismatch {
        index: usize,
        plan: Operator,
        scenario: Operator,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ScenarioSpec {
        ScenarioSpec::new(vec![
            Operator::AnswerGenerate,
            Operator::Review,
            Operator::Format,
        ])
    }

    fn subtask(id: &str, operator: Operator) -> Subtask {
        Subtask {
            subtask_id: id.to_string(),
            operator,
            objective: format!("objective for {}", id),
        }
    }

    #[test]
    fn test_render_parse_round_trip() {
        let spec = scenario();
        let rendered = spec.render();
        assert_eq!(rendered, "AnswerGenerate -> Review -> Format");
        assert_eq!(ScenarioSpec::parse(&rendered).unwrap(), spec);
    }

    #[test]
    fn test_parse_tolerates_loose_spacing() {
        let spec = ScenarioSpec::parse("Custom->  Review ->Format\n").unwrap();
        assert_eq!(
            spec.operators(),
            &[Operator::Custom, Operator::Review, Operator::Format]
        );
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(
            ScenarioSpec::parse("   "),
            Err(ScenarioParseError::Empty)
        ));
    }

    #[test]
    fn test_parse_unknown_operator_is_error() {
        let err = ScenarioSpec::parse("Custom -> Wizardry").unwrap_err();
        assert!(err.to_string().contains("Wizardry"));
    }

    #[test]
    fn test_plan_alignment_ok() {
        let plan = Plan {
            detailed_plan: vec![
                subtask("subtask_1", Operator::AnswerGenerate),
                subtask("subtask_2", Operator::Review),
                subtask("subtask_3", Operator::Format),
            ],
        };
        assert!(plan.validate_against(&scenario()).is_ok());
    }

    #[test]
    fn test_plan_length_mismatch() {
        let plan = Plan {
            detailed_plan: vec![subtask("subtask_1", Operator::AnswerGenerate)],
        };
        assert_eq!(
            plan.validate_against(&scenario()),
            Err(PlanAlignmentError::LengthMismatch {
                plan: 1,
                scenario: 3
            })
        );
    }

    #[test]
    fn test_plan_operator_mismatch() {
        let plan = Plan {
            detailed_plan: vec![
                subtask("subtask_1", Operator::AnswerGenerate),
                subtask("subtask_2", Operator::Revise),
                subtask("subtask_3", Operator::Format),
            ],
        };
        assert_eq!(
            plan.validate_against(&scenario()),
            Err(PlanAlignmentError::OperatorMismatch {
                index: 1,
                plan: Operator::Revise,
                scenario: Operator::Review,
            })
        );
    }

    #[test]
    fn test_plan_json_round_trip() {
        let plan = Plan {
            detailed_plan: vec![subtask("subtask_1", Operator::Custom)],
        };
        let json = serde_json::to_string_pretty(&plan).unwrap();
        assert!(json.contains("detailed_plan"));
        assert!(json.contains("\"Custom\""));

        let parsed: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
