//! The operator catalog.
//!
//! An operator is a named, reusable reasoning step a workflow can invoke:
//! answer generation, self-consistency ensembling, review/revise, and so on.
//! Scenarios are ordered sequences of these names; the executor maps each
//! operator onto one structured model call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A reasoning operator available to generated workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Free-form solution step driven by a caller-supplied instruction
    Custom,
    /// Step-by-step reasoning ending in a final answer
    AnswerGenerate,
    /// Code solution for a programming task, guided by an instruction
    CustomCodeGenerate,
    /// Self-consistency ensemble: pick the most consistent of several solutions
    ScEnsemble,
    /// Judge a solution against the problem, returning pass/fail and feedback
    Review,
    /// Rewrite a solution according to review feedback
    Revise,
    /// Reformat a solution into the benchmark's required answer shape
    Format,
    /// Solve by writing and reasoning through a program
    Programmer,
    /// Exercise a code solution against its reference tests and reflect on failures
    Test,
    /// Critique proposed solutions and propose an alternative
    Debater,
    /// Pick the best of several proposed solutions with a justification
    Judge,
}

impl Operator {
    /// The operator's canonical name, as it appears in scenarios and plans.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Custom => "Custom",
            Operator::AnswerGenerate => "AnswerGenerate",
            Operator::CustomCodeGenerate => "CustomCodeGenerate",
            Operator::ScEnsemble => "ScEnsemble",
            Operator::Review => "Review",
            Operator::Revise => "Revise",
            Operator::Format => "Format",
            Operator::Programmer => "Programmer",
            Operator::Test => "Test",
            Operator::Debater => "Debater",
            Operator::Judge => "Judge",
        }
    }

    /// One-line behavioral description, used as model context when
    /// decomposing tasks and generating workflow code.
    pub fn description(&self) -> &'static str {
        match self {
            Operator::Custom => {
                "Generates anything based on a customized instruction applied to the input"
            }
            Operator::AnswerGenerate => {
                "Produces a step-by-step thinking process and a final answer to the question"
            }
            Operator::CustomCodeGenerate => {
                "Generates a complete code solution for the problem under a customized instruction"
            }
            Operator::ScEnsemble => {
                "Selects the most consistent solution from several candidate solutions"
            }
            Operator::Review => {
                "Reviews a solution against the problem and returns a verdict with feedback"
            }
            Operator::Revise => "Revises a solution based on review feedback",
            Operator::Format => "Formats the solution into the final answer shape",
            Operator::Programmer => {
                "Writes and mentally executes a program to compute the answer"
            }
            Operator::Test => {
                "Runs a code solution against reference tests and proposes corrections on failure"
            }
            Operator::Debater => {
                "Critiques the proposed solutions and argues for a new or refined solution"
            }
            Operator::Judge => {
                "Judges the proposed solutions and decides which one is best, with justification"
            }
        }
    }

    /// Render a set of operators as a bulleted description block for prompts.
    pub fn describe_set(operators: &[Operator]) -> String {
        operators
            .iter()
            .map(|op| format!("- {}: {}", op.name(), op.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name does not match any catalog operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Custom" => Ok(Operator::Custom),
            "AnswerGenerate" => Ok(Operator::AnswerGenerate),
            "CustomCodeGenerate" => Ok(Operator::CustomCodeGenerate),
            "ScEnsemble" => Ok(Operator::ScEnsemble),
            "Review" => Ok(Operator::Review),
            "Revise" => Ok(Operator::Revise),
            "Format" => Ok(Operator::Format),
            "Programmer" => Ok(Operator::Programmer),
            "Test" => Ok(Operator::Test),
            "Debater" => Ok(Operator::Debater),
            "Judge" => Ok(Operator::Judge),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operator::Custom, "Custom")]
    #[case(Operator::AnswerGenerate, "AnswerGenerate")]
    #[case(Operator::ScEnsemble, "ScEnsemble")]
    #[case(Operator::Judge, "Judge")]
    fn test_name_round_trips_through_from_str(#[case] op: Operator, #[case] name: &str) {
        assert_eq!(op.name(), name);
        assert_eq!(name.parse::<Operator>().unwrap(), op);
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        assert_eq!(" Review ".parse::<Operator>().unwrap(), Operator::Review);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "Telepathy".parse::<Operator>().unwrap_err();
        assert_eq!(err, UnknownOperator("Telepathy".to_string()));
        assert!(err.to_string().contains("Telepathy"));
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Operator::AnswerGenerate).unwrap();
        assert_eq!(json, "\"AnswerGenerate\"");

        let op: Operator = serde_json::from_str("\"ScEnsemble\"").unwrap();
        assert_eq!(op, Operator::ScEnsemble);
    }

    #[test]
    fn test_describe_set_one_line_per_operator() {
        let text = Operator::describe_set(&[Operator::Custom, Operator::Format]);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("- Custom:"));
        assert!(text.contains("- Format:"));
    }
}
