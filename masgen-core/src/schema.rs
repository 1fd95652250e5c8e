//! Structured-output contracts for the language-model collaborator.
//!
//! Each type here names one output schema the model can be asked to fill:
//! the type carries the JSON schema sent with the request, and the serde
//! shape used to parse the response. Schema validation beyond field presence
//! is the collaborator's responsibility.

use crate::scenario::Plan;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A named structured-output schema.
pub trait StructuredOutput {
    /// Schema identifier, used in parse errors and logs.
    const SCHEMA_NAME: &'static str;

    /// JSON schema describing the expected response object.
    fn schema() -> Value;
}

/// Free-form solution to a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

impl StructuredOutput for GenerateResponse {
    const SCHEMA_NAME: &'static str = "generate";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "response": {
                    "type": "string",
                    "description": "Your solution for this problem"
                }
            },
            "required": ["response"]
        })
    }
}

/// Step-by-step reasoning with a final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerGenerateResponse {
    #[serde(default)]
    pub thought: String,
    #[serde(default)]
    pub answer: String,
}

impl StructuredOutput for AnswerGenerateResponse {
    const SCHEMA_NAME: &'static str = "answer_generate";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "thought": {
                    "type": "string",
                    "description": "The step by step thinking process"
                },
                "answer": {
                    "type": "string",
                    "description": "The final answer to the question"
                }
            },
            "required": ["thought", "answer"]
        })
    }
}

/// Complete code solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeGenerateResponse {
    #[serde(default)]
    pub code: String,
}

impl StructuredOutput for CodeGenerateResponse {
    const SCHEMA_NAME: &'static str = "code_generate";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Your complete code solution for this problem"
                }
            },
            "required": ["code"]
        })
    }
}

/// Formatted final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatResponse {
    #[serde(default)]
    pub solution: String,
}

impl StructuredOutput for FormatResponse {
    const SCHEMA_NAME: &'static str = "format";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "solution": {
                    "type": "string",
                    "description": "Your formatted answer for this problem"
                }
            },
            "required": ["solution"]
        })
    }
}

/// Most consistent solution picked from several candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScEnsembleResponse {
    #[serde(default)]
    pub thought: String,
    #[serde(default)]
    pub sc_solution: String,
}

impl StructuredOutput for ScEnsembleResponse {
    const SCHEMA_NAME: &'static str = "sc_ensemble";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "thought": {
                    "type": "string",
                    "description": "The thought of the most consistent solution"
                },
                "sc_solution": {
                    "type": "string",
                    "description": "The most consistent solution"
                }
            },
            "required": ["thought", "sc_solution"]
        })
    }
}

/// Review verdict with feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub review_result: bool,
    #[serde(default)]
    pub feedback: String,
}

impl StructuredOutput for ReviewResponse {
    const SCHEMA_NAME: &'static str = "review";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "review_result": {
                    "type": "boolean",
                    "description": "Whether the solution passes review"
                },
                "feedback": {
                    "type": "string",
                    "description": "Feedback for this problem based on the criteria"
                }
            },
            "required": ["review_result", "feedback"]
        })
    }
}

/// Solution rewritten according to feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviseResponse {
    #[serde(default)]
    pub revised_solution: String,
}

impl StructuredOutput for ReviseResponse {
    const SCHEMA_NAME: &'static str = "revise";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "revised_solution": {
                    "type": "string",
                    "description": "Based on the feedback, revised solution for this problem"
                }
            },
            "required": ["revised_solution"]
        })
    }
}

/// Debater critique plus a fresh solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebaterResponse {
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub solution: String,
}

impl StructuredOutput for DebaterResponse {
    const SCHEMA_NAME: &'static str = "debater";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "feedback": {
                    "type": "string",
                    "description": "Feedback for the proposed solutions"
                },
                "solution": {
                    "type": "string",
                    "description": "A new solution for this problem"
                }
            },
            "required": ["feedback", "solution"]
        })
    }
}

/// Judgement over proposed solutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeResponse {
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub best_solution: String,
}

impl StructuredOutput for JudgeResponse {
    const SCHEMA_NAME: &'static str = "judge";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "justification": {
                    "type": "string",
                    "description": "The justification for your decision"
                },
                "best_solution": {
                    "type": "string",
                    "description": "The final decision after judging the proposed solutions"
                }
            },
            "required": ["justification", "best_solution"]
        })
    }
}

/// Reflection on failing tests with a corrected solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionTestResponse {
    #[serde(default)]
    pub reflection_and_solution: String,
}

impl StructuredOutput for ReflectionTestResponse {
    const SCHEMA_NAME: &'static str = "reflection_test";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "reflection_and_solution": {
                    "type": "string",
                    "description": "Corrective solution for code execution errors or test case failures"
                }
            },
            "required": ["reflection_and_solution"]
        })
    }
}

/// A batch of candidate scenario lines from the generation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBatchResponse {
    #[serde(default)]
    pub scenarios: Vec<String>,
}

impl StructuredOutput for ScenarioBatchResponse {
    const SCHEMA_NAME: &'static str = "scenario_batch";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "scenarios": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Candidate operator sequences, one ' -> '-joined line each"
                }
            },
            "required": ["scenarios"]
        })
    }
}

/// The task decomposer's plan output.
impl StructuredOutput for Plan {
    const SCHEMA_NAME: &'static str = "detailed_plan";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "detailed_plan": {
                    "type": "array",
                    "description": "One subtask per scenario step, in scenario order",
                    "items": {
                        "type": "object",
                        "properties": {
                            "subtask_id": { "type": "string" },
                            "operator": { "type": "string" },
                            "objective": { "type": "string" }
                        },
                        "required": ["subtask_id", "operator", "objective"]
                    }
                }
            },
            "required": ["detailed_plan"]
        })
    }
}

/// Generated workflow source from the code generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasCodeResponse {
    #[serde(default)]
    pub mas_code: String,
}

impl StructuredOutput for MasCodeResponse {
    const SCHEMA_NAME: &'static str = "mas_code";

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "mas_code": {
                    "type": "string",
                    "description": "The executable workflow source for this problem"
                }
            },
            "required": ["mas_code"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_objects_with_required_fields() {
        for (name, schema) in [
            (GenerateResponse::SCHEMA_NAME, GenerateResponse::schema()),
            (
                AnswerGenerateResponse::SCHEMA_NAME,
                AnswerGenerateResponse::schema(),
            ),
            (ReviewResponse::SCHEMA_NAME, ReviewResponse::schema()),
            (Plan::SCHEMA_NAME, Plan::schema()),
            (MasCodeResponse::SCHEMA_NAME, MasCodeResponse::schema()),
        ] {
            assert_eq!(schema["type"], "object", "schema '{}' not an object", name);
            assert!(
                schema["required"].as_array().is_some_and(|r| !r.is_empty()),
                "schema '{}' has no required fields",
                name
            );
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: AnswerGenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.thought.is_empty());
        assert!(parsed.answer.is_empty());
    }

    #[test]
    fn test_plan_schema_parse() {
        let raw = r#"{
            "detailed_plan": [
                {"subtask_id": "subtask_1", "operator": "Custom", "objective": "start"}
            ]
        }"#;
        let plan: Plan = serde_json::from_str(raw).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.subtasks()[0].subtask_id, "subtask_1");
    }
}
