//! Operator execution against the execution model.
//!
//! Each operator in the catalog maps onto one structured model call: the
//! prompt carries the problem, the subtask objective, and any work produced
//! by earlier steps; the operator's response schema decides which field of
//! the structured output becomes the step's result.

use masgen_core::schema::{
    AnswerGenerateResponse, CodeGenerateResponse, DebaterResponse, FormatResponse,
    GenerateResponse, JudgeResponse, ReflectionTestResponse, ReviewResponse, ReviseResponse,
    ScEnsembleResponse,
};
use masgen_core::{invoke_structured, LanguageModel, Operator, WorkflowError};

/// Run one operator step and return its textual output.
pub async fn execute_operator(
    llm: &dyn LanguageModel,
    operator: Operator,
    problem: &str,
    objective: &str,
    previous: Option<&str>,
) -> Result<String, WorkflowError> {
    let prompt = build_prompt(operator, problem, objective, previous);
    log::debug!("Executing operator {} on {}", operator, llm.model_id());

    let output = match operator {
        Operator::Custom | Operator::Programmer => {
            invoke_structured::<GenerateResponse>(llm, prompt).await?.response
        }
        Operator::AnswerGenerate => {
            invoke_structured::<AnswerGenerateResponse>(llm, prompt)
                .await?
                .answer
        }
        Operator::CustomCodeGenerate => {
            invoke_structured::<CodeGenerateResponse>(llm, prompt)
                .await?
                .code
        }
        Operator::ScEnsemble => {
            invoke_structured::<ScEnsembleResponse>(llm, prompt)
                .await?
                .sc_solution
        }
        Operator::Review => {
            let review = invoke_structured::<ReviewResponse>(llm, prompt).await?;
            // Keep the reviewed solution flowing to the next step alongside
            // the verdict, so a following Revise sees both.
            format!(
                "review_result: {}\nfeedback: {}\nsolution:\n{}",
                review.review_result,
                review.feedback,
                previous.unwrap_or_default()
            )
        }
        Operator::Revise => {
            invoke_structured::<ReviseResponse>(llm, prompt)
                .await?
                .revised_solution
        }
        Operator::Format => {
            invoke_structured::<FormatResponse>(llm, prompt)
                .await?
                .solution
        }
        Operator::Test => {
            invoke_structured::<ReflectionTestResponse>(llm, prompt)
                .await?
                .reflection_and_solution
        }
        Operator::Debater => {
            invoke_structured::<DebaterResponse>(llm, prompt)
                .await?
                .solution
        }
        Operator::Judge => {
            invoke_structured::<JudgeResponse>(llm, prompt)
                .await?
                .best_solution
        }
    };

    Ok(output)
}

fn build_prompt(
    operator: Operator,
    problem: &str,
    objective: &str,
    previous: Option<&str>,
) -> String {
    let mut sections = vec![
        format!("Problem:\n{}", problem),
        format!("Your role: {}", operator.description()),
        format!("Objective: {}", objective),
    ];
    if let Some(previous) = previous {
        sections.push(format!("Work so far:\n{}", previous));
    }
    sections.join("\n\n")
}
