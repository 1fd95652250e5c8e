//! Prompt templates for the generation model.
//!
//! Three prompts drive the pipeline: scenario candidate generation, task
//! decomposition into a plan, and workflow source generation. The wording
//! tracks what each structured schema expects back.

use masgen_core::Operator;

/// The skeleton handed to the code generator, and the grammar the loader
/// accepts back.
pub const WORKFLOW_TEMPLATE: &str = r#"workflow solve {
    step subtask_1: <Operator> "<objective>"
    step subtask_2: <Operator> "<objective>"
}"#;

/// Fixed header wrapped around the generated workflow block.
const MODULE_HEADER: &str = "# masgen workflow v1";

/// Wrap a generated `workflow solve` block in the fixed module template.
pub fn wrap_in_module_template(block: &str, operators: &[Operator]) -> String {
    let names: Vec<&str> = operators.iter().map(Operator::name).collect();
    format!(
        "{}\n# operators: {}\n\n{}\n",
        MODULE_HEADER,
        names.join(", "),
        block.trim()
    )
}

/// Prompt for one batch of candidate scenarios.
pub fn render_scenario_prompt(
    task_description: &str,
    operators_desc: &str,
    scenario_len: usize,
    batch_size: usize,
) -> String {
    format!(
        r#"You design multi-agent reasoning workflows.

The task these workflows must solve:
{task_description}

Available operators:
{operators_desc}

Propose {batch_size} distinct scenarios. A scenario is an ordered sequence of
exactly {scenario_len} operator names joined by " -> ", for example:
AnswerGenerate -> Review -> Revise -> ScEnsemble -> Format

Rules:
- Use only the operator names listed above, spelled exactly.
- Every scenario must have exactly {scenario_len} steps.
- No two scenarios may be identical.

Return in JSON format:
{{"scenarios": ["<scenario>", ...]}}"#
    )
}

/// Prompt for decomposing the task into a plan bound to one scenario.
pub fn render_decomposer_prompt(
    task_description: &str,
    scenario: &str,
    operators_desc: &str,
) -> String {
    format!(
        r#"You are a task decomposer responsible for breaking down a complex problem into a structured sequence of smaller subtasks.

Given:
- A main task description: {task_description}
- A predefined scenario (operator sequence) that dictates the logical order of execution: {scenario}
- A set of available operators with distinct roles and functions:
{operators_desc}

Your goal:
1. Decompose the main task into well-defined subtasks, one per scenario step.
2. Ensure the decomposition strictly follows the given scenario order; do not change the order of operators.
3. For each subtask, specify `subtask_id`, `operator` (the operator that handles it), and `objective` (what it aims to achieve).
4. The total number of subtasks must equal the number of operators in the scenario.

Guidelines:
- Each subtask must be concise, actionable, and independent enough for its operator to perform.
- Maintain logical flow between subtasks.
- Avoid redundancy or vague steps.

Return in JSON format:
{{"detailed_plan": [{{"subtask_id": "subtask_<id>", "operator": "<operator>", "objective": "<objective>"}}]}}"#
    )
}

/// Prompt for generating workflow source from a plan and scenario.
pub fn render_code_generator_prompt(
    plan_json: &str,
    scenario: &str,
    operators_desc: &str,
) -> String {
    format!(
        r#"You are an expert generator of multi-agent workflow programs.

Generate a complete workflow implementing the given plan.

Inputs:
- Workflow template:
{WORKFLOW_TEMPLATE}
- Plan (a list of subtasks, each including `objective` and the `operator` that performs it):
{plan_json}
- Scenario (the required operator order): {scenario}
- Operator descriptions:
{operators_desc}

Requirements:
1. Use the template as the structural base: one `workflow solve {{ ... }}` block.
2. Emit one `step` line per plan subtask, keeping the scenario's operator order.
3. Each step line is: step <subtask_id>: <Operator> "<objective>"
4. Carry each subtask's objective into its step line verbatim, double-quoted.
5. Do not invent operators outside the provided set.

Output format:
Only the workflow block, starting with:
workflow solve {{
Do not include explanations or markdown formatting.

Return in JSON format:
{{"mas_code": "<workflow block>"}}"#
    )
}
