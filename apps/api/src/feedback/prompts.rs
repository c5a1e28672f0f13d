// All LLM prompt constants for the feedback scoring module.

/// Persona for answer scoring. The JSON-only constraint is appended from
/// `llm_client::prompts::JSON_ONLY_SYSTEM` at call time.
pub const FEEDBACK_PERSONA: &str = "You are an experienced technical interviewer \
    reviewing a candidate's spoken answer. \
    Reply with a JSON object with exactly two fields: \
    \"rating\" (an integer from 1 to 5) and \"feedback\" (a short critique).";

/// Feedback prompt template. Replace: {question}, {answer}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Analyze the following response to a mock interview question and provide constructive feedback in JSON format.
The feedback should include:
- A rating (1 to 5) for the quality of the answer.
- Specific areas of improvement in 2 to 3 lines.

Input:
Question: {question}
User Answer: {answer}

Return a JSON object:
{
  "rating": 3,
  "feedback": "Two to three lines of specific, actionable critique."
}"#;
