// All LLM prompt constants for the question generation module.

/// Persona for question generation. The JSON-only constraint is appended
/// from `llm_client::prompts::JSON_ONLY_SYSTEM` at call time.
pub const QUESTION_PERSONA: &str = "You are an experienced technical interviewer \
    preparing a tailored mock interview for a specific job description. \
    Reply with a JSON array whose elements contain only \"question\" and \
    \"answer\" fields, without additional notes.";

/// Question generation prompt template.
/// Replace: {count}, {job_position}, {job_description}, {job_experience}, {extra_info}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Based on the following information, generate {count} tailored interview questions and answers in JSON format. Include only "question" and "answer" fields without additional notes.

Details:
- Job Position: {job_position}
- Job Description: {job_description}
- Years of Experience: {job_experience}
- Additional Information: {extra_info}

Please ensure that the questions are relevant to the job role, experience level, and provided job description, utilizing the additional information for a more accurate response.

Return a JSON ARRAY:
[
  {
    "question": "Explain the difference between SQL and NoSQL databases.",
    "answer": "A concise model answer for the candidate to compare against."
  }
]"#;
