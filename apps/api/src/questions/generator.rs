//! Question Generator — produces the initial question set at session creation.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::interview::GeneratedQuestion;
use crate::questions::prompts::{QUESTION_PERSONA, QUESTION_PROMPT_TEMPLATE};

/// Number of questions requested per interview. The count is asserted in the
/// prompt; a response of a different length is accepted but logged.
pub const QUESTION_COUNT: usize = 7;

/// Inputs describing the target job, straight from the creation form.
#[derive(Debug, Clone)]
pub struct JobDetails<'a> {
    pub job_position: &'a str,
    pub job_description: &'a str,
    pub job_experience: &'a str,
    pub extra_info: &'a str,
}

/// Generates the tailored question set for a job description.
pub async fn generate_questions(
    details: JobDetails<'_>,
    llm: &LlmClient,
) -> Result<Vec<GeneratedQuestion>, AppError> {
    let prompt = build_question_prompt(&details);
    let system = system_prompt();

    let questions: Vec<GeneratedQuestion> = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Generation(format!("Question generation LLM call failed: {e}")))?;

    if questions.is_empty() {
        return Err(AppError::Generation(
            "Model returned an empty question list".to_string(),
        ));
    }

    if questions.len() != QUESTION_COUNT {
        warn!(
            "Model returned {} questions (asked for {}) — accepting as-is",
            questions.len(),
            QUESTION_COUNT
        );
    }

    info!(
        "Generated {} questions for position '{}'",
        questions.len(),
        details.job_position
    );

    Ok(questions)
}

/// Interviewer persona plus the shared JSON-only output constraint.
fn system_prompt() -> String {
    format!("{QUESTION_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Builds the generation prompt by filling the template with the job details.
fn build_question_prompt(details: &JobDetails<'_>) -> String {
    QUESTION_PROMPT_TEMPLATE
        .replace("{count}", &QUESTION_COUNT.to_string())
        .replace("{job_position}", details.job_position)
        .replace("{job_description}", details.job_description)
        .replace("{job_experience}", details.job_experience)
        .replace("{extra_info}", details.extra_info)
}
