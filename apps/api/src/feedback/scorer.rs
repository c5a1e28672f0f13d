//! Feedback Scorer — sends a question/answer pair to the model and parses a
//! structured rating + critique reply.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::feedback::prompts::{FEEDBACK_PERSONA, FEEDBACK_PROMPT_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// A validated rating + critique for one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// 1 (poor) to 5 (excellent).
    pub rating: i32,
    pub feedback: String,
}

/// Raw model reply before field-presence validation. The model occasionally
/// drops a field; that must surface as IncompleteFeedback, not a parse error.
#[derive(Debug, Deserialize)]
struct RawFeedback {
    rating: Option<i32>,
    feedback: Option<String>,
}

/// Scores a transcribed answer. Fails with `IncompleteFeedback` when the reply
/// parses as JSON but lacks a usable rating or critique.
pub async fn score(
    question: &str,
    answer: &str,
    llm: &LlmClient,
) -> Result<Feedback, AppError> {
    let prompt = build_feedback_prompt(question, answer);
    let system = system_prompt();

    let raw: RawFeedback = llm
        .call_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Generation(format!("Feedback LLM call failed: {e}")))?;

    let feedback = validate_feedback(raw)?;

    debug!(
        "Scored answer: rating={} feedback_len={}",
        feedback.rating,
        feedback.feedback.len()
    );

    Ok(feedback)
}

/// Checks that both fields are present and the rating is in range.
fn validate_feedback(raw: RawFeedback) -> Result<Feedback, AppError> {
    let rating = raw
        .rating
        .ok_or_else(|| AppError::IncompleteFeedback("missing 'rating' field".to_string()))?;

    let feedback = raw
        .feedback
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::IncompleteFeedback("missing 'feedback' field".to_string()))?;

    if !(1..=5).contains(&rating) {
        return Err(AppError::IncompleteFeedback(format!(
            "rating {rating} outside 1..=5"
        )));
    }

    Ok(Feedback { rating, feedback })
}

/// Reviewer persona plus the shared JSON-only output constraint.
fn system_prompt() -> String {
    format!("{FEEDBACK_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Builds the scoring prompt by filling the template.
fn build_feedback_prompt(question: &str, answer: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_question_and_answer() {
        let prompt = build_feedback_prompt("What is REST?", "It stands for something.");
        assert!(prompt.contains("Question: What is REST?"));
        assert!(prompt.contains("User Answer: It stands for something."));
    }

    #[test]
    fn test_system_prompt_carries_json_only_constraint() {
        let system = system_prompt();
        assert!(system.contains("reviewing a candidate's spoken answer"));
        assert!(system.contains("valid JSON only"));
    }

    #[test]
    fn test_validate_accepts_complete_feedback() {
        let raw = RawFeedback {
            rating: Some(4),
            feedback: Some("Good structure, add a concrete example.".to_string()),
        };
        let feedback = validate_feedback(raw).unwrap();
        assert_eq!(feedback.rating, 4);
    }

    #[test]
    fn test_validate_rejects_missing_rating() {
        let raw = RawFeedback {
            rating: None,
            feedback: Some("Critique".to_string()),
        };
        assert!(matches!(
            validate_feedback(raw),
            Err(AppError::IncompleteFeedback(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_feedback() {
        let raw = RawFeedback {
            rating: Some(3),
            feedback: None,
        };
        assert!(matches!(
            validate_feedback(raw),
            Err(AppError::IncompleteFeedback(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_feedback() {
        let raw = RawFeedback {
            rating: Some(3),
            feedback: Some("   ".to_string()),
        };
        assert!(matches!(
            validate_feedback(raw),
            Err(AppError::IncompleteFeedback(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let raw = RawFeedback {
            rating: Some(9),
            feedback: Some("Critique".to_string()),
        };
        assert!(matches!(
            validate_feedback(raw),
            Err(AppError::IncompleteFeedback(_))
        ));
    }

    #[test]
    fn test_raw_feedback_tolerates_missing_fields_in_json() {
        let raw: RawFeedback = serde_json::from_str(r#"{"rating": 5}"#).unwrap();
        assert_eq!(raw.rating, Some(5));
        assert!(raw.feedback.is_none());
    }
}
