use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One interview attempt: fixed job metadata plus the generated question set.
/// The question list is stored as a JSON-encoded string and never changes
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: i64,
    pub mock_id: Uuid,
    pub job_position: String,
    pub job_description: String,
    pub job_experience: String,
    pub questions_json: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl InterviewRow {
    /// Parses the stored question set. The JSON was validated at creation
    /// time, so a parse failure here means the row was tampered with.
    pub fn questions(&self) -> Result<Vec<GeneratedQuestion>, serde_json::Error> {
        serde_json::from_str(&self.questions_json)
    }
}

/// A single generated interview question with the model's suggested answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub answer: String,
}

/// The persisted answer, feedback, and rating for one question of a session.
/// Keyed by (mock_id, question_index); re-answering overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub id: i64,
    pub mock_id: Uuid,
    pub question_index: i32,
    pub question: String,
    pub user_answer: String,
    pub feedback: String,
    pub rating: i32,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}
