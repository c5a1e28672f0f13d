//! Session Store — persistence for interview sessions and answer records.
//!
//! Answers are keyed by (mock_id, question_index) with a unique constraint,
//! so re-answering a question overwrites in place and concurrent submissions
//! for the same question cannot duplicate rows.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{AnswerRow, InterviewRow};

/// Fields for a new interview session. `questions_json` is the serialized
/// generated question set; it never changes after this insert.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub mock_id: Uuid,
    pub job_position: String,
    pub job_description: String,
    pub job_experience: String,
    pub questions_json: String,
    pub created_by: String,
}

/// Fields for storing (or overwriting) one answer.
#[derive(Debug, Clone)]
pub struct UpsertAnswer {
    pub mock_id: Uuid,
    pub question_index: i32,
    pub question: String,
    pub user_answer: String,
    pub feedback: String,
    pub rating: i32,
    pub user_email: String,
}

/// Persistence seam for sessions and answers. The production implementation
/// is Postgres; tests exercise the same contract against in-memory doubles.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: NewSession) -> Result<InterviewRow, AppError>;

    async fn get_session(&self, mock_id: Uuid) -> Result<Option<InterviewRow>, AppError>;

    async fn list_sessions(&self, created_by: &str) -> Result<Vec<InterviewRow>, AppError>;

    /// Deletes a session and its answers. The purge runs as two sequential
    /// deletes (answers first), so a failure between them is observable.
    async fn delete_session(&self, mock_id: Uuid) -> Result<(), AppError>;

    async fn upsert_answer(&self, answer: UpsertAnswer) -> Result<AnswerRow, AppError>;

    /// Returns all answers for a session ordered by question index.
    async fn list_answers(&self, mock_id: Uuid) -> Result<Vec<AnswerRow>, AppError>;
}

/// PostgreSQL-backed store.
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(&self, session: NewSession) -> Result<InterviewRow, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO mock_interviews
                (mock_id, job_position, job_description, job_experience, questions_json, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(session.mock_id)
        .bind(&session.job_position)
        .bind(&session.job_description)
        .bind(&session.job_experience)
        .bind(&session.questions_json)
        .bind(&session.created_by)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created interview {} for {}",
            session.mock_id, session.created_by
        );

        Ok(row)
    }

    async fn get_session(&self, mock_id: Uuid) -> Result<Option<InterviewRow>, AppError> {
        Ok(
            sqlx::query_as::<_, InterviewRow>("SELECT * FROM mock_interviews WHERE mock_id = $1")
                .bind(mock_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_sessions(&self, created_by: &str) -> Result<Vec<InterviewRow>, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM mock_interviews WHERE created_by = $1 ORDER BY created_at DESC",
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_session(&self, mock_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_answers WHERE mock_id = $1")
            .bind(mock_id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM mock_interviews WHERE mock_id = $1")
            .bind(mock_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Interview {mock_id} not found")));
        }

        info!("Deleted interview {mock_id} and its answers");
        Ok(())
    }

    async fn upsert_answer(&self, answer: UpsertAnswer) -> Result<AnswerRow, AppError> {
        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO user_answers
                (mock_id, question_index, question, user_answer, feedback, rating, user_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (mock_id, question_index) DO UPDATE SET
                user_answer = EXCLUDED.user_answer,
                feedback = EXCLUDED.feedback,
                rating = EXCLUDED.rating,
                user_email = EXCLUDED.user_email
            RETURNING *
            "#,
        )
        .bind(answer.mock_id)
        .bind(answer.question_index)
        .bind(&answer.question)
        .bind(&answer.user_answer)
        .bind(&answer.feedback)
        .bind(answer.rating)
        .bind(&answer.user_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_answers(&self, mock_id: Uuid) -> Result<Vec<AnswerRow>, AppError> {
        Ok(sqlx::query_as::<_, AnswerRow>(
            "SELECT * FROM user_answers WHERE mock_id = $1 ORDER BY question_index ASC",
        )
        .bind(mock_id)
        .fetch_all(&self.pool)
        .await?)
    }
}


#[cfg(test)]
mod tests {
    use super::doubles::MemoryStore;
    use super::*;

    fn new_session(mock_id: Uuid) -> NewSession {
        NewSession {
            mock_id,
            job_position: "Full Stack Developer".to_string(),
            job_description: "React, NodeJs, MySQL".to_string(),
            job_experience: "3".to_string(),
            questions_json: r#"[{"question":"What is REST?","answer":"An architectural style."}]"#
                .to_string(),
            created_by: "user@example.com".to_string(),
        }
    }

    fn answer(mock_id: Uuid, index: i32, text: &str, rating: i32) -> UpsertAnswer {
        UpsertAnswer {
            mock_id,
            question_index: index,
            question: format!("Question {index}"),
            user_answer: text.to_string(),
            feedback: "Add an example.".to_string(),
            rating,
            user_email: "user@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_question_set() {
        let store = MemoryStore::new();
        let mock_id = Uuid::new_v4();
        store.create_session(new_session(mock_id)).await.unwrap();

        let fetched = store.get_session(mock_id).await.unwrap().unwrap();
        let questions = fetched.questions().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is REST?");
    }

    #[tokio::test]
    async fn test_list_sessions_scoped_to_owner() {
        let store = MemoryStore::new();
        store
            .create_session(new_session(Uuid::new_v4()))
            .await
            .unwrap();
        let mut other = new_session(Uuid::new_v4());
        other.created_by = "someone.else@example.com".to_string();
        store.create_session(other).await.unwrap();

        let mine = store.list_sessions("user@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_record_with_second_values() {
        let store = MemoryStore::new();
        let mock_id = Uuid::new_v4();
        store
            .upsert_answer(answer(mock_id, 0, "first attempt", 2))
            .await
            .unwrap();
        store
            .upsert_answer(answer(mock_id, 0, "second attempt", 4))
            .await
            .unwrap();

        let answers = store.list_answers(mock_id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].user_answer, "second attempt");
        assert_eq!(answers[0].rating, 4);
    }

    #[tokio::test]
    async fn test_upsert_distinct_indexes_creates_distinct_records() {
        let store = MemoryStore::new();
        let mock_id = Uuid::new_v4();
        store.upsert_answer(answer(mock_id, 0, "a", 3)).await.unwrap();
        store.upsert_answer(answer(mock_id, 1, "b", 5)).await.unwrap();

        let answers = store.list_answers(mock_id).await.unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].question_index, 0);
        assert_eq!(answers[1].question_index, 1);
    }

    #[tokio::test]
    async fn test_delete_session_purges_answers() {
        let store = MemoryStore::new();
        let mock_id = Uuid::new_v4();
        store.create_session(new_session(mock_id)).await.unwrap();
        store.upsert_answer(answer(mock_id, 0, "a", 3)).await.unwrap();

        store.delete_session(mock_id).await.unwrap();

        assert!(store.get_session(mock_id).await.unwrap().is_none());
        assert!(store.list_answers(mock_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_session_missing_is_not_found() {
        let store = MemoryStore::new();
        let result = store.delete_session(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_delete_failure_leaves_observable_state() {
        let store = MemoryStore::new();
        let mock_id = Uuid::new_v4();
        store.create_session(new_session(mock_id)).await.unwrap();
        store.upsert_answer(answer(mock_id, 0, "a", 3)).await.unwrap();

        store.fail_next_session_delete();
        assert!(store.delete_session(mock_id).await.is_err());

        // Answers were purged in phase 1, the session row survived phase 2.
        assert!(store.list_answers(mock_id).await.unwrap().is_empty());
        assert!(store.get_session(mock_id).await.unwrap().is_some());
    }
}
