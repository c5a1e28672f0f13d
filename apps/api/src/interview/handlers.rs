//! Axum route handlers for the interview API: session CRUD, the runner
//! endpoints, scoring orchestration, and the review summary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::scorer;
use crate::interview::review::{compute_summary, ReviewSummary};
use crate::interview::runner::{Direction, Runner, TransitionError};
use crate::interview::store::{NewSession, UpsertAnswer};
use crate::models::interview::{GeneratedQuestion, InterviewRow};
use crate::questions::generator::{generate_questions, JobDetails};
use crate::state::AppState;

const FALLBACK_EMAIL: &str = "unknown@example.com";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub job_position: String,
    pub job_description: String,
    pub job_experience: String,
    #[serde(default)]
    pub extra_info: String,
    pub created_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateInterviewResponse {
    pub mock_id: Uuid,
    pub question_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreatedByQuery {
    pub created_by: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewDetailResponse {
    pub interview: InterviewRow,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Serialize)]
pub struct RunnerStatus {
    pub phase: crate::interview::runner::Phase,
    pub current_question: usize,
    pub question_count: usize,
    pub answered: Vec<bool>,
    pub end_requested: bool,
}

impl RunnerStatus {
    fn from_runner(runner: &Runner) -> Self {
        Self {
            phase: runner.phase(),
            current_question: runner.current_question(),
            question_count: runner.question_count(),
            answered: runner.answered().to_vec(),
            end_requested: runner.end_requested(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StopRecordingRequest {
    pub transcript: String,
    pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub question_index: usize,
    pub rating: i32,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct EndRequest {
    #[serde(default)]
    pub confirm: bool,
    /// Withdraws a pending end request (the modal's Cancel button).
    #[serde(default)]
    pub cancel: bool,
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session CRUD
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Generates the question set for the given job details, then persists the
/// session. The question list is frozen at this point.
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(request): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<CreateInterviewResponse>), AppError> {
    for (field, value) in [
        ("job_position", &request.job_position),
        ("job_description", &request.job_description),
        ("job_experience", &request.job_experience),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }

    let questions = generate_questions(
        JobDetails {
            job_position: &request.job_position,
            job_description: &request.job_description,
            job_experience: &request.job_experience,
            extra_info: &request.extra_info,
        },
        &state.llm,
    )
    .await?;

    let questions_json = serde_json::to_string(&questions)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize questions: {e}")))?;

    let mock_id = Uuid::new_v4();
    state
        .store
        .create_session(NewSession {
            mock_id,
            job_position: request.job_position,
            job_description: request.job_description,
            job_experience: request.job_experience,
            questions_json,
            created_by: request.created_by.unwrap_or_else(|| FALLBACK_EMAIL.to_string()),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateInterviewResponse {
            mock_id,
            question_count: questions.len(),
        }),
    ))
}

/// GET /api/v1/interviews?created_by=…
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<CreatedByQuery>,
) -> Result<Json<Vec<InterviewRow>>, AppError> {
    let sessions = state.store.list_sessions(&params.created_by).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<InterviewDetailResponse>, AppError> {
    let interview = require_session(&state, mock_id).await?;
    let questions = interview
        .questions()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored question set is corrupt: {e}")))?;

    Ok(Json(InterviewDetailResponse {
        interview,
        questions,
    }))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_session(mock_id).await?;
    // Any live runtime for the session goes with it.
    state.runners.remove(mock_id).await;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Runner endpoints
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/:id/runner
///
/// Starts (or restarts) a runtime for the session. A restart discards any
/// in-flight runtime state; stored answers are unaffected.
pub async fn handle_start_runner(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<RunnerStatus>, AppError> {
    let interview = require_session(&state, mock_id).await?;
    let questions = interview
        .questions()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored question set is corrupt: {e}")))?;

    let runner = state.runners.start(mock_id, questions.len()).await;
    let runner = runner.lock().await;
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

/// GET /api/v1/interviews/:id/runner
pub async fn handle_runner_status(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<RunnerStatus>, AppError> {
    let runner = require_runner(&state, mock_id).await?;
    let runner = runner.lock().await;
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

/// POST /api/v1/interviews/:id/runner/webcam
pub async fn handle_enable_webcam(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<RunnerStatus>, AppError> {
    let runner = require_runner(&state, mock_id).await?;
    let mut runner = runner.lock().await;
    runner.enable_webcam()?;
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

/// POST /api/v1/interviews/:id/runner/record
pub async fn handle_start_recording(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<RunnerStatus>, AppError> {
    let runner = require_runner(&state, mock_id).await?;
    let mut runner = runner.lock().await;
    runner.start_recording()?;
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

/// POST /api/v1/interviews/:id/runner/stop
///
/// Ends the recording, scores the transcript against the current question,
/// and persists the answer. The runtime returns to Ready whether or not
/// scoring succeeded; on failure nothing is persisted and any previously
/// stored answer for the question survives.
pub async fn handle_stop_recording(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
    Json(request): Json<StopRecordingRequest>,
) -> Result<Json<StopRecordingResponse>, AppError> {
    let interview = require_session(&state, mock_id).await?;
    let questions = interview
        .questions()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored question set is corrupt: {e}")))?;

    let runner = require_runner(&state, mock_id).await?;
    // Hold the session lock through scoring so a double submission for the
    // same session serializes instead of racing.
    let mut runner = runner.lock().await;

    runner.begin_scoring()?;
    let question_index = runner.current_question();

    let transcript = request.transcript.trim();
    if transcript.is_empty() {
        runner.finish_scoring(false)?;
        return Err(AppError::Validation("transcript is empty".to_string()));
    }

    let question = match questions.get(question_index) {
        Some(question) => question,
        None => {
            // Runtime index out of sync with the stored set; recover to Ready
            // rather than stranding the runtime in Scoring.
            runner.finish_scoring(false)?;
            return Err(AppError::Internal(anyhow::anyhow!(
                "question index {question_index} out of range"
            )));
        }
    };

    let feedback = match scorer::score(&question.question, transcript, &state.llm).await {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!("Scoring failed for interview {mock_id} question {question_index}: {e}");
            runner.finish_scoring(false)?;
            return Err(e);
        }
    };

    let upsert = state
        .store
        .upsert_answer(UpsertAnswer {
            mock_id,
            question_index: question_index as i32,
            question: question.question.clone(),
            user_answer: transcript.to_string(),
            feedback: feedback.feedback.clone(),
            rating: feedback.rating,
            user_email: request
                .user_email
                .unwrap_or_else(|| FALLBACK_EMAIL.to_string()),
        })
        .await;

    match upsert {
        Ok(_) => {
            runner.finish_scoring(true)?;
            Ok(Json(StopRecordingResponse {
                question_index,
                rating: feedback.rating,
                feedback: feedback.feedback,
            }))
        }
        Err(e) => {
            warn!("Persisting answer failed for interview {mock_id}: {e}");
            runner.finish_scoring(false)?;
            Err(e)
        }
    }
}

/// POST /api/v1/interviews/:id/runner/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<RunnerStatus>, AppError> {
    let runner = require_runner(&state, mock_id).await?;
    let mut runner = runner.lock().await;
    runner.navigate(request.direction)?;
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

/// POST /api/v1/interviews/:id/runner/end
///
/// Two-step: a call without `confirm` records the end request; a confirming
/// call moves the runtime to Ended. Answers are frozen after that. `cancel`
/// withdraws a pending request instead.
pub async fn handle_end_interview(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
    Json(request): Json<EndRequest>,
) -> Result<Json<RunnerStatus>, AppError> {
    let runner = require_runner(&state, mock_id).await?;
    let mut runner = runner.lock().await;
    if request.cancel {
        runner.cancel_end();
    } else if request.confirm {
        runner.confirm_end()?;
        let status = RunnerStatus::from_runner(&runner);
        drop(runner);
        // An Ended runtime takes no further transitions; evict it so the
        // registry holds live sessions only. The review endpoint serves
        // everything needed afterwards.
        state.runners.remove(mock_id).await;
        return Ok(Json(status));
    } else {
        runner.request_end()?;
    }
    Ok(Json(RunnerStatus::from_runner(&runner)))
}

// ────────────────────────────────────────────────────────────────────────────
// Review
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/interviews/:id/review
pub async fn handle_review(
    State(state): State<AppState>,
    Path(mock_id): Path<Uuid>,
) -> Result<Json<ReviewSummary>, AppError> {
    require_session(&state, mock_id).await?;
    let answers = state.store.list_answers(mock_id).await?;
    Ok(Json(compute_summary(answers)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn require_session(state: &AppState, mock_id: Uuid) -> Result<InterviewRow, AppError> {
    state
        .store
        .get_session(mock_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {mock_id} not found")))
}

async fn require_runner(
    state: &AppState,
    mock_id: Uuid,
) -> Result<std::sync::Arc<tokio::sync::Mutex<Runner>>, AppError> {
    state.runners.get(mock_id).await.ok_or_else(|| {
        AppError::NotFound(format!("No active interview runtime for {mock_id}"))
    })
}
