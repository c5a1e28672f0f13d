//! Interview Runner — the per-session state machine.
//!
//! Phases: AwaitingWebcam → Ready → Recording → Scoring → Ready … → Ended.
//! Scoring always returns to Ready, whether or not the scorer succeeded.
//! Navigation is only allowed from Ready and is clamped to the question
//! bounds; ending requires an explicit confirmation step.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Where a session's runtime currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingWebcam,
    Ready,
    Recording,
    Scoring,
    Ended,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while in phase {phase:?}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("end must be requested before it can be confirmed")]
    EndNotRequested,
}

/// Navigation direction between questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// One session's runtime state. Pure state; persistence and scoring happen
/// in the handlers around it.
#[derive(Debug)]
pub struct Runner {
    question_count: usize,
    current_question: usize,
    phase: Phase,
    answered: Vec<bool>,
    end_requested: bool,
}

impl Runner {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            current_question: 0,
            phase: Phase::AwaitingWebcam,
            answered: vec![false; question_count],
            end_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn answered(&self) -> &[bool] {
        &self.answered
    }

    pub fn end_requested(&self) -> bool {
        self.end_requested
    }

    /// AwaitingWebcam → Ready. Enabling again once Ready is a no-op.
    pub fn enable_webcam(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::AwaitingWebcam => {
                self.phase = Phase::Ready;
                Ok(())
            }
            Phase::Ready => Ok(()),
            phase => Err(TransitionError::InvalidPhase {
                action: "enable webcam",
                phase,
            }),
        }
    }

    /// Ready → Recording. Re-recording an already answered question is
    /// allowed; the stored answer is overwritten when scoring succeeds.
    pub fn start_recording(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Ready {
            return Err(TransitionError::InvalidPhase {
                action: "start recording",
                phase: self.phase,
            });
        }
        self.phase = Phase::Recording;
        Ok(())
    }

    /// Recording → Scoring.
    pub fn begin_scoring(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Recording {
            return Err(TransitionError::InvalidPhase {
                action: "stop recording",
                phase: self.phase,
            });
        }
        self.phase = Phase::Scoring;
        Ok(())
    }

    /// Scoring → Ready, on scorer success and failure alike. Only a
    /// persisted answer marks the question as answered.
    pub fn finish_scoring(&mut self, persisted: bool) -> Result<(), TransitionError> {
        if self.phase != Phase::Scoring {
            return Err(TransitionError::InvalidPhase {
                action: "finish scoring",
                phase: self.phase,
            });
        }
        if persisted {
            self.answered[self.current_question] = true;
        }
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Moves the question index, clamped to [0, question_count - 1].
    /// At a bound the move is a no-op, mirroring the disabled nav buttons.
    pub fn navigate(&mut self, direction: Direction) -> Result<usize, TransitionError> {
        if self.phase != Phase::Ready {
            return Err(TransitionError::InvalidPhase {
                action: "navigate",
                phase: self.phase,
            });
        }
        self.end_requested = false;
        match direction {
            Direction::Next => {
                if self.current_question + 1 < self.question_count {
                    self.current_question += 1;
                }
            }
            Direction::Previous => {
                self.current_question = self.current_question.saturating_sub(1);
            }
        }
        Ok(self.current_question)
    }

    /// First step of ending: records the request, awaiting confirmation.
    pub fn request_end(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Ready {
            return Err(TransitionError::InvalidPhase {
                action: "end interview",
                phase: self.phase,
            });
        }
        self.end_requested = true;
        Ok(())
    }

    /// Second step: Ready → Ended, only after `request_end`.
    pub fn confirm_end(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Ready {
            return Err(TransitionError::InvalidPhase {
                action: "confirm end",
                phase: self.phase,
            });
        }
        if !self.end_requested {
            return Err(TransitionError::EndNotRequested);
        }
        self.phase = Phase::Ended;
        Ok(())
    }

    pub fn cancel_end(&mut self) {
        self.end_requested = false;
    }
}

/// In-process registry of live runtimes, keyed by session id. Each runner
/// has its own lock so a slow scoring call for one session does not block
/// the others; it also serializes double submissions for the same session.
#[derive(Clone, Default)]
pub struct RunnerRegistry {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<Runner>>>>>,
}

impl RunnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a runtime for a session.
    pub async fn start(&self, mock_id: Uuid, question_count: usize) -> Arc<Mutex<Runner>> {
        let runner = Arc::new(Mutex::new(Runner::new(question_count)));
        self.inner.lock().await.insert(mock_id, runner.clone());
        runner
    }

    pub async fn get(&self, mock_id: Uuid) -> Option<Arc<Mutex<Runner>>> {
        self.inner.lock().await.get(&mock_id).cloned()
    }

    /// Drops a session's runtime, if any. Called when an interview is
    /// confirmed ended or its session is deleted, so the registry does not
    /// accumulate dead runtimes.
    pub async fn remove(&self, mock_id: Uuid) {
        self.inner.lock().await.remove(&mock_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_runner(count: usize) -> Runner {
        let mut runner = Runner::new(count);
        runner.enable_webcam().unwrap();
        runner
    }

    #[test]
    fn test_starts_awaiting_webcam() {
        let runner = Runner::new(7);
        assert_eq!(runner.phase(), Phase::AwaitingWebcam);
        assert_eq!(runner.current_question(), 0);
    }

    #[test]
    fn test_enable_webcam_reaches_ready_and_is_idempotent() {
        let mut runner = Runner::new(7);
        runner.enable_webcam().unwrap();
        assert_eq!(runner.phase(), Phase::Ready);
        runner.enable_webcam().unwrap();
        assert_eq!(runner.phase(), Phase::Ready);
    }

    #[test]
    fn test_record_score_cycle_marks_question_answered() {
        let mut runner = ready_runner(3);
        runner.start_recording().unwrap();
        runner.begin_scoring().unwrap();
        runner.finish_scoring(true).unwrap();
        assert_eq!(runner.phase(), Phase::Ready);
        assert_eq!(runner.answered(), &[true, false, false]);
    }

    #[test]
    fn test_failed_scoring_returns_to_ready_without_marking() {
        let mut runner = ready_runner(3);
        runner.start_recording().unwrap();
        runner.begin_scoring().unwrap();
        runner.finish_scoring(false).unwrap();
        assert_eq!(runner.phase(), Phase::Ready);
        assert_eq!(runner.answered(), &[false, false, false]);
    }

    #[test]
    fn test_cannot_record_before_webcam() {
        let mut runner = Runner::new(3);
        let err = runner.start_recording().unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidPhase {
                action: "start recording",
                phase: Phase::AwaitingWebcam,
            }
        );
    }

    #[test]
    fn test_cannot_record_while_scoring() {
        let mut runner = ready_runner(3);
        runner.start_recording().unwrap();
        runner.begin_scoring().unwrap();
        assert!(runner.start_recording().is_err());
    }

    #[test]
    fn test_navigation_clamps_at_both_bounds() {
        let mut runner = ready_runner(2);
        assert_eq!(runner.navigate(Direction::Previous).unwrap(), 0);
        assert_eq!(runner.navigate(Direction::Next).unwrap(), 1);
        assert_eq!(runner.navigate(Direction::Next).unwrap(), 1);
    }

    #[test]
    fn test_navigation_blocked_while_recording() {
        let mut runner = ready_runner(3);
        runner.start_recording().unwrap();
        assert!(runner.navigate(Direction::Next).is_err());
    }

    #[test]
    fn test_navigation_keeps_answered_state_for_rerecording() {
        let mut runner = ready_runner(2);
        runner.start_recording().unwrap();
        runner.begin_scoring().unwrap();
        runner.finish_scoring(true).unwrap();
        runner.navigate(Direction::Next).unwrap();
        runner.navigate(Direction::Previous).unwrap();
        // Question 0 stays answered; re-recording it is still allowed.
        assert!(runner.answered()[0]);
        assert!(runner.start_recording().is_ok());
    }

    #[test]
    fn test_end_requires_confirmation() {
        let mut runner = ready_runner(3);
        assert_eq!(runner.confirm_end().unwrap_err(), TransitionError::EndNotRequested);
        runner.request_end().unwrap();
        runner.confirm_end().unwrap();
        assert_eq!(runner.phase(), Phase::Ended);
    }

    #[test]
    fn test_navigation_cancels_pending_end_request() {
        let mut runner = ready_runner(3);
        runner.request_end().unwrap();
        runner.navigate(Direction::Next).unwrap();
        assert!(!runner.end_requested());
        assert_eq!(runner.confirm_end().unwrap_err(), TransitionError::EndNotRequested);
    }

    #[test]
    fn test_no_transitions_after_end() {
        let mut runner = ready_runner(1);
        runner.request_end().unwrap();
        runner.confirm_end().unwrap();
        assert!(runner.start_recording().is_err());
        assert!(runner.navigate(Direction::Next).is_err());
        assert!(runner.request_end().is_err());
    }

    #[tokio::test]
    async fn test_registry_start_replaces_existing_runtime() {
        let registry = RunnerRegistry::new();
        let mock_id = Uuid::new_v4();

        let first = registry.start(mock_id, 3).await;
        first.lock().await.enable_webcam().unwrap();

        registry.start(mock_id, 3).await;
        let current = registry.get(mock_id).await.unwrap();
        assert_eq!(current.lock().await.phase(), Phase::AwaitingWebcam);
    }

    #[tokio::test]
    async fn test_registry_get_unknown_session() {
        let registry = RunnerRegistry::new();
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_registry_remove_evicts_runtime() {
        let registry = RunnerRegistry::new();
        let mock_id = Uuid::new_v4();
        registry.start(mock_id, 3).await;

        registry.remove(mock_id).await;
        assert!(registry.get(mock_id).await.is_none());

        // Removing an absent entry is a no-op.
        registry.remove(mock_id).await;
    }
}
