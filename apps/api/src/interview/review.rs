//! Review Aggregator — the post-interview summary.
//!
//! The average is taken over stored answers only: a question that was never
//! answered has no record and does not shrink the mean. An interview with no
//! stored answers reports 0.0.

use serde::Serialize;

use crate::models::interview::AnswerRow;

#[derive(Debug, Serialize)]
pub struct ReviewSummary {
    pub answers: Vec<AnswerRow>,
    pub average_rating: f64,
}

/// Builds the summary from answers already ordered by question index.
pub fn compute_summary(answers: Vec<AnswerRow>) -> ReviewSummary {
    let average_rating = if answers.is_empty() {
        0.0
    } else {
        answers.iter().map(|a| a.rating as f64).sum::<f64>() / answers.len() as f64
    };

    ReviewSummary {
        answers,
        average_rating,
    }
}
