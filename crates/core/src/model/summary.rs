use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single round: {len}")]
    TooManyQuestions { len: usize },

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { total: u32, correct: u32 },

    #[error("active time cannot be negative: {0} ms")]
    NegativeElapsed(i64),
}

/// Aggregate result of a finished quiz round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
    elapsed_ms: i64,
}

impl RoundSummary {
    /// # Errors
    ///
    /// Returns `RoundSummaryError` when the counts or timestamps are inconsistent.
    pub fn new(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        correct: u32,
        elapsed_ms: i64,
    ) -> Result<Self, RoundSummaryError> {
        if completed_at < started_at {
            return Err(RoundSummaryError::InvalidTimeRange);
        }
        if correct > total {
            return Err(RoundSummaryError::CountMismatch { total, correct });
        }
        if elapsed_ms < 0 {
            return Err(RoundSummaryError::NegativeElapsed(elapsed_ms));
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            correct,
            elapsed_ms,
        })
    }

    /// Build a summary by scoring the answered questions of a round.
    ///
    /// Unanswered questions count towards the total but never as correct.
    ///
    /// # Errors
    ///
    /// Returns `RoundSummaryError::TooManyQuestions` if the count does not fit in `u32`,
    /// otherwise the same errors as [`RoundSummary::new`].
    pub fn from_questions(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        questions: &[Question],
        elapsed_ms: i64,
    ) -> Result<Self, RoundSummaryError> {
        let total = u32::try_from(questions.len())
            .map_err(|_| RoundSummaryError::TooManyQuestions {
                len: questions.len(),
            })?;
        let correct = questions
            .iter()
            .filter(|q| q.correct() == Some(true))
            .fold(0_u32, |acc, _| acc.saturating_add(1));

        Self::new(started_at, completed_at, total, correct, elapsed_ms)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Active answering time in milliseconds; feedback pauses are excluded.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }
}
