use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::interval::Interval;
use crate::model::note::Note;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has already been answered")]
    AlreadyAnswered,
}

//
// ─── DIRECTION ────────────────────────────────────────────────────────────────
//

/// Which end of the interval the question gives away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Root is given, the target is asked for.
    Forward,
    /// Target is given, the root is asked for.
    Reverse,
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single interval question.
///
/// Built once per round and answered at most once; the answer fields stay
/// populated so the round can be reviewed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    answer: Note,
    interval: Interval,
    direction: Direction,
    root: Note,
    target: Note,
    user_answer: Option<Note>,
    correct: Option<bool>,
}

impl Question {
    /// Builds a question for `interval` stacked on `root`.
    #[must_use]
    pub fn new(interval: Interval, root: Note, direction: Direction) -> Self {
        let target = interval.above(root);
        let (text, answer) = match direction {
            Direction::Forward => (format!("What is the {interval} of {root}?"), target),
            Direction::Reverse => (format!("{target} is the {interval} of which note?"), root),
        };

        Self {
            text,
            answer,
            interval,
            direction,
            root,
            target,
            user_answer: None,
            correct: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Expected answer in canonical spelling.
    #[must_use]
    pub fn answer(&self) -> Note {
        self.answer
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn root(&self) -> Note {
        self.root
    }

    #[must_use]
    pub fn target(&self) -> Note {
        self.target
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<Note> {
        self.user_answer
    }

    /// `None` until the question has been answered.
    #[must_use]
    pub fn correct(&self) -> Option<bool> {
        self.correct
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.user_answer.is_some()
    }

    /// Records the user's (already normalized) answer and scores it.
    ///
    /// Returns whether the answer matched.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AlreadyAnswered` on a second call.
    pub fn record_answer(&mut self, given: Note) -> Result<bool, QuestionError> {
        if self.is_answered() {
            return Err(QuestionError::AlreadyAnswered);
        }
        let correct = given == self.answer;
        self.user_answer = Some(given);
        self.correct = Some(correct);
        Ok(correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
