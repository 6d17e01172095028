use rand::Rng;

use mutranier_core::generate_quiz;
use mutranier_core::model::{Question, normalize_note};

use super::progress::RoundProgress;
use crate::error::RoundError;

/// Where the round is between user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for an answer to the current question.
    Answering,
    /// Current question is answered; feedback is on screen.
    Feedback { correct: bool },
    /// Every question has been answered.
    Finished,
}

//
// ─── ROUND STATE ───────────────────────────────────────────────────────────────
//

/// Explicit state of a quiz round.
///
/// Transitions never mutate in place: each returns the next state, leaving the
/// old one untouched, so a rejected input simply keeps the previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    phase: RoundPhase,
}

impl RoundState {
    /// # Errors
    ///
    /// Returns `RoundError::Empty` if no questions are provided.
    pub fn new(questions: Vec<Question>) -> Result<Self, RoundError> {
        if questions.is_empty() {
            return Err(RoundError::Empty);
        }

        Ok(Self {
            questions,
            current: 0,
            score: 0,
            phase: RoundPhase::Answering,
        })
    }

    /// Generates `count` fresh questions from `rng` and starts a round on them.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::Empty` when `count` is zero.
    pub fn generate<R: Rng>(rng: &mut R, count: usize) -> Result<Self, RoundError> {
        Self::new(generate_quiz(rng, count))
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based position of the question being asked (or just answered).
    #[must_use]
    pub fn index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == RoundPhase::Finished
    }

    /// The question on screen; `None` once the round is finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        let answered = self.questions.iter().filter(|q| q.is_answered()).count();
        RoundProgress {
            total: self.questions.len(),
            answered,
            remaining: self.questions.len() - answered,
            is_complete: self.is_finished(),
        }
    }

    /// Scores `input` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::InvalidNote` when the input is not a note; the caller
    /// should re-prompt, the current question stays open.
    /// Returns `RoundError::AwaitingAdvance` or `RoundError::Finished` when no
    /// question is waiting for an answer.
    pub fn submit_answer(&self, input: &str) -> Result<Self, RoundError> {
        match self.phase {
            RoundPhase::Answering => {}
            RoundPhase::Feedback { .. } => return Err(RoundError::AwaitingAdvance),
            RoundPhase::Finished => return Err(RoundError::Finished),
        }

        let given = normalize_note(input).ok_or_else(|| RoundError::InvalidNote {
            input: input.trim().to_string(),
        })?;

        let mut next = self.clone();
        let question = next
            .questions
            .get_mut(next.current)
            .ok_or(RoundError::Finished)?;
        let correct = question.record_answer(given)?;
        if correct {
            next.score = next.score.saturating_add(1);
        }
        next.phase = RoundPhase::Feedback { correct };
        Ok(next)
    }

    /// Leaves the feedback screen: moves to the next question or finishes.
    ///
    /// # Errors
    ///
    /// Returns `RoundError::AwaitingAnswer` if the current question is still open,
    /// `RoundError::Finished` if the round is over.
    pub fn advance(&self) -> Result<Self, RoundError> {
        match self.phase {
            RoundPhase::Feedback { .. } => {}
            RoundPhase::Answering => return Err(RoundError::AwaitingAnswer),
            RoundPhase::Finished => return Err(RoundError::Finished),
        }

        let mut next = self.clone();
        if next.current + 1 >= next.questions.len() {
            next.phase = RoundPhase::Finished;
        } else {
            next.current += 1;
            next.phase = RoundPhase::Answering;
        }
        Ok(next)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
