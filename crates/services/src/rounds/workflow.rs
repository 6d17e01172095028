use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use tracing::{debug, info};

use mutranier_core::model::{Note, QuizSettings, RoundSummary};
use mutranier_core::{ActiveTimer, Ticker};

use super::review::RoundReview;
use super::state::{RoundPhase, RoundState};
use crate::Clock;
use crate::error::{RoundError, SessionError};

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub given: Note,
    pub expected: Note,
    pub is_last: bool,
}

/// Starts quiz rounds with a shared clock and settings.
#[derive(Debug, Clone, Default)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: QuizSettings) -> Self {
        Self { clock, settings }
    }

    /// Builds the service from raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Settings` when the values are out of range.
    pub fn from_config(
        clock: Clock,
        question_count: u32,
        show_timer: bool,
    ) -> Result<Self, SessionError> {
        let settings = QuizSettings::new(question_count, show_timer)?;
        Ok(Self::new(clock, settings))
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Start a round whose timer measures time without notifying anyone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` if no questions could be generated.
    pub fn start_round<R: Rng>(&self, rng: &mut R) -> Result<QuizSession, SessionError> {
        let timer = ActiveTimer::new(self.clock.clone());
        self.start_with_timer(rng, timer)
    }

    /// Start a round that reports elapsed seconds to `on_tick`.
    ///
    /// `ticker` drives the once-per-second notification. Both are ignored when
    /// the settings hide the timer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` if no questions could be generated.
    pub fn start_round_with_display<R, T, F>(
        &self,
        rng: &mut R,
        ticker: T,
        on_tick: F,
    ) -> Result<QuizSession, SessionError>
    where
        R: Rng,
        T: Ticker + 'static,
        F: Fn(u64) + Send + Sync + 'static,
    {
        let timer = ActiveTimer::new(self.clock.clone());
        let timer = if self.settings.show_timer() {
            timer.with_ticker(ticker).with_on_tick(on_tick)
        } else {
            timer
        };
        self.start_with_timer(rng, timer)
    }

    fn start_with_timer<R: Rng>(
        &self,
        rng: &mut R,
        mut timer: ActiveTimer,
    ) -> Result<QuizSession, SessionError> {
        let count = usize::try_from(self.settings.question_count()).unwrap_or(usize::MAX);
        let state = RoundState::generate(rng, count)?;
        let started_at = self.clock.now();
        timer.start();
        debug!(questions = count, "quiz round started");

        Ok(QuizSession {
            clock: self.clock.clone(),
            state,
            timer,
            started_at,
            summary: None,
        })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A round in progress, with its timer wired to the round transitions.
///
/// The timer runs while a question is open and pauses while feedback is shown.
pub struct QuizSession {
    clock: Clock,
    state: RoundState,
    timer: ActiveTimer,
    started_at: DateTime<Utc>,
    summary: Option<RoundSummary>,
}

impl QuizSession {
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.timer.elapsed_ms()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_finished()
    }

    /// Present once the last question has been advanced past.
    #[must_use]
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    /// Score `input` against the current question and pause the timer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` for invalid notes or out-of-order calls;
    /// the session is left as it was.
    pub fn submit_answer(&mut self, input: &str) -> Result<AnswerFeedback, SessionError> {
        let next = self.state.submit_answer(input)?;

        let question = next
            .current_question()
            .ok_or(SessionError::Round(RoundError::Finished))?;
        let given = question
            .user_answer()
            .ok_or(SessionError::Round(RoundError::AwaitingAnswer))?;
        let feedback = AnswerFeedback {
            correct: matches!(next.phase(), RoundPhase::Feedback { correct: true }),
            given,
            expected: question.answer(),
            is_last: next.index() + 1 == next.questions().len(),
        };
        self.timer.end_segment();
        debug!(
            index = next.index(),
            correct = feedback.correct,
            elapsed_ms = self.timer.elapsed_ms(),
            "answer recorded"
        );

        self.state = next;
        Ok(feedback)
    }

    /// Leave the feedback screen. Resumes the timer, or finalizes the round
    /// after the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` if the current question is unanswered or
    /// the round is over, and `SessionError::Summary` if the totals do not add up.
    pub fn next(&mut self) -> Result<RoundPhase, SessionError> {
        let next = self.state.advance()?;

        if next.is_finished() {
            let elapsed_ms = self.timer.finalize();
            let summary = RoundSummary::from_questions(
                self.started_at,
                self.clock.now(),
                next.questions(),
                elapsed_ms,
            )?;
            info!(
                correct = summary.correct(),
                total = summary.total(),
                elapsed_ms,
                "quiz round finished"
            );
            self.summary = Some(summary);
        } else {
            self.timer.begin_segment();
        }

        self.state = next;
        Ok(self.state.phase())
    }

    /// Summary of a finished round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` until the last question has been advanced past.
    pub fn finish(&self) -> Result<RoundSummary, SessionError> {
        self.summary.clone().ok_or(SessionError::Incomplete)
    }

    /// Review of every question so far, with the current active time.
    #[must_use]
    pub fn review(&self) -> RoundReview {
        let elapsed_ms = self
            .summary
            .as_ref()
            .map_or_else(|| self.timer.elapsed_ms(), RoundSummary::elapsed_ms);
        RoundReview::from_state(&self.state, elapsed_ms)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("index", &self.state.index())
            .field("phase", &self.state.phase())
            .field("score", &self.state.score())
            .field("timer", &self.timer)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
