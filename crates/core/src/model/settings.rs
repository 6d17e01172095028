use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("question count must be <= {max}, got {got}")]
    TooManyQuestions { got: u32, max: u32 },
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for a quiz round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    question_count: u32,
    show_timer: bool,
}

impl QuizSettings {
    /// Questions per round when nothing else is configured.
    pub const DEFAULT_QUESTION_COUNT: u32 = 10;

    /// Upper bound on questions per round.
    pub const MAX_QUESTION_COUNT: u32 = 500;

    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError` if `question_count` is zero or above
    /// `MAX_QUESTION_COUNT`.
    pub fn new(question_count: u32, show_timer: bool) -> Result<Self, QuizSettingsError> {
        if question_count == 0 {
            return Err(QuizSettingsError::InvalidQuestionCount);
        }
        if question_count > Self::MAX_QUESTION_COUNT {
            return Err(QuizSettingsError::TooManyQuestions {
                got: question_count,
                max: Self::MAX_QUESTION_COUNT,
            });
        }

        Ok(Self {
            question_count,
            show_timer,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// When false, the round still measures time but nothing is ticked to the display.
    #[must_use]
    pub fn show_timer(&self) -> bool {
        self.show_timer
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: Self::DEFAULT_QUESTION_COUNT,
            show_timer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_has_ten_questions() {
        let settings = QuizSettings::default();
        assert_eq!(settings.question_count(), 10);
        assert!(settings.show_timer());
    }

    #[test]
    fn zero_questions_rejected() {
        let err = QuizSettings::new(0, true).unwrap_err();
        assert_eq!(err, QuizSettingsError::InvalidQuestionCount);
    }

    #[test]
    fn oversized_round_rejected() {
        let err = QuizSettings::new(501, false).unwrap_err();
        assert!(matches!(
            err,
            QuizSettingsError::TooManyQuestions { got: 501, max: 500 }
        ));
        assert!(QuizSettings::new(500, false).is_ok());
    }
}
