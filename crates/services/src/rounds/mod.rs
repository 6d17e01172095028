mod progress;
mod review;
mod state;
mod workflow;

// Public API of the round subsystem.
pub use crate::error::{RoundError, SessionError};
pub use progress::RoundProgress;
pub use review::{ReviewItem, RoundReview, format_elapsed};
pub use state::{RoundPhase, RoundState};
pub use workflow::{AnswerFeedback, QuizLoopService, QuizSession};
