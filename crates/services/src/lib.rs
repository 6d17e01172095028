#![forbid(unsafe_code)]

pub mod error;
pub mod rounds;
pub mod ticker;

pub use mutranier_core::Clock;
pub use rounds as round;

pub use error::{RoundError, SessionError};
pub use ticker::TokioTicker;

pub use rounds::{
    AnswerFeedback, QuizLoopService, QuizSession, ReviewItem, RoundPhase, RoundProgress,
    RoundReview, RoundState,
};
