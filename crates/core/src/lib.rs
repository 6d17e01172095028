#![forbid(unsafe_code)]

pub mod generator;
pub mod model;
pub mod time;
pub mod timer;

pub use generator::{DEFAULT_QUIZ_LENGTH, generate_question, generate_quiz};
pub use model::{Note, normalize_note};
pub use time::Clock;
pub use timer::{ActiveTimer, ManualTicker, TickCallback, TickWork, Ticker, TimerPhase};
