mod interval;
mod note;
mod question;
mod settings;
mod summary;

pub use interval::Interval;
pub use note::{NOTE_COUNT, Note, NoteParseError, normalize_note};
pub use question::{Direction, Question, QuestionError};
pub use settings::{QuizSettings, QuizSettingsError};
pub use summary::{RoundSummary, RoundSummaryError};
