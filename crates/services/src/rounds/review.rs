use serde::Serialize;

use mutranier_core::model::Note;

use super::state::RoundState;

/// One line of the end-of-round review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    /// One-based question number.
    pub number: usize,
    pub prompt: String,
    pub your_answer: Option<Note>,
    pub expected: Note,
    pub correct: bool,
}

/// Presentation-agnostic review of a round.
///
/// Notes stay typed; only the elapsed time is pre-formatted since every front
/// end shows it the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReview {
    pub items: Vec<ReviewItem>,
    pub score: u32,
    pub total: usize,
    pub elapsed_ms: i64,
    pub elapsed: String,
}

impl RoundReview {
    #[must_use]
    pub fn from_state(state: &RoundState, elapsed_ms: i64) -> Self {
        let items = state
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| ReviewItem {
                number: i + 1,
                prompt: q.text().to_string(),
                your_answer: q.user_answer(),
                expected: q.answer(),
                correct: q.correct() == Some(true),
            })
            .collect::<Vec<_>>();

        Self {
            total: items.len(),
            items,
            score: state.score(),
            elapsed_ms,
            elapsed: format_elapsed(elapsed_ms),
        }
    }

    /// e.g. `"7 / 10 correct"`.
    #[must_use]
    pub fn score_line(&self) -> String {
        format!("{} / {} correct", self.score, self.total)
    }

    #[must_use]
    pub fn mistakes(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter().filter(|item| !item.correct)
    }
}

/// Formats milliseconds as `m:ss`, flooring to whole seconds.
#[must_use]
pub fn format_elapsed(ms: i64) -> String {
    let total_secs = ms.max(0) / 1_000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
