//! Random question and round generation.
//!
//! Every function takes the random source explicitly so callers (and tests)
//! decide between a thread-local generator and a seeded one.

use rand::Rng;

use crate::model::{Direction, Interval, Note, Question};

/// Questions in a round unless configured otherwise.
pub const DEFAULT_QUIZ_LENGTH: usize = 10;

/// Picks an interval and a root uniformly, then flips a fair coin for the direction.
pub fn generate_question<R: Rng>(rng: &mut R) -> Question {
    let interval = Interval::ALL[rng.random_range(0..Interval::ALL.len())];
    let root = Note::ALL[rng.random_range(0..Note::ALL.len())];
    let direction = if rng.random_bool(0.5) {
        Direction::Forward
    } else {
        Direction::Reverse
    };
    Question::new(interval, root, direction)
}

/// Generates `count` independent questions. Repeats are allowed.
pub fn generate_quiz<R: Rng>(rng: &mut R, count: usize) -> Vec<Question> {
    (0..count).map(|_| generate_question(rng)).collect()
}
