use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::note::Note;

/// Named semitone distance used in quiz questions.
///
/// Unison and octave are left out on purpose: both map a note onto itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
}

impl Interval {
    /// Every interval a question can ask about.
    pub const ALL: [Interval; 6] = [
        Interval::Second,
        Interval::Third,
        Interval::Fourth,
        Interval::Fifth,
        Interval::Sixth,
        Interval::Seventh,
    ];

    /// Short ordinal name, e.g. `"5th"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Interval::Second => "2nd",
            Interval::Third => "3rd",
            Interval::Fourth => "4th",
            Interval::Fifth => "5th",
            Interval::Sixth => "6th",
            Interval::Seventh => "7th",
        }
    }

    /// Distance in semitones above the root.
    #[must_use]
    pub fn semitones(self) -> u8 {
        match self {
            Interval::Second => 2,
            Interval::Third => 4,
            Interval::Fourth => 5,
            Interval::Fifth => 7,
            Interval::Sixth => 9,
            Interval::Seventh => 11,
        }
    }

    /// The note this interval lands on when stacked above `root`.
    #[must_use]
    pub fn above(self, root: Note) -> Note {
        root.transpose(i32::from(self.semitones()))
    }

    /// The root that `target` is this interval above.
    #[must_use]
    pub fn below(self, target: Note) -> Note {
        target.transpose(-i32::from(self.semitones()))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifth_above_c_is_g() {
        assert_eq!(Interval::Fifth.above(Note::C), Note::G);
        assert_eq!(Interval::Fifth.below(Note::G), Note::C);
    }

    #[test]
    fn above_and_below_are_inverse_for_every_pair() {
        for root in Note::ALL {
            for interval in Interval::ALL {
                let target = interval.above(root);
                let expected = (root.index() + usize::from(interval.semitones())) % 12;
                assert_eq!(target.index(), expected);
                assert_eq!(interval.below(target), root, "{interval} of {root}");
            }
        }
    }

    #[test]
    fn no_interval_maps_a_note_onto_itself() {
        for interval in Interval::ALL {
            assert_ne!(interval.above(Note::D), Note::D);
        }
    }
}
