use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Returned when text does not name one of the twelve pitch classes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized note: {raw:?}")]
pub struct NoteParseError {
    pub raw: String,
}

//
// ─── NOTE ─────────────────────────────────────────────────────────────────────
//

/// One of the twelve chromatic pitch classes, always spelled with sharps.
///
/// The discriminant is the position in the chromatic cycle (C = 0, B = 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Number of pitch classes in the chromatic cycle.
pub const NOTE_COUNT: usize = 12;

impl Note {
    /// All notes in chromatic order starting from C.
    pub const ALL: [Note; NOTE_COUNT] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Position of this note in the chromatic cycle (0-11).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the note at `index`, wrapping around the cycle.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % NOTE_COUNT]
    }

    /// Moves `semitones` up (positive) or down (negative) the cycle.
    #[must_use]
    pub fn transpose(self, semitones: i32) -> Self {
        let cycle = NOTE_COUNT as i32;
        let shifted = (self.index() as i32 + semitones).rem_euclid(cycle);
        Self::from_index(shifted as usize)
    }

    /// Canonical sharp spelling, e.g. `"C#"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }

    /// Flat spelling accepted as an input alias, if this note has one.
    #[must_use]
    pub fn flat_alias(self) -> Option<&'static str> {
        match self {
            Note::CSharp => Some("Db"),
            Note::DSharp => Some("Eb"),
            Note::FSharp => Some("Gb"),
            Note::GSharp => Some("Ab"),
            Note::ASharp => Some("Bb"),
            _ => None,
        }
    }

    /// Label for answer pickers: both spellings for black keys (`"C#/Db"`).
    #[must_use]
    pub fn display_label(self) -> String {
        match self.flat_alias() {
            Some(flat) => format!("{}/{flat}", self.name()),
            None => self.name().to_string(),
        }
    }
}

/// Normalizes free-text input into a canonical note.
///
/// Trims and upper-cases the input, then accepts either a sharp spelling or one
/// of the five flat aliases (`Db Eb Gb Ab Bb`). Anything else, including the
/// empty string, yields `None` and should be treated as a validation failure.
#[must_use]
pub fn normalize_note(input: &str) -> Option<Note> {
    let raw = input.trim().to_uppercase();
    if raw.is_empty() {
        return None;
    }

    if let Some(note) = Note::ALL.iter().copied().find(|n| n.name() == raw) {
        return Some(note);
    }

    match raw.as_str() {
        "DB" => Some(Note::CSharp),
        "EB" => Some(Note::DSharp),
        "GB" => Some(Note::FSharp),
        "AB" => Some(Note::GSharp),
        "BB" => Some(Note::ASharp),
        _ => None,
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_note(s).ok_or_else(|| NoteParseError { raw: s.to_string() })
    }
}

impl TryFrom<String> for Note {
    type Error = NoteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.name().to_string()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_flats_case_and_whitespace() {
        assert_eq!(normalize_note("bb"), Some(Note::ASharp));
        assert_eq!(normalize_note("Db"), Some(Note::CSharp));
        assert_eq!(normalize_note(" c "), Some(Note::C));
        assert_eq!(normalize_note("f#"), Some(Note::FSharp));
        assert_eq!(normalize_note("\tEb\n"), Some(Note::DSharp));
    }

    #[test]
    fn rejects_unknown_spellings() {
        assert_eq!(normalize_note("h"), None);
        assert_eq!(normalize_note(""), None);
        assert_eq!(normalize_note("   "), None);
        assert_eq!(normalize_note("Cb"), None);
        assert_eq!(normalize_note("Fb"), None);
        assert_eq!(normalize_note("C##"), None);
        assert_eq!(normalize_note("C4"), None);
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_forms() {
        let inputs = ["c", "C#", "db", "Eb", "gB", "ab", "BB", "b", " a# "];
        for input in inputs {
            let once = normalize_note(input).unwrap();
            assert_eq!(normalize_note(once.name()), Some(once), "input {input:?}");
        }
    }

    #[test]
    fn every_canonical_name_round_trips() {
        for note in Note::ALL {
            assert_eq!(normalize_note(note.name()), Some(note));
            assert_eq!(Note::from_index(note.index()), note);
        }
    }

    #[test]
    fn transpose_wraps_in_both_directions() {
        assert_eq!(Note::C.transpose(7), Note::G);
        assert_eq!(Note::A.transpose(4), Note::CSharp);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::E.transpose(-17), Note::B);
        assert_eq!(Note::G.transpose(12), Note::G);
    }

    #[test]
    fn display_labels_include_flat_alias() {
        assert_eq!(Note::C.display_label(), "C");
        assert_eq!(Note::CSharp.display_label(), "C#/Db");
        assert_eq!(Note::ASharp.display_label(), "A#/Bb");
        assert_eq!(Note::E.display_label(), "E");
    }

    #[test]
    fn from_str_reports_raw_input() {
        let err = "X#".parse::<Note>().unwrap_err();
        assert_eq!(err.raw, "X#");
        assert_eq!("gb".parse::<Note>().unwrap(), Note::FSharp);
    }
}
