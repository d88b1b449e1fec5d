// Notes: the leaf value of a composition.
//
// A note is a single diatonic scale position, counted in steps above (or
// below, when negative) a reference degree. Step 0 is the reference, step 7
// the same degree one octave up. No accidentals, no durations: first-species
// counterpoint places one note per time step, so pitch is all there is.
//
// Mapping steps to sounding pitches is the exporters' concern (see
// `mode.rs`); the validation rules only ever look at step differences.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of diatonic steps in an octave.
pub const STEPS_PER_OCTAVE: i32 = 7;

/// 1-based degree labels for the seven step classes.
const STEP_NAMES: [&str; 7] = ["1", "2", "3", "4", "5", "6", "7"];

/// A single pitched scale position. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Note(i32);

impl Note {
    pub const fn new(step: i32) -> Self {
        Note(step)
    }

    /// Diatonic steps above the reference (negative = below).
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Step class within the octave, always in 0..7.
    pub fn degree(self) -> u8 {
        self.0.rem_euclid(STEPS_PER_OCTAVE) as u8
    }

    /// Octave offset from the reference octave (floor division, so step -1
    /// is in octave -1).
    pub fn octave(self) -> i32 {
        self.0.div_euclid(STEPS_PER_OCTAVE)
    }
}

impl From<i32> for Note {
    fn from(step: i32) -> Self {
        Note(step)
    }
}

/// Renders as scale degree plus octave, e.g. `5` for step 4 and `3+1` for
/// step 9, `7-1` for step -1.
impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = STEP_NAMES[self.degree() as usize];
        match self.octave() {
            0 => write!(f, "{name}"),
            o if o > 0 => write!(f, "{name}+{o}"),
            o => write!(f, "{name}{o}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_value() {
        assert!(Note::new(-3) < Note::new(0));
        assert!(Note::new(4) > Note::new(2));
        assert_eq!(Note::new(7), Note::from(7));
    }

    #[test]
    fn test_degree_and_octave() {
        assert_eq!(Note::new(0).degree(), 0);
        assert_eq!(Note::new(9).degree(), 2);
        assert_eq!(Note::new(9).octave(), 1);
        assert_eq!(Note::new(-1).degree(), 6);
        assert_eq!(Note::new(-1).octave(), -1);
        assert_eq!(Note::new(-7).octave(), -1);
        assert_eq!(Note::new(-8).octave(), -2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Note::new(4).to_string(), "5");
        assert_eq!(Note::new(9).to_string(), "3+1");
        assert_eq!(Note::new(-1).to_string(), "7-1");
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Note::new(-2)).unwrap();
        assert_eq!(json, "-2");
        let back: Note = serde_json::from_str("11").unwrap();
        assert_eq!(back, Note::new(11));
    }
}
