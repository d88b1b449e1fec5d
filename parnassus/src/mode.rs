// Church modes: turning diatonic steps into sounding pitches.
//
// Validation works purely on step distances, so a composition has no key.
// The exporters need real pitches, though, and this module supplies them:
// a mode (Dorian through Ionian) plus a final pitch class places step 0 on
// the final in a chosen octave and every other step on the mode's scale.
//
// Used by midi.rs and lilypond.rs; configured through `EditorConfig`.

use crate::note::Note;
use serde::{Deserialize, Serialize};

/// The six church modes, each defined by its interval pattern from the final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// D Dorian: D E F G A B C D  (natural minor with raised 6th)
    Dorian,
    /// E Phrygian: E F G A B C D E  (half-step from 1 to 2)
    Phrygian,
    /// F Lydian: F G A B C D E F  (raised 4th)
    Lydian,
    /// G Mixolydian: G A B C D E F G  (major with lowered 7th)
    Mixolydian,
    /// A Aeolian: A B C D E F G A  (natural minor)
    Aeolian,
    /// C Ionian: C D E F G A B C  (major)
    Ionian,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Ionian,
    ];

    /// Semitone offsets from the final to each of the seven scale degrees.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
        }
    }

    /// Parse a lowercase or capitalized mode name.
    pub fn from_name(name: &str) -> Option<Mode> {
        match name.to_lowercase().as_str() {
            "dorian" => Some(Mode::Dorian),
            "phrygian" => Some(Mode::Phrygian),
            "lydian" => Some(Mode::Lydian),
            "mixolydian" => Some(Mode::Mixolydian),
            "aeolian" => Some(Mode::Aeolian),
            "ionian" => Some(Mode::Ionian),
            _ => None,
        }
    }

    /// Conventional final pitch class for the untransposed mode.
    pub fn natural_final(self) -> u8 {
        match self {
            Mode::Dorian => 2,
            Mode::Phrygian => 4,
            Mode::Lydian => 5,
            Mode::Mixolydian => 7,
            Mode::Aeolian => 9,
            Mode::Ionian => 0,
        }
    }
}

/// A mode anchored to a final pitch class and an octave for step 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeInstance {
    pub mode: Mode,
    /// Pitch class of the final (0 = C, 2 = D, 4 = E, etc.)
    pub final_pc: u8,
    /// Octave of step 0 in scientific pitch notation (4 = the middle-C octave).
    pub base_octave: i8,
}

impl ModeInstance {
    pub fn new(mode: Mode, final_pc: u8, base_octave: i8) -> Self {
        ModeInstance {
            mode,
            final_pc: final_pc % 12,
            base_octave,
        }
    }

    /// C Ionian with step 0 on middle C.
    pub fn c_major() -> Self {
        ModeInstance::new(Mode::Ionian, 0, 4)
    }

    /// MIDI pitch of a note, or None if it falls outside 0..=127.
    pub fn pitch_of(&self, note: Note) -> Option<u8> {
        let degree_offset = i64::from(self.mode.intervals()[note.degree() as usize]);
        let octave = i64::from(self.base_octave) + 1 + i64::from(note.octave());
        let pitch = octave * 12 + i64::from(self.final_pc) + degree_offset;
        u8::try_from(pitch).ok().filter(|&p| p <= 127)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_major_steps() {
        let mode = ModeInstance::c_major();
        let pitches: Vec<u8> = (0..8).map(|s| mode.pitch_of(Note::new(s)).unwrap()).collect();
        assert_eq!(pitches, vec![60, 62, 64, 65, 67, 69, 71, 72]);
        assert_eq!(mode.pitch_of(Note::new(-1)), Some(59)); // B3
        assert_eq!(mode.pitch_of(Note::new(-7)), Some(48)); // C3
    }

    #[test]
    fn test_d_dorian_steps() {
        let mode = ModeInstance::new(Mode::Dorian, 2, 4);
        assert_eq!(mode.pitch_of(Note::new(0)), Some(62)); // D4
        assert_eq!(mode.pitch_of(Note::new(2)), Some(65)); // F4
        assert_eq!(mode.pitch_of(Note::new(4)), Some(69)); // A4
        assert_eq!(mode.pitch_of(Note::new(6)), Some(72)); // C5
    }

    #[test]
    fn test_out_of_range_pitches() {
        let mode = ModeInstance::c_major();
        assert_eq!(mode.pitch_of(Note::new(-100)), None);
        assert_eq!(mode.pitch_of(Note::new(100)), None);
        assert_eq!(mode.pitch_of(Note::new(i32::MIN)), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Mode::from_name("Dorian"), Some(Mode::Dorian));
        assert_eq!(Mode::from_name("aeolian"), Some(Mode::Aeolian));
        assert_eq!(Mode::from_name("locrian"), None);
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(&format!("{mode:?}")), Some(mode));
        }
    }
}
