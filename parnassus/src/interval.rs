// Harmonic intervals between two simultaneous notes.
//
// An interval is measured in diatonic steps, 0-indexed: unison = 0,
// second = 1, third = 2, ... seventh = 6, octave = 7. Consonance is judged on
// the step distance reduced modulo the octave, so a twelfth (11) behaves
// like a fifth (4) and a double octave like a unison.
//
//   Perfect:    0, 4        (unison/octave, fifth)
//   Imperfect:  2, 5        (third, sixth)
//   Dissonant:  1, 3, 6     (second, fourth, seventh)
//
// Every voice pair is judged as a two-voice texture, so the fourth is always
// dissonant.
//
// Consumed by `composition.rs` for the outer-interval, consonance and
// parallel-perfect checks.

use crate::note::{Note, STEPS_PER_OCTAVE};
use serde::{Deserialize, Serialize};

/// Consonance class of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consonance {
    Perfect,
    Imperfect,
    Dissonant,
}

impl Consonance {
    pub fn is_consonant(self) -> bool {
        !matches!(self, Consonance::Dissonant)
    }
}

/// Undirected distance between two notes, in diatonic steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    steps: u32,
}

impl Interval {
    /// Interval between two notes. Order does not matter.
    pub fn between(a: Note, b: Note) -> Self {
        Interval {
            steps: a.value().abs_diff(b.value()),
        }
    }

    /// Full (compound) size in steps.
    pub fn steps(self) -> u32 {
        self.steps
    }

    /// Size reduced to within one octave, in 0..7.
    pub fn simple(self) -> u32 {
        self.steps % STEPS_PER_OCTAVE as u32
    }

    pub fn consonance(self) -> Consonance {
        match self.simple() {
            0 | 4 => Consonance::Perfect,
            2 | 5 => Consonance::Imperfect,
            _ => Consonance::Dissonant,
        }
    }

    pub fn is_perfect(self) -> bool {
        self.consonance() == Consonance::Perfect
    }

    /// Conventional 1-based interval number of the simple interval: 1 for a
    /// unison, 5 for a fifth, 8 for an octave (compound octaves included).
    pub fn number(self) -> u32 {
        if self.steps > 0 && self.simple() == 0 {
            8
        } else {
            self.simple() + 1
        }
    }

    /// Generic interval name, e.g. "fifth". Compound intervals are named by
    /// their simple equivalent, except exact octaves.
    pub fn name(self) -> &'static str {
        if self.steps > 0 && self.simple() == 0 {
            return "octave";
        }
        match self.simple() {
            0 => "unison",
            1 => "second",
            2 => "third",
            3 => "fourth",
            4 => "fifth",
            5 => "sixth",
            _ => "seventh",
        }
    }
}

/// Classify the interval sounding between two notes.
pub fn classify(a: Note, b: Note) -> Consonance {
    Interval::between(a, b).consonance()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(step: i32) -> Note {
        Note::new(step)
    }

    #[test]
    fn test_simple_interval_classes() {
        let expected = [
            Consonance::Perfect,   // unison
            Consonance::Dissonant, // second
            Consonance::Imperfect, // third
            Consonance::Dissonant, // fourth
            Consonance::Perfect,   // fifth
            Consonance::Imperfect, // sixth
            Consonance::Dissonant, // seventh
            Consonance::Perfect,   // octave
        ];
        for (steps, class) in expected.iter().enumerate() {
            assert_eq!(classify(n(0), n(steps as i32)), *class, "steps = {steps}");
        }
    }

    #[test]
    fn test_only_dissonance_is_not_consonant() {
        assert!(Consonance::Perfect.is_consonant());
        assert!(Consonance::Imperfect.is_consonant());
        assert!(!Consonance::Dissonant.is_consonant());
    }

    #[test]
    fn test_compound_intervals_reduce_by_octave() {
        assert_eq!(classify(n(0), n(11)), Consonance::Perfect); // twelfth
        assert_eq!(classify(n(0), n(9)), Consonance::Imperfect); // tenth
        assert_eq!(classify(n(0), n(8)), Consonance::Dissonant); // ninth
        assert_eq!(classify(n(0), n(14)), Consonance::Perfect); // double octave
    }

    #[test]
    fn test_classification_is_symmetric() {
        for a in -10..10 {
            for b in -10..10 {
                assert_eq!(classify(n(a), n(b)), classify(n(b), n(a)));
            }
        }
    }

    #[test]
    fn test_negative_steps() {
        // -3 to 1 is four steps: a fifth.
        assert_eq!(Interval::between(n(-3), n(1)).steps(), 4);
        assert_eq!(classify(n(-3), n(1)), Consonance::Perfect);
        assert_eq!(classify(n(-7), n(-5)), Consonance::Imperfect);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let iv = Interval::between(n(i32::MIN), n(i32::MAX));
        assert_eq!(iv.steps(), u32::MAX);
        // u32::MAX = 4294967295 = 7 * 613566756 + 3, a fourth.
        assert_eq!(iv.consonance(), Consonance::Dissonant);
    }

    #[test]
    fn test_names() {
        assert_eq!(Interval::between(n(0), n(0)).name(), "unison");
        assert_eq!(Interval::between(n(0), n(7)).name(), "octave");
        assert_eq!(Interval::between(n(2), n(-2)).name(), "fifth");
        assert_eq!(Interval::between(n(0), n(9)).name(), "third");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(Interval::between(n(3), n(3)).number(), 1);
        assert_eq!(Interval::between(n(0), n(4)).number(), 5);
        assert_eq!(Interval::between(n(0), n(7)).number(), 8);
        assert_eq!(Interval::between(n(0), n(14)).number(), 8);
        assert_eq!(Interval::between(n(0), n(12)).number(), 6);
    }
}
