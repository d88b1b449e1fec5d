// Relative motion of two voices between consecutive time steps.
//
// Given the notes of voices A and B at steps t and t+1, compare the signed
// melodic movement of each voice:
//
//   Oblique   one voice holds its note (or both do)
//   Contrary  the voices move in opposite directions
//   Parallel  same direction, same distance
//   Similar   same direction, different distances
//
// Two voices that both hold are classed Oblique: nothing moves, so nothing
// can move in parallel into the next interval.

use crate::note::Note;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Parallel,
    Similar,
    Contrary,
    Oblique,
}

/// Classify the motion from (`prev_a`, `prev_b`) to (`cur_a`, `cur_b`).
pub fn classify(prev_a: Note, prev_b: Note, cur_a: Note, cur_b: Note) -> Motion {
    // i64 so extreme steps cannot overflow.
    let delta_a = i64::from(cur_a.value()) - i64::from(prev_a.value());
    let delta_b = i64::from(cur_b.value()) - i64::from(prev_b.value());

    if delta_a == 0 || delta_b == 0 {
        Motion::Oblique
    } else if delta_a.signum() != delta_b.signum() {
        Motion::Contrary
    } else if delta_a == delta_b {
        Motion::Parallel
    } else {
        Motion::Similar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(prev: (i32, i32), cur: (i32, i32)) -> Motion {
        classify(
            Note::new(prev.0),
            Note::new(prev.1),
            Note::new(cur.0),
            Note::new(cur.1),
        )
    }

    #[test]
    fn test_parallel() {
        assert_eq!(motion((0, 4), (1, 5)), Motion::Parallel);
        assert_eq!(motion((7, 3), (5, 1)), Motion::Parallel);
    }

    #[test]
    fn test_similar() {
        assert_eq!(motion((0, 4), (1, 7)), Motion::Similar);
        assert_eq!(motion((0, 4), (-3, -1)), Motion::Similar);
    }

    #[test]
    fn test_contrary() {
        assert_eq!(motion((0, 4), (1, 3)), Motion::Contrary);
        assert_eq!(motion((0, 4), (-2, 6)), Motion::Contrary);
    }

    #[test]
    fn test_oblique() {
        assert_eq!(motion((0, 4), (0, 5)), Motion::Oblique);
        assert_eq!(motion((0, 4), (2, 4)), Motion::Oblique);
    }

    #[test]
    fn test_no_motion_is_oblique_not_parallel() {
        for a in -3..3 {
            for b in -3..3 {
                assert_eq!(motion((a, b), (a, b)), Motion::Oblique);
            }
        }
    }

    #[test]
    fn test_extreme_deltas() {
        assert_eq!(motion((i32::MIN, i32::MIN), (i32::MAX, i32::MAX)), Motion::Parallel);
        assert_eq!(motion((i32::MIN, i32::MAX), (i32::MAX, i32::MIN)), Motion::Contrary);
    }
}
