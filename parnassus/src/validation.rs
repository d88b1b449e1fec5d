// Validation outcomes.
//
// `ValidationResult` is the closed outcome of `Composition::validate`: valid,
// or exactly one violated rule. It is a bare status tag with no reference
// back into the composition. The rules are listed in check order, which is
// also the order in which they are reported when several hold at once.
//
// `Violation` is the diagnostic form of the same outcome: the rule plus
// where it was first broken, for front ends that want to point at the
// offending notes.
//
// Turning a result into a user-facing sentence is the front end's job (see
// `main.rs`); nothing here carries display text.

use serde::{Deserialize, Serialize};

/// One of the first-species rules, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Some voice holds fewer notes than the composition length.
    VoiceNotFull,
    /// Some voice pair does not open on a perfect consonance.
    FirstIntervalNotPerfect,
    /// Some voice pair does not close on a perfect consonance.
    LastIntervalNotPerfect,
    /// Some voice pair sounds a dissonance.
    NotAllIntervalsConsonant,
    /// Some voice pair moves in parallel into a perfect consonance.
    ParallelToPerfect,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::VoiceNotFull,
        ViolationKind::FirstIntervalNotPerfect,
        ViolationKind::LastIntervalNotPerfect,
        ViolationKind::NotAllIntervalsConsonant,
        ViolationKind::ParallelToPerfect,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    Invalid(ViolationKind),
}

impl ValidationResult {
    pub fn is_valid(self) -> bool {
        self == ValidationResult::Valid
    }

    pub fn violation(self) -> Option<ViolationKind> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(kind) => Some(kind),
        }
    }
}

impl From<Option<Violation>> for ValidationResult {
    fn from(violation: Option<Violation>) -> Self {
        match violation {
            None => ValidationResult::Valid,
            Some(v) => ValidationResult::Invalid(v.kind),
        }
    }
}

/// Where a rule was first broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// A single voice (fullness).
    Voice { voice: usize },
    /// A voice pair `(lower index, higher index)` at a time step. For
    /// parallel motion the step is the arrival, i.e. the perfect interval.
    Slice { voices: (usize, usize), index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_violation() {
        assert_eq!(ValidationResult::from(None), ValidationResult::Valid);
        let v = Violation {
            kind: ViolationKind::ParallelToPerfect,
            location: Location::Slice { voices: (0, 1), index: 3 },
        };
        let result = ValidationResult::from(Some(v));
        assert!(!result.is_valid());
        assert_eq!(result.violation(), Some(ViolationKind::ParallelToPerfect));
    }

    #[test]
    fn test_kinds_are_ordered_by_check_order() {
        let mut sorted = ViolationKind::ALL;
        sorted.sort();
        assert_eq!(sorted, ViolationKind::ALL);
        assert!(ViolationKind::FirstIntervalNotPerfect < ViolationKind::NotAllIntervalsConsonant);
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_string(&ValidationResult::Invalid(ViolationKind::VoiceNotFull)).unwrap();
        assert_eq!(json, r#"{"Invalid":"VoiceNotFull"}"#);
        let json = serde_json::to_string(&ValidationResult::Valid).unwrap();
        assert_eq!(json, r#""Valid""#);
    }
}
