// The composition and its validation engine.
//
// A composition is N voices (N >= 2) that all share the same length L. The
// editor fills voices note by note and may ask for validation at any point,
// complete or not.
//
// Validation runs five first-species checks in a fixed order and stops at
// the first failure:
//
//   1. every voice is full                        -> VoiceNotFull
//   2. every pair opens on a perfect consonance   -> FirstIntervalNotPerfect
//   3. every pair closes on a perfect consonance  -> LastIntervalNotPerfect
//   4. no pair sounds a dissonance anywhere       -> NotAllIntervalsConsonant
//   5. no pair moves in parallel into a perfect   -> ParallelToPerfect
//
// The order is observable: a piece that breaks rules 2 and 4 reports rule 2.
// Within a check, voice pairs are visited as (0,1), (0,2), ..., (1,2), ...
// and time steps ascend inside each pair, so the reported location is
// deterministic.
//
// Validation is a pure read; it never mutates the voices.

use crate::error::{ComposeError, Result};
use crate::interval::Interval;
use crate::motion::{self, Motion};
use crate::note::Note;
use crate::validation::{Location, ValidationResult, Violation, ViolationKind};
use crate::voice::Voice;
use tracing::debug;

/// Voice count used by `Composition::new`: cantus firmus plus counterpoint.
pub const DEFAULT_VOICE_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    length: usize,
    voices: Vec<Voice>,
}

impl Composition {
    /// A two-voice composition of `length` notes per voice.
    pub fn new(length: usize) -> Result<Self> {
        Self::with_voices(DEFAULT_VOICE_COUNT, length)
    }

    /// A composition of `voice_count` empty voices, each `length` notes long.
    pub fn with_voices(voice_count: usize, length: usize) -> Result<Self> {
        if voice_count < 2 || length < 1 {
            return Err(ComposeError::InvalidShape {
                voices: voice_count,
                length,
            });
        }
        Ok(Composition {
            length,
            voices: (0..voice_count).map(|_| Voice::new(length)).collect(),
        })
    }

    /// Notes per voice once full.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, voice: usize) -> Result<&Voice> {
        let count = self.voices.len();
        self.voices
            .get(voice)
            .ok_or(ComposeError::VoiceOutOfRange { voice, count })
    }

    fn voice_mut(&mut self, voice: usize) -> Result<&mut Voice> {
        let count = self.voices.len();
        self.voices
            .get_mut(voice)
            .ok_or(ComposeError::VoiceOutOfRange { voice, count })
    }

    /// Append a note to the end of one voice.
    pub fn append(&mut self, voice: usize, note: Note) -> Result<()> {
        self.voice_mut(voice)?.append(note)
    }

    /// Replace an already-populated note, returning the old one.
    pub fn replace(&mut self, voice: usize, index: usize, note: Note) -> Result<Note> {
        self.voice_mut(voice)?.replace(index, note)
    }

    /// Remove the last note of one voice, if it has any.
    pub fn pop(&mut self, voice: usize) -> Result<Option<Note>> {
        Ok(self.voice_mut(voice)?.pop())
    }

    /// True when every voice is full.
    pub fn is_complete(&self) -> bool {
        self.voices.iter().all(|v| v.size() == self.length)
    }

    /// Run the rule checks in order and report the first failure, or
    /// `Valid`.
    pub fn validate(&self) -> ValidationResult {
        ValidationResult::from(self.first_violation())
    }

    /// Like `validate`, but also says where the rule was broken.
    pub fn first_violation(&self) -> Option<Violation> {
        let violation = self
            .check_fullness()
            .or_else(|| self.check_outer_interval(0, ViolationKind::FirstIntervalNotPerfect))
            .or_else(|| {
                self.check_outer_interval(self.length - 1, ViolationKind::LastIntervalNotPerfect)
            })
            .or_else(|| self.check_consonance())
            .or_else(|| self.check_parallel_perfects());

        if let Some(v) = &violation {
            debug!(kind = ?v.kind, location = ?v.location, "composition failed validation");
        }
        violation
    }

    // ── Checks ──
    //
    // Checks 2-5 index voices directly: they only run after check 1 has
    // established that every voice holds exactly `length` notes.

    fn check_fullness(&self) -> Option<Violation> {
        self.voices
            .iter()
            .position(|v| v.size() != self.length)
            .map(|voice| Violation {
                kind: ViolationKind::VoiceNotFull,
                location: Location::Voice { voice },
            })
    }

    fn check_outer_interval(&self, index: usize, kind: ViolationKind) -> Option<Violation> {
        self.pairs().find_map(|(i, j)| {
            let (a, b) = self.slice(i, j, index);
            (!Interval::between(a, b).is_perfect()).then_some(Violation {
                kind,
                location: Location::Slice { voices: (i, j), index },
            })
        })
    }

    fn check_consonance(&self) -> Option<Violation> {
        self.pairs().find_map(|(i, j)| {
            (0..self.length).find_map(|index| {
                let (a, b) = self.slice(i, j, index);
                (!Interval::between(a, b).consonance().is_consonant()).then_some(
                    Violation {
                        kind: ViolationKind::NotAllIntervalsConsonant,
                        location: Location::Slice { voices: (i, j), index },
                    },
                )
            })
        })
    }

    fn check_parallel_perfects(&self) -> Option<Violation> {
        self.pairs().find_map(|(i, j)| {
            (1..self.length).find_map(|index| {
                let (prev_a, prev_b) = self.slice(i, j, index - 1);
                let (cur_a, cur_b) = self.slice(i, j, index);
                let parallel = motion::classify(prev_a, prev_b, cur_a, cur_b) == Motion::Parallel;
                (parallel && Interval::between(cur_a, cur_b).is_perfect()).then_some(Violation {
                    kind: ViolationKind::ParallelToPerfect,
                    location: Location::Slice { voices: (i, j), index },
                })
            })
        })
    }

    /// Voice pairs `(i, j)` with `i < j`, in ascending order.
    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let n = self.voices.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }

    /// The two notes sounding in voices `i` and `j` at `index`. Only valid
    /// on a complete composition.
    fn slice(&self, i: usize, j: usize, index: usize) -> (Note, Note) {
        (self.voices[i].notes()[index], self.voices[j].notes()[index])
    }
}
