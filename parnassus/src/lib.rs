// Parnassus: first-species counterpoint composition and validation.
//
// A composition is a fixed number of voices, each an equal-length sequence
// of diatonic notes, written note against note. The validation engine
// checks it against the classical first-species rules (perfect outer
// intervals, consonance throughout, no parallel motion into a perfect
// consonance) and reports either success or the first rule broken.
//
// Architecture:
// - note.rs:        Note, a diatonic step value
// - voice.rs:       Voice, a fixed-capacity note sequence
// - interval.rs:    Harmonic interval size and consonance class
// - motion.rs:      Relative motion of two voices between steps
// - composition.rs: Composition and the ordered rule checks
// - validation.rs:  ValidationResult / Violation outcome types
// - error.rs:       ComposeError, the structural-misuse and I/O channel
// - persistence.rs: JSON documents for saving and loading compositions
// - mode.rs:        Church modes mapping steps to MIDI pitches
// - midi.rs:        Standard MIDI File export
// - lilypond.rs:    LilyPond score export
// - config.rs:      EditorConfig, front-end tunables loaded from JSON
//
// The engine (note through validation) is pure and synchronous with no I/O.
// Persistence, export and configuration are collaborators that use only the
// engine's public API. The `parnassus` binary is a command-line editor on
// top of all of it.

pub mod composition;
pub mod config;
pub mod error;
pub mod interval;
pub mod lilypond;
pub mod midi;
pub mod mode;
pub mod motion;
pub mod note;
pub mod persistence;
pub mod validation;
pub mod voice;

pub use composition::Composition;
pub use error::ComposeError;
pub use note::Note;
pub use validation::{ValidationResult, Violation, ViolationKind};
pub use voice::Voice;
