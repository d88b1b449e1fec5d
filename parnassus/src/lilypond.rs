// LilyPond sheet music output from compositions.
//
// Converts a Composition into a LilyPond (.ly) text file that can be
// engraved into PDF/SVG. Each voice gets its own staff inside a StaffGroup,
// highest voice index on top. Every step is a whole note in its own 4/4 bar,
// the usual layout for first-species exercises.
//
// Partial voices are padded with whole rests so the staves stay aligned.
// Uses absolute pitches (not \relative) for simplicity and correctness.

use crate::composition::Composition;
use crate::error::{ComposeError, Result};
use crate::mode::{Mode, ModeInstance};
use crate::voice::Voice;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Pitch class names in LilyPond notation (indexed by pitch class 0-11).
/// Uses flats for enharmonic spellings.
const LY_PITCH_NAMES: [&str; 12] = [
    "c", "cis", "d", "ees", "e", "f", "fis", "g", "aes", "a", "bes", "b",
];

/// Convert a MIDI pitch number to a LilyPond absolute pitch string.
///
/// LilyPond's `c` with no octave marks = MIDI 48 (C3).
/// Each `'` raises one octave, each `,` lowers one octave.
pub fn midi_to_ly_note(midi_pitch: u8) -> String {
    let pc = (midi_pitch % 12) as usize;
    let octave = (midi_pitch / 12) as i8 - 4;
    let mut result = LY_PITCH_NAMES[pc].to_string();
    let mark = if octave > 0 { '\'' } else { ',' };
    for _ in 0..octave.unsigned_abs() {
        result.push(mark);
    }
    result
}

/// Map a ModeInstance to a LilyPond \key command string.
///
/// Aeolian maps to \minor and Ionian to \major (LilyPond convention).
pub fn mode_to_ly_key(mode: &ModeInstance) -> String {
    let pitch = LY_PITCH_NAMES[mode.final_pc as usize % 12];
    let mode_name = match mode.mode {
        Mode::Dorian => "dorian",
        Mode::Phrygian => "phrygian",
        Mode::Lydian => "lydian",
        Mode::Mixolydian => "mixolydian",
        Mode::Aeolian => "minor",
        Mode::Ionian => "major",
    };
    format!("\\key {} \\{}", pitch, mode_name)
}

/// Pitches of a voice's populated notes.
fn voice_pitches(voice: &Voice, mode: &ModeInstance) -> Result<Vec<u8>> {
    voice
        .iter()
        .enumerate()
        .map(|(index, note)| {
            mode.pitch_of(note).ok_or_else(|| {
                ComposeError::Export(format!(
                    "note {index} (step {}) has no pitch in {:?}",
                    note.value(),
                    mode.mode
                ))
            })
        })
        .collect()
}

/// Treble unless the voice sits mostly below middle C.
fn clef_for(pitches: &[u8]) -> &'static str {
    if pitches.is_empty() {
        return "treble";
    }
    let sum: u32 = pitches.iter().map(|&p| u32::from(p)).sum();
    if sum / pitches.len() as u32 >= 60 { "treble" } else { "bass" }
}

/// Generate a complete LilyPond file from a Composition.
pub fn composition_to_lilypond(
    cmp: &Composition,
    mode: &ModeInstance,
    title: Option<&str>,
) -> Result<String> {
    let mut ly = String::new();

    ly.push_str("\\version \"2.24.0\"\n\n");

    let title_text = title.unwrap_or("Counterpoint").replace('"', "\\\"");
    let mode_subtitle = format!(
        "{:?} on {}",
        mode.mode,
        LY_PITCH_NAMES[mode.final_pc as usize % 12].to_uppercase()
    );
    let _ = write!(
        ly,
        "\\header {{\n  title = \"{}\"\n  subtitle = \"{}\"\n}}\n\n",
        title_text, mode_subtitle
    );

    let _ = write!(ly, "global = {{\n  {} \\time 4/4\n}}\n\n", mode_to_ly_key(mode));

    ly.push_str("\\score {\n  \\new StaffGroup <<\n");
    for (vi, voice) in cmp.voices().iter().enumerate().rev() {
        let pitches = voice_pitches(voice, mode)?;
        let mut music: Vec<String> = pitches
            .iter()
            .map(|&p| format!("{}1", midi_to_ly_note(p)))
            .collect();
        music.resize(cmp.length(), "r1".to_string());
        let _ = writeln!(
            ly,
            "    \\new Staff \\with {{ instrumentName = \"Voice {}\" }} \\absolute {{\n      \\global \\clef {}\n      {}\n    }}",
            vi + 1,
            clef_for(&pitches),
            music.join(" ")
        );
    }
    ly.push_str("  >>\n");
    ly.push_str("  \\layout { }\n");
    ly.push_str("}\n");

    Ok(ly)
}

/// Write a LilyPond file from a Composition.
pub fn write_lilypond(
    cmp: &Composition,
    mode: &ModeInstance,
    title: Option<&str>,
    path: &Path,
) -> Result<()> {
    let ly = composition_to_lilypond(cmp, mode, title)?;
    std::fs::write(path, ly)?;
    info!(path = %path.display(), "wrote LilyPond score");
    Ok(())
}
