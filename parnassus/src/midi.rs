// MIDI output from compositions.
//
// Converts a Composition into a Standard MIDI File (SMF format 1) for
// playback: a tempo track followed by one track per voice. First species is
// note against note, so every step becomes one whole note. Steps map to
// MIDI pitches through a `ModeInstance`.
//
// Partial voices export their populated prefix; a note whose pitch falls
// outside the MIDI range fails the export.
//
// Uses the `midly` crate for MIDI writing.

use crate::composition::Composition;
use crate::error::{ComposeError, Result};
use crate::mode::ModeInstance;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use tracing::info;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Ticks per composition step (one whole note).
const TICKS_PER_STEP: u32 = TICKS_PER_QUARTER as u32 * 4;

/// Slowest tempo whose microseconds per quarter fit the 24-bit tempo event.
pub const MIN_TEMPO_BPM: u16 = 4;

/// Largest value a MIDI tempo event can carry.
const MAX_TEMPO_MICROSECONDS: u32 = 0xFF_FFFF;

/// Church organ.
const PROGRAM: u8 = 19;

const VELOCITY: u8 = 80;

/// Melodic channels; 9 is the GM percussion channel.
const CHANNELS: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 14, 15];

/// Convert a Composition to MIDI and write it to a file.
pub fn write_midi(cmp: &Composition, mode: &ModeInstance, tempo_bpm: u16, path: &Path) -> Result<()> {
    let bytes = to_midi_bytes(cmp, mode, tempo_bpm)?;
    std::fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote MIDI");
    Ok(())
}

/// Render a Composition as SMF bytes.
pub fn to_midi_bytes(cmp: &Composition, mode: &ModeInstance, tempo_bpm: u16) -> Result<Vec<u8>> {
    let names: Vec<String> = (1..=cmp.voice_count()).map(|i| format!("Voice {i}")).collect();
    let smf = composition_to_smf(cmp, mode, tempo_bpm, &names)?;
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| ComposeError::Export(e.to_string()))?;
    Ok(buf)
}

fn composition_to_smf<'a>(
    cmp: &Composition,
    mode: &ModeInstance,
    tempo_bpm: u16,
    names: &'a [String],
) -> Result<Smf<'a>> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let mut tempo_track: Track<'a> = Vec::new();
    let tempo_microseconds = match tempo_bpm {
        0 => None,
        bpm => Some(60_000_000 / u32::from(bpm)),
    }
    .filter(|&us| us <= MAX_TEMPO_MICROSECONDS)
    .ok_or_else(|| {
        ComposeError::Export(format!(
            "tempo {tempo_bpm} bpm is too slow for MIDI (minimum {MIN_TEMPO_BPM})"
        ))
    })?;
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    for (vi, voice) in cmp.voices().iter().enumerate() {
        let channel = u4::new(CHANNELS[vi % CHANNELS.len()]);
        let mut track: Track<'a> = Vec::new();

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(names[vi].as_bytes())),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PROGRAM),
                },
            },
        });

        for (index, note) in voice.iter().enumerate() {
            let pitch = mode.pitch_of(note).ok_or_else(|| {
                ComposeError::Export(format!(
                    "voice {vi} note {index} (step {}) is outside the MIDI range",
                    note.value()
                ))
            })?;
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(pitch),
                        vel: u7::new(VELOCITY),
                    },
                },
            });
            track.push(TrackEvent {
                delta: u28::new(TICKS_PER_STEP),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(pitch),
                        vel: u7::new(0),
                    },
                },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
    }

    Ok(smf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    fn two_voice(lower: &[i32], upper: &[i32], length: usize) -> Composition {
        let mut cmp = Composition::new(length).unwrap();
        for &s in lower {
            cmp.append(0, Note::new(s)).unwrap();
        }
        for &s in upper {
            cmp.append(1, Note::new(s)).unwrap();
        }
        cmp
    }

    fn note_ons(track: &Track<'_>) -> Vec<u8> {
        track
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => Some(key.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_composition_to_smf_tracks() {
        let cmp = two_voice(&[0, 1, 0], &[4, 3, 7], 3);
        let names = vec!["a".to_string(), "b".to_string()];
        let smf = composition_to_smf(&cmp, &ModeInstance::c_major(), 60, &names).unwrap();
        // 1 tempo track + 2 voice tracks
        assert_eq!(smf.tracks.len(), 3);
        assert_eq!(note_ons(&smf.tracks[1]), vec![60, 62, 60]);
        assert_eq!(note_ons(&smf.tracks[2]), vec![67, 65, 72]);
    }

    #[test]
    fn test_partial_voice_exports_prefix() {
        let cmp = two_voice(&[0, 1], &[], 4);
        let names = vec!["a".to_string(), "b".to_string()];
        let smf = composition_to_smf(&cmp, &ModeInstance::c_major(), 60, &names).unwrap();
        assert_eq!(note_ons(&smf.tracks[1]).len(), 2);
        assert!(note_ons(&smf.tracks[2]).is_empty());
    }

    #[test]
    fn test_bytes_parse_back() {
        let cmp = two_voice(&[0, 4], &[7, 11], 2);
        let bytes = to_midi_bytes(&cmp, &ModeInstance::c_major(), 72).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 3);
    }

    #[test]
    fn test_tempo_event_carries_exact_microseconds() {
        let cmp = two_voice(&[0], &[4], 1);
        let bytes = to_midi_bytes(&cmp, &ModeInstance::c_major(), MIN_TEMPO_BPM).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let tempo = smf.tracks[0].iter().find_map(|e| match e.kind {
            TrackEventKind::Meta(midly::MetaMessage::Tempo(us)) => Some(us.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(15_000_000));
    }

    #[test]
    fn test_too_slow_tempo_fails() {
        let cmp = two_voice(&[0], &[4], 1);
        for bpm in [0, 2, 3] {
            let err = to_midi_bytes(&cmp, &ModeInstance::c_major(), bpm).unwrap_err();
            assert!(matches!(err, ComposeError::Export(_)));
        }
    }

    #[test]
    fn test_out_of_range_note_fails() {
        let cmp = two_voice(&[200], &[], 2);
        let err = to_midi_bytes(&cmp, &ModeInstance::c_major(), 60).unwrap_err();
        assert!(matches!(err, ComposeError::Export(_)));
    }
}
