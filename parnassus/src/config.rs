// Data-driven editor configuration.
//
// Front-end tunables live in `EditorConfig`, loaded from a JSON file. Every
// field has a default, so a partial file (or no file at all) is fine: a
// config of `{}` is the default config. The engine itself takes no
// configuration; these values only shape what the editor offers (new
// composition sizes) and how exporters render (mode, octave, tempo).

use crate::error::{ComposeError, Result};
use crate::midi::MIN_TEMPO_BPM;
use crate::mode::{Mode, ModeInstance};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Notes per voice for a new composition when none is requested.
    pub default_length: usize,
    /// Smallest composition length the editor will create.
    pub min_length: usize,
    /// Largest composition length the editor will create or load.
    pub max_length: usize,
    /// Voices in a new composition.
    pub voice_count: usize,
    /// Export tempo in quarter notes per minute. Each step lasts a whole note.
    pub tempo_bpm: u16,
    /// Mode used to map steps to pitches on export.
    pub mode: Mode,
    /// Final pitch class (0 = C). Steps are placed relative to it.
    pub final_pc: u8,
    /// Octave of step 0 (4 = middle C's octave).
    pub base_octave: i8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            default_length: 8,
            min_length: 2,
            // 5 pages of 6 notes in the graphical editor.
            max_length: 30,
            voice_count: 2,
            tempo_bpm: 60,
            mode: Mode::Ionian,
            final_pc: 0,
            base_octave: 4,
        }
    }
}

impl EditorConfig {
    /// Load and check a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs whose values contradict each other.
    pub fn validate(&self) -> Result<()> {
        if self.min_length < 1 {
            return Err(ComposeError::Config("min_length must be at least 1".into()));
        }
        if self.min_length > self.max_length {
            return Err(ComposeError::Config(format!(
                "min_length {} exceeds max_length {}",
                self.min_length, self.max_length
            )));
        }
        if !(self.min_length..=self.max_length).contains(&self.default_length) {
            return Err(ComposeError::Config(format!(
                "default_length {} outside {}..={}",
                self.default_length, self.min_length, self.max_length
            )));
        }
        if self.voice_count < 2 {
            return Err(ComposeError::Config("voice_count must be at least 2".into()));
        }
        if self.tempo_bpm < MIN_TEMPO_BPM {
            return Err(ComposeError::Config(format!(
                "tempo_bpm must be at least {MIN_TEMPO_BPM}"
            )));
        }
        if self.final_pc > 11 {
            return Err(ComposeError::Config(format!(
                "final_pc {} is not a pitch class",
                self.final_pc
            )));
        }
        Ok(())
    }

    /// Check a requested composition length against the configured bounds.
    pub fn check_length(&self, length: usize) -> Result<()> {
        if (self.min_length..=self.max_length).contains(&length) {
            Ok(())
        } else {
            Err(ComposeError::Config(format!(
                "length {length} outside {}..={}",
                self.min_length, self.max_length
            )))
        }
    }

    pub fn mode_instance(&self) -> ModeInstance {
        ModeInstance::new(self.mode, self.final_pc, self.base_octave)
    }
}
