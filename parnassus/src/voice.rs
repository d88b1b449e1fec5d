// Voices: one melodic line of a composition.
//
// A voice is a fixed-capacity ordered run of notes. The capacity is the
// composition length, chosen when the composition is built; the voice fills
// from the front via `append` and is *full* once it holds exactly that many
// notes. Partially filled voices are normal while editing and are reported
// by validation (`VoiceNotFull`), not rejected here.
//
// Voices only exist inside a `Composition` and are addressed by index.

use crate::error::{ComposeError, Result};
use crate::note::Note;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    capacity: usize,
    notes: Vec<Note>,
}

impl Voice {
    /// Create an empty voice that fills up to `capacity` notes.
    pub fn new(capacity: usize) -> Self {
        Voice {
            capacity,
            notes: Vec::new(),
        }
    }

    /// Add a note at the end. Fails with `CapacityExceeded` when full.
    pub fn append(&mut self, note: Note) -> Result<()> {
        if self.is_full() {
            return Err(ComposeError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.notes.push(note);
        Ok(())
    }

    /// Overwrite a populated slot, returning the note it held.
    pub fn replace(&mut self, index: usize, note: Note) -> Result<Note> {
        let len = self.notes.len();
        let slot = self
            .notes
            .get_mut(index)
            .ok_or(ComposeError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, note))
    }

    /// Remove and return the last note, if any.
    pub fn pop(&mut self) -> Option<Note> {
        self.notes.pop()
    }

    pub fn at(&self, index: usize) -> Result<Note> {
        self.notes
            .get(index)
            .copied()
            .ok_or(ComposeError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            })
    }

    /// Number of notes currently populated (not the capacity).
    pub fn size(&self) -> usize {
        self.notes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.notes.len() == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn iter(&self) -> impl Iterator<Item = Note> + '_ {
        self.notes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_of(capacity: usize, steps: &[i32]) -> Voice {
        let mut voice = Voice::new(capacity);
        for &s in steps {
            voice.append(Note::new(s)).unwrap();
        }
        voice
    }

    #[test]
    fn test_append_until_full() {
        let mut voice = Voice::new(3);
        assert!(voice.is_empty());
        assert!(!voice.is_full());

        voice.append(Note::new(0)).unwrap();
        voice.append(Note::new(2)).unwrap();
        assert_eq!(voice.size(), 2);
        assert!(!voice.is_full());

        voice.append(Note::new(4)).unwrap();
        assert!(voice.is_full());
        assert_eq!(voice.size(), voice.capacity());
    }

    #[test]
    fn test_append_past_capacity_fails() {
        let mut voice = voice_of(2, &[0, 1]);
        let err = voice.append(Note::new(2)).unwrap_err();
        assert!(matches!(err, ComposeError::CapacityExceeded { capacity: 2 }));
        // The failed append leaves the voice untouched.
        assert_eq!(voice.notes(), &[Note::new(0), Note::new(1)]);
    }

    #[test]
    fn test_at_reads_populated_notes_only() {
        let voice = voice_of(4, &[5, -2]);
        assert_eq!(voice.at(0).unwrap(), Note::new(5));
        assert_eq!(voice.at(1).unwrap(), Note::new(-2));
        // Index 2 is within capacity but not yet populated.
        let err = voice.at(2).unwrap_err();
        assert!(matches!(err, ComposeError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_replace_and_pop() {
        let mut voice = voice_of(3, &[0, 1, 2]);
        let old = voice.replace(1, Note::new(4)).unwrap();
        assert_eq!(old, Note::new(1));
        assert_eq!(voice.at(1).unwrap(), Note::new(4));
        assert!(voice.replace(3, Note::new(0)).is_err());

        assert_eq!(voice.pop(), Some(Note::new(2)));
        assert!(!voice.is_full());
        voice.append(Note::new(7)).unwrap();
        assert!(voice.is_full());
    }

    #[test]
    fn test_zero_capacity_voice_is_full() {
        let mut voice = Voice::new(0);
        assert!(voice.is_full());
        assert!(voice.append(Note::new(0)).is_err());
    }
}
