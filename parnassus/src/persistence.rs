// JSON persistence for compositions.
//
// A saved composition is a small JSON document:
//
//   { "length": 4, "voices": [[0, 1, 2, 0], [4, 3]] }
//
// `voices` holds each voice's populated notes as bare step integers; voices
// may be partial, exactly as they are in the editor. Loading goes through
// the public `Composition` API (`with_voices` + `append`), so a document
// cannot smuggle in a state the editor could not have produced: an
// over-long voice fails with `CapacityExceeded`, a bad shape with
// `InvalidShape`.

use crate::composition::Composition;
use crate::error::{ComposeError, Result};
use crate::note::Note;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// On-disk form of a `Composition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionDocument {
    pub length: usize,
    pub voices: Vec<Vec<Note>>,
}

impl CompositionDocument {
    pub fn from_composition(cmp: &Composition) -> Self {
        CompositionDocument {
            length: cmp.length(),
            voices: cmp.voices().iter().map(|v| v.notes().to_vec()).collect(),
        }
    }

    /// Rebuild a composition, re-checking every note on the way in.
    pub fn into_composition(self) -> Result<Composition> {
        let mut cmp = Composition::with_voices(self.voices.len(), self.length)?;
        for (vi, notes) in self.voices.into_iter().enumerate() {
            for note in notes {
                cmp.append(vi, note)?;
            }
        }
        Ok(cmp)
    }
}

pub fn to_json(cmp: &Composition) -> Result<String> {
    Ok(serde_json::to_string_pretty(&CompositionDocument::from_composition(cmp))?)
}

pub fn from_json(json: &str) -> Result<Composition> {
    let doc: CompositionDocument = serde_json::from_str(json)?;
    doc.into_composition()
}

fn read_document(path: &Path) -> Result<CompositionDocument> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn build_loaded(doc: CompositionDocument, path: &Path) -> Result<Composition> {
    let cmp = doc.into_composition()?;
    info!(path = %path.display(), voices = cmp.voice_count(), length = cmp.length(), "loaded composition");
    Ok(cmp)
}

/// Read a composition from a JSON file.
pub fn load(path: &Path) -> Result<Composition> {
    build_loaded(read_document(path)?, path)
}

/// Like `load`, but refuse a document declaring more than `max_length`
/// notes per voice before any voice is built.
pub fn load_bounded(path: &Path, max_length: usize) -> Result<Composition> {
    let doc = read_document(path)?;
    if doc.length > max_length {
        return Err(ComposeError::Config(format!(
            "composition length {} exceeds the editor maximum of {max_length}",
            doc.length
        )));
    }
    build_loaded(doc, path)
}

/// Write a composition to a JSON file, replacing any existing file.
pub fn save(cmp: &Composition, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(cmp)?)?;
    info!(path = %path.display(), "saved composition");
    Ok(())
}
