// Structural and I/O errors.
//
// These are API-misuse and environment failures, kept apart from musical
// rule violations (which are `ValidationResult` values, see
// `validation.rs`). A caller matching on `ComposeError` can never confuse
// "the counterpoint is wrong" with "the call was wrong".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("voice is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("note index {index} out of range (voice holds {len} notes)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("voice {voice} out of range (composition has {count} voices)")]
    VoiceOutOfRange { voice: usize, count: usize },

    #[error("invalid composition shape: {voices} voices of length {length} (need at least 2 voices of length 1)")]
    InvalidShape { voices: usize, length: usize },

    #[error("invalid editor config: {0}")]
    Config(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
