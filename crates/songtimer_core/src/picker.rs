use crate::playback::PickResult;

#[derive(Debug, Clone, thiserror::Error)]
#[error("file picker failed: {0}")]
pub struct PickError(pub String);

/// Asks the user for an audio file. Implementations filter to audio types.
pub trait FilePicker {
    fn pick_audio(&mut self) -> Result<PickResult, PickError>;
}
