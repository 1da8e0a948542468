use crate::error::AudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSessionConfig {
    pub plays_in_silent_mode: bool,
    pub stays_active_in_background: bool,
}

impl Default for AudioSessionConfig {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            stays_active_in_background: true,
        }
    }
}

/// A loaded sound. Dropping it without `unload` is allowed but backends may
/// release resources later than expected.
pub trait AudioSession {
    fn play(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
    fn unload(self: Box<Self>) -> Result<(), AudioError>;
}

pub trait AudioPlayer {
    fn configure(&mut self, _config: &AudioSessionConfig) -> Result<(), AudioError> {
        Ok(())
    }

    fn load(&mut self, uri: &str) -> Result<Box<dyn AudioSession>, AudioError>;
}
