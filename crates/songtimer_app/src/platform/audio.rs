use songtimer_core::{
    audio::{AudioPlayer, AudioSession},
    error::AudioError,
};

#[cfg(feature = "audio")]
pub use rodio_backend::RodioPlayer;

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::fs::File;
    use std::io::BufReader;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use songtimer_core::{
        audio::{AudioPlayer, AudioSession, AudioSessionConfig},
        error::AudioError,
        playback::uri_to_path,
    };
    use tracing::{debug, info};

    /// Plays local files through the default output device. The output stream
    /// is opened on first use and kept for the life of the player.
    pub struct RodioPlayer {
        output: Option<(OutputStream, OutputStreamHandle)>,
    }

    impl RodioPlayer {
        pub fn new() -> Self {
            Self { output: None }
        }

        fn handle(&mut self) -> Result<OutputStreamHandle, AudioError> {
            if self.output.is_none() {
                let pair =
                    OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()))?;
                info!("audio output opened");
                self.output = Some(pair);
            }
            match &self.output {
                Some((_, handle)) => Ok(handle.clone()),
                None => Err(AudioError::Output("no output stream".into())),
            }
        }
    }

    impl Default for RodioPlayer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioPlayer for RodioPlayer {
        fn configure(&mut self, config: &AudioSessionConfig) -> Result<(), AudioError> {
            // rodio output ignores ringer state and keeps playing when unfocused.
            debug!(?config, "audio session config accepted");
            Ok(())
        }

        fn load(&mut self, uri: &str) -> Result<Box<dyn AudioSession>, AudioError> {
            let path = uri_to_path(uri)
                .ok_or_else(|| AudioError::Unreachable(format!("unsupported uri `{uri}`")))?;
            let file = File::open(&path)
                .map_err(|e| AudioError::Unreachable(format!("{}: {e}", path.display())))?;
            let source =
                Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))?;
            let handle = self.handle()?;
            let sink = Sink::try_new(&handle).map_err(|e| AudioError::Output(e.to_string()))?;
            sink.pause();
            sink.append(source);
            debug!(path = %path.display(), "sound loaded");
            Ok(Box::new(RodioSession { sink }))
        }
    }

    struct RodioSession {
        sink: Sink,
    }

    impl AudioSession for RodioSession {
        fn play(&mut self) -> Result<(), AudioError> {
            self.sink.play();
            Ok(())
        }

        fn stop(&mut self) -> Result<(), AudioError> {
            self.sink.pause();
            Ok(())
        }

        fn unload(self: Box<Self>) -> Result<(), AudioError> {
            self.sink.stop();
            Ok(())
        }
    }
}

/// Stand-in for builds without an audio backend.
#[derive(Debug, Default)]
pub struct UnavailablePlayer;

impl AudioPlayer for UnavailablePlayer {
    fn load(&mut self, uri: &str) -> Result<Box<dyn AudioSession>, AudioError> {
        tracing::warn!(uri, "no audio backend compiled in");
        Err(AudioError::Output(
            "this build has no audio output backend".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_player_reports_output_error() {
        let mut player = UnavailablePlayer;
        let err = player.load("file:///tmp/a.mp3").err().expect("always fails");
        assert!(matches!(err, AudioError::Output(_)));
    }
}
