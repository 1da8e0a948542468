//! Adapters from the controller's collaborator traits to the host platform.

pub mod audio;
pub mod notifications;
pub mod picker;

use songtimer_core::{
    audio::AudioPlayer, notifications::NotificationScheduler, picker::FilePicker,
};

pub fn default_player() -> Box<dyn AudioPlayer> {
    #[cfg(feature = "audio")]
    {
        Box::new(audio::RodioPlayer::new())
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(audio::UnavailablePlayer)
    }
}

pub fn default_notifier(enabled: bool) -> Box<dyn NotificationScheduler> {
    if !enabled {
        tracing::info!("desktop notifications disabled by configuration");
        return Box::new(notifications::LogOnlyNotifier::default());
    }
    #[cfg(all(feature = "desktop", not(any(target_os = "android", target_os = "ios"))))]
    {
        Box::new(notifications::DesktopNotifier::new("Song Timer"))
    }
    #[cfg(not(all(feature = "desktop", not(any(target_os = "android", target_os = "ios")))))]
    {
        Box::new(notifications::LogOnlyNotifier::default())
    }
}

pub fn default_picker() -> Box<dyn FilePicker> {
    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    {
        Box::new(picker::DialogPicker)
    }
    #[cfg(any(target_os = "android", target_os = "ios"))]
    {
        Box::new(picker::UnsupportedPicker)
    }
}
