//! Error types for the schedule controller and its collaborators.

/// Rejected user input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no audio file selected")]
    NoFileSelected,

    #[error("target time is not in the future")]
    TargetNotInFuture,
}

/// Key-value persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Local notification service failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("notification permission not granted")]
    PermissionDenied,

    #[error("notification channel setup failed: {0}")]
    Channel(String),

    #[error("cannot schedule notification: {0}")]
    Schedule(String),

    #[error("notification backend error: {0}")]
    Backend(String),
}

/// Audio load or playback failure.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("resource unreachable: {0}")]
    Unreachable(String),

    #[error("cannot decode audio: {0}")]
    Decode(String),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error returned by [`crate::ScheduleController`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("playback error: {0}")]
    Playback(#[from] AudioError),

    #[error("controller is missing its {0}")]
    Incomplete(&'static str),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
