use std::fmt;

/// Status line shown under the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    FileSelected,
    Scheduled { seconds: i64 },
    Restored { seconds: i64 },
    TimePassed,
    Playing,
    Cancelled,
    NotificationsDisabled,
    NotificationsUnavailable,
    SaveFailed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::FileSelected => f.write_str("Song selected ready to schedule."),
            Self::Scheduled { seconds } => write!(f, "Scheduled to play in {seconds} seconds."),
            Self::Restored { seconds } => write!(f, "Restored schedule: Plays in {seconds}s"),
            Self::TimePassed => f.write_str("Scheduled time passed."),
            Self::Playing => f.write_str("Playing song..."),
            Self::Cancelled => f.write_str("Schedule cancelled."),
            Self::NotificationsDisabled => f.write_str("Note: Notifications disabled."),
            Self::NotificationsUnavailable => f.write_str("Notifications unavailable."),
            Self::SaveFailed => f.write_str("Could not save schedule."),
        }
    }
}

/// A blocking message the UI shows in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn selection_required() -> Self {
        Self::new("Selection Required", "Please select a song first.")
    }

    pub fn invalid_time() -> Self {
        Self::new("Invalid Time", "Please select a future time.")
    }

    pub fn playback_failed() -> Self {
        Self::new("Error", "Failed to play song. File might be inaccessible.")
    }

    pub fn pick_failed() -> Self {
        Self::new("Error", "Failed to pick song")
    }
}

/// Whole seconds until a deadline, rounded up. Used for both the status text
/// and the notification trigger so the two always agree.
pub fn ceil_seconds(delta: chrono::Duration) -> i64 {
    let millis = delta.num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 999) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rounds_partial_seconds_up() {
        assert_eq!(ceil_seconds(Duration::milliseconds(4_001)), 5);
        assert_eq!(ceil_seconds(Duration::seconds(5)), 5);
        assert_eq!(ceil_seconds(Duration::milliseconds(1)), 1);
        assert_eq!(ceil_seconds(Duration::seconds(-3)), 0);
    }

    #[test]
    fn formats_status_lines() {
        assert_eq!(
            Status::Restored { seconds: 5 }.to_string(),
            "Restored schedule: Plays in 5s"
        );
        assert_eq!(
            Status::Scheduled { seconds: 90 }.to_string(),
            "Scheduled to play in 90 seconds."
        );
        assert_eq!(Status::Idle.to_string(), "");
    }
}
