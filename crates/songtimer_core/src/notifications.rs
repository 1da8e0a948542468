use serde::{Deserialize, Serialize};

use crate::error::NotificationError;

pub const DEFAULT_CHANNEL_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub uri: String,
}

/// One-shot local notification fired `delay_secs` after it is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub data: NotificationData,
    pub sound: bool,
    pub delay_secs: u64,
    pub channel_id: String,
}

/// Delivered when the user taps a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub data: NotificationData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Default,
    High,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    pub vibration_pattern: Vec<u64>,
    pub light_color: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_CHANNEL_ID.to_string(),
            name: DEFAULT_CHANNEL_ID.to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}

/// How a notification is presented while the app is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationOptions {
    pub show_alert: bool,
    pub show_banner: bool,
    pub show_list: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            show_alert: true,
            show_banner: true,
            show_list: true,
            play_sound: true,
            set_badge: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Platform-specific notification adapters implement this trait.
pub trait NotificationScheduler {
    fn ensure_channel(
        &mut self,
        channel: &ChannelConfig,
        presentation: &PresentationOptions,
    ) -> Result<(), NotificationError>;

    fn permission_status(&self) -> Result<PermissionStatus, NotificationError>;

    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError>;

    /// Returns a backend identifier for the scheduled notification.
    fn schedule(&mut self, request: NotificationRequest) -> Result<String, NotificationError>;

    fn cancel_all(&mut self) -> Result<(), NotificationError>;

    /// Tap responses received since the last call.
    fn take_responses(&mut self) -> Vec<NotificationResponse>;
}
