use songtimer_core::{
    error::NotificationError,
    notifications::{
        ChannelConfig, NotificationRequest, NotificationResponse, NotificationScheduler,
        PermissionStatus, PresentationOptions,
    },
};
use tracing::info;

#[cfg(all(feature = "desktop", not(any(target_os = "android", target_os = "ios"))))]
pub use desktop::DesktopNotifier;

/// Used when notifications are switched off: every request is logged and
/// dropped, and the controller sees a denied permission.
#[derive(Debug, Default)]
pub struct LogOnlyNotifier {
    dropped: usize,
}

impl LogOnlyNotifier {
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl NotificationScheduler for LogOnlyNotifier {
    fn ensure_channel(
        &mut self,
        channel: &ChannelConfig,
        _presentation: &PresentationOptions,
    ) -> Result<(), NotificationError> {
        info!(channel = %channel.id, "notification channel ignored");
        Ok(())
    }

    fn permission_status(&self) -> Result<PermissionStatus, NotificationError> {
        Ok(PermissionStatus::Denied)
    }

    fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError> {
        Ok(PermissionStatus::Denied)
    }

    fn schedule(&mut self, request: NotificationRequest) -> Result<String, NotificationError> {
        self.dropped += 1;
        info!(title = %request.title, delay_secs = request.delay_secs, "notification dropped");
        Err(NotificationError::PermissionDenied)
    }

    fn cancel_all(&mut self) -> Result<(), NotificationError> {
        Ok(())
    }

    fn take_responses(&mut self) -> Vec<NotificationResponse> {
        Vec::new()
    }
}

#[cfg(all(feature = "desktop", not(any(target_os = "android", target_os = "ios"))))]
mod desktop {
    use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
    use std::thread;
    use std::time::Duration;

    use notify_rust::Notification;
    use songtimer_core::{
        error::NotificationError,
        notifications::{
            ChannelConfig, NotificationRequest, NotificationResponse,
            NotificationScheduler, PermissionStatus, PresentationOptions,
        },
    };
    use tracing::{debug, info, warn};

    /// Desktop notification daemon adapter. Each scheduled notification waits
    /// on its own thread; dropping its cancel sender aborts the wait.
    pub struct DesktopNotifier {
        app_name: String,
        channel: Option<ChannelConfig>,
        presentation: PresentationOptions,
        pending: Vec<Sender<()>>,
        responses_tx: Sender<NotificationResponse>,
        responses_rx: Receiver<NotificationResponse>,
        next_id: u64,
    }

    impl DesktopNotifier {
        pub fn new(app_name: impl Into<String>) -> Self {
            let (responses_tx, responses_rx) = mpsc::channel();
            Self {
                app_name: app_name.into(),
                channel: None,
                presentation: PresentationOptions::default(),
                pending: Vec::new(),
                responses_tx,
                responses_rx,
                next_id: 0,
            }
        }
    }

    impl DesktopNotifier {
        /// Max-importance channels map to critical urgency on XDG desktops.
        #[cfg(all(unix, not(target_os = "macos")))]
        fn critical(&self) -> bool {
            use songtimer_core::notifications::Importance;
            self.channel
                .as_ref()
                .is_some_and(|channel| channel.importance == Importance::Max)
        }
    }

    impl NotificationScheduler for DesktopNotifier {
        fn ensure_channel(
            &mut self,
            channel: &ChannelConfig,
            presentation: &PresentationOptions,
        ) -> Result<(), NotificationError> {
            debug!(channel = %channel.id, importance = ?channel.importance, "notification channel configured");
            self.channel = Some(channel.clone());
            self.presentation = *presentation;
            Ok(())
        }

        fn permission_status(&self) -> Result<PermissionStatus, NotificationError> {
            Ok(PermissionStatus::Granted)
        }

        fn request_permission(&mut self) -> Result<PermissionStatus, NotificationError> {
            Ok(PermissionStatus::Granted)
        }

        fn schedule(&mut self, request: NotificationRequest) -> Result<String, NotificationError> {
            self.next_id += 1;
            let id = format!("songtimer-{}", self.next_id);
            let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
            let delivery = Delivery {
                app_name: self.app_name.clone(),
                #[cfg(all(unix, not(target_os = "macos")))]
                critical: self.critical(),
                play_sound: request.sound && self.presentation.play_sound,
                request,
                responses: self.responses_tx.clone(),
            };
            let delay = Duration::from_secs(delivery.request.delay_secs);
            let thread_id = id.clone();
            thread::Builder::new()
                .name(id.clone())
                .spawn(move || match cancel_rx.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => delivery.show(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        debug!(notification_id = %thread_id, "scheduled notification cancelled");
                    }
                })
                .map_err(|e| NotificationError::Schedule(e.to_string()))?;
            self.pending.push(cancel_tx);
            Ok(id)
        }

        fn cancel_all(&mut self) -> Result<(), NotificationError> {
            let count = self.pending.len();
            self.pending.clear();
            if count > 0 {
                info!(count, "scheduled notifications cancelled");
            }
            Ok(())
        }

        fn take_responses(&mut self) -> Vec<NotificationResponse> {
            self.responses_rx.try_iter().collect()
        }
    }

    struct Delivery {
        app_name: String,
        #[cfg(all(unix, not(target_os = "macos")))]
        critical: bool,
        play_sound: bool,
        request: NotificationRequest,
        responses: Sender<NotificationResponse>,
    }

    impl Delivery {
        fn show(self) {
            let mut notification = Notification::new();
            notification
                .summary(&self.request.title)
                .body(&self.request.body)
                .appname(&self.app_name);
            if self.play_sound {
                notification.sound_name("alarm-clock-elapsed");
            }
            #[cfg(all(unix, not(target_os = "macos")))]
            {
                notification.action("default", "Play");
                if self.critical {
                    notification.urgency(notify_rust::Urgency::Critical);
                }
            }

            match notification.show() {
                Ok(handle) => {
                    info!(title = %self.request.title, "notification shown");
                    wait_for_tap(handle, self.request, self.responses);
                }
                Err(err) => warn!(%err, "failed to show notification"),
            }
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn wait_for_tap(
        handle: notify_rust::NotificationHandle,
        request: NotificationRequest,
        responses: Sender<NotificationResponse>,
    ) {
        handle.wait_for_action(move |action| {
            if action == "default" {
                debug!("notification tapped");
                let _ = responses.send(NotificationResponse { data: request.data });
            }
        });
    }

    // Other desktops do not report clicks back; the foreground timer covers them.
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn wait_for_tap<H>(
        _handle: H,
        _request: NotificationRequest,
        _responses: Sender<NotificationResponse>,
    ) {
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use songtimer_core::notifications::NotificationData;

    #[test]
    fn log_only_notifier_denies_and_drops() {
        let mut notifier = LogOnlyNotifier::default();
        assert_eq!(
            notifier.request_permission().unwrap(),
            PermissionStatus::Denied
        );
        let result = notifier.schedule(NotificationRequest {
            title: "Song Timer".into(),
            body: "Time to play: a.mp3".into(),
            data: NotificationData {
                uri: "file:///a.mp3".into(),
            },
            sound: true,
            delay_secs: 5,
            channel_id: "default".into(),
        });
        assert!(matches!(result, Err(NotificationError::PermissionDenied)));
        assert_eq!(notifier.dropped(), 1);
    }
}
