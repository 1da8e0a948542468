use std::collections::VecDeque;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    audio::{AudioPlayer, AudioSession, AudioSessionConfig},
    clock::{Clock, SystemClock},
    error::{Result, ScheduleError, ValidationError},
    notifications::{
        ChannelConfig, NotificationData, NotificationRequest, NotificationResponse,
        NotificationScheduler, PermissionStatus, PresentationOptions,
    },
    picker::{FilePicker, PickError},
    playback::{PickResult, ScheduledPlayback, SelectedFile},
    status::{ceil_seconds, Alert, Status},
    store::{KeyValueStore, MemoryStore, ScheduleSlot, SCHEDULE_KEY},
    timer::{ArmedTimer, TimerSlot},
};

pub const NOTIFICATION_TITLE: &str = "Song Timer";

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub storage_key: String,
    pub notification_title: String,
    pub channel: ChannelConfig,
    pub presentation: PresentationOptions,
    pub audio_session: AudioSessionConfig,
    /// Past-due records older than this are discarded on mount. `None` keeps
    /// them until the user cancels or schedules again.
    pub stale_after: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            storage_key: SCHEDULE_KEY.to_string(),
            notification_title: NOTIFICATION_TITLE.to_string(),
            channel: ChannelConfig::default(),
            presentation: PresentationOptions::default(),
            audio_session: AudioSessionConfig::default(),
            stale_after: Some(Duration::hours(24)),
        }
    }
}

/// Result of comparing the persisted record against the clock on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Idle,
    Armed { remaining_secs: i64 },
    Expired { discarded: bool },
}

/// Result of a notification tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    Played { uri: String },
    NoSchedule,
}

/// What happened during [`ScheduleController::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub channel_ready: bool,
    pub permission: Option<PermissionStatus>,
    pub audio_ready: bool,
    pub restored: ReconcileOutcome,
}

pub struct ScheduleControllerBuilder {
    config: ControllerConfig,
    store: Option<Box<dyn KeyValueStore>>,
    notifier: Option<Box<dyn NotificationScheduler>>,
    player: Option<Box<dyn AudioPlayer>>,
    clock: Option<Box<dyn Clock>>,
}

impl ScheduleControllerBuilder {
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            store: None,
            notifier: None,
            player: None,
            clock: None,
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stale_after(mut self, window: Option<Duration>) -> Self {
        self.config.stale_after = window;
        self
    }

    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn NotificationScheduler>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_player(mut self, player: Box<dyn AudioPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// The notifier and player are required. Store defaults to an in-memory
    /// one and the clock to the system clock.
    pub fn build(self) -> Result<ScheduleController> {
        let notifier = self
            .notifier
            .ok_or(ScheduleError::Incomplete("notification scheduler"))?;
        let player = self
            .player
            .ok_or(ScheduleError::Incomplete("audio player"))?;
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let target_time = clock.now();
        Ok(ScheduleController {
            slot: ScheduleSlot::new(store, self.config.storage_key.clone()),
            config: self.config,
            notifier,
            player,
            clock,
            selected_file: None,
            target_time,
            is_scheduled: false,
            status: Status::Idle,
            alerts: VecDeque::new(),
            timer: TimerSlot::default(),
            session: None,
            permission: None,
        })
    }
}

impl Default for ScheduleControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates persistence, the foreground timer, notifications and audio
/// around a single pending playback.
pub struct ScheduleController {
    config: ControllerConfig,
    slot: ScheduleSlot<Box<dyn KeyValueStore>>,
    notifier: Box<dyn NotificationScheduler>,
    player: Box<dyn AudioPlayer>,
    clock: Box<dyn Clock>,
    selected_file: Option<SelectedFile>,
    target_time: DateTime<Utc>,
    is_scheduled: bool,
    status: Status,
    alerts: VecDeque<Alert>,
    timer: TimerSlot,
    session: Option<Box<dyn AudioSession>>,
    permission: Option<PermissionStatus>,
}

impl ScheduleController {
    pub fn builder() -> ScheduleControllerBuilder {
        ScheduleControllerBuilder::new()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn target_time(&self) -> DateTime<Utc> {
        self.target_time
    }

    pub fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn status_message(&self) -> String {
        self.status.to_string()
    }

    pub fn permission(&self) -> Option<PermissionStatus> {
        self.permission
    }

    pub fn armed_timer(&self) -> Option<&ArmedTimer> {
        self.timer.current()
    }

    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Alerts raised since the last call, oldest first.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.alerts.drain(..).collect()
    }

    /// Reads the persisted record without touching any other state.
    pub fn persisted(&self) -> Option<ScheduledPlayback> {
        match self.slot.load() {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "unable to read persisted schedule");
                None
            }
        }
    }

    /// Process start: notification channel, permission, audio session, then
    /// the mount reconciliation.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) -> InitReport {
        let channel_ready = match self
            .notifier
            .ensure_channel(&self.config.channel, &self.config.presentation)
        {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, channel = %self.config.channel.id, "failed to set notification channel");
                false
            }
        };

        let permission = self.resolve_permission();
        match permission {
            Some(PermissionStatus::Granted) => {}
            Some(status) => {
                info!(?status, "notification permissions not granted");
                self.status = Status::NotificationsDisabled;
            }
            None => self.status = Status::NotificationsUnavailable,
        }

        let audio_ready = match self.player.configure(&self.config.audio_session) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "failed to configure audio session");
                false
            }
        };

        let restored = self.reconcile_on_mount();
        InitReport {
            channel_ready,
            permission,
            audio_ready,
            restored,
        }
    }

    fn resolve_permission(&mut self) -> Option<PermissionStatus> {
        let resolved = match self.notifier.permission_status() {
            Ok(PermissionStatus::Granted) => Some(PermissionStatus::Granted),
            Ok(existing) => {
                debug!(?existing, "requesting notification permission");
                match self.notifier.request_permission() {
                    Ok(status) => Some(status),
                    Err(err) => {
                        warn!(%err, "failed to request notification permission");
                        None
                    }
                }
            }
            Err(err) => {
                warn!(%err, "failed to read notification permission");
                None
            }
        };
        self.permission = resolved;
        resolved
    }

    /// Runs the picker and applies its result. A picker failure raises an
    /// alert and leaves the selection untouched.
    pub fn pick_file(&mut self, picker: &mut dyn FilePicker) -> std::result::Result<(), PickError> {
        match picker.pick_audio() {
            Ok(result) => {
                self.select_file(result);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "file pick failed");
                self.alerts.push_back(Alert::pick_failed());
                Err(err)
            }
        }
    }

    pub fn select_file(&mut self, result: PickResult) {
        let PickResult::Picked(file) = result else {
            debug!("file pick cancelled");
            return;
        };
        if !file.is_audio() {
            debug!(mime = %file.mime_type, "selected file does not report an audio type");
        }
        info!(uri = %file.uri, name = %file.name, "file selected");
        self.selected_file = Some(file);
        self.status = Status::FileSelected;
        self.is_scheduled = false;
        self.unload_session();
    }

    pub fn set_target_time(&mut self, target: DateTime<Utc>) {
        self.target_time = target;
    }

    /// Schedules the selected file for the current target time.
    pub fn schedule(&mut self) -> Result<()> {
        let Some(file) = self.selected_file.clone() else {
            self.alerts.push_back(Alert::selection_required());
            return Err(ValidationError::NoFileSelected.into());
        };
        self.schedule_with(file, self.target_time)
    }

    /// Persists the record, requests the notification and arms the timer, in
    /// that order. Replaces any earlier schedule.
    #[instrument(skip(self, file), fields(uri = %file.uri))]
    pub fn schedule_with(&mut self, file: SelectedFile, target: DateTime<Utc>) -> Result<()> {
        let now = self.clock.now();
        let delta = target.signed_duration_since(now);
        if delta <= Duration::zero() {
            self.alerts.push_back(Alert::invalid_time());
            return Err(ValidationError::TargetNotInFuture.into());
        }

        // A failed save leaves any earlier schedule armed and cancellable.
        let record = ScheduledPlayback::new(&file, target);
        if let Err(err) = self.slot.save(&record) {
            error!(%err, "failed to persist schedule");
            self.status = Status::SaveFailed;
            return Err(err.into());
        }
        self.timer.clear();

        if let Err(err) = self.notifier.cancel_all() {
            warn!(%err, "failed to cancel superseded notifications");
        }
        let seconds = ceil_seconds(delta);
        if self.permission == Some(PermissionStatus::Denied) {
            debug!("notifications denied; relying on the foreground timer");
        } else {
            let request = NotificationRequest {
                title: self.config.notification_title.clone(),
                body: format!("Time to play: {}", file.name),
                data: NotificationData {
                    uri: file.uri.clone(),
                },
                sound: true,
                delay_secs: seconds as u64,
                channel_id: self.config.channel.id.clone(),
            };
            match self.notifier.schedule(request) {
                Ok(id) => debug!(notification_id = %id, delay_secs = seconds, "notification scheduled"),
                Err(err) => warn!(%err, "failed to schedule notification"),
            }
        }

        let timer_id = self.timer.arm(target, file.uri.clone()).id;
        info!(timer_id, seconds, target = %target, "playback scheduled");
        self.selected_file = Some(file);
        self.target_time = target;
        self.is_scheduled = true;
        self.status = Status::Scheduled { seconds };
        Ok(())
    }

    /// Plays `uri` right away. The persisted record is only cleared once
    /// playback actually started.
    #[instrument(skip(self))]
    pub fn fire_now(&mut self, uri: &str) -> Result<()> {
        self.unload_session();
        info!(uri, "playing sound");
        let started = self
            .player
            .load(uri)
            .and_then(|mut session| session.play().map(|()| session));
        match started {
            Ok(session) => {
                self.session = Some(session);
                self.status = Status::Playing;
                self.is_scheduled = false;
                self.timer.clear();
                if let Err(err) = self.slot.clear() {
                    warn!(%err, "failed to clear persisted schedule after playback");
                }
                Ok(())
            }
            Err(err) => {
                error!(%err, uri, "play error");
                self.alerts.push_back(Alert::playback_failed());
                Err(err.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.clear() {
            debug!(timer_id = timer.id, "timer cleared");
        }
        self.is_scheduled = false;
        self.status = Status::Cancelled;
        if let Some(session) = self.session.as_mut() {
            if let Err(err) = session.stop() {
                warn!(%err, "failed to stop audio");
            }
        }
        if let Err(err) = self.slot.clear() {
            warn!(%err, "failed to clear persisted schedule");
        }
        if let Err(err) = self.notifier.cancel_all() {
            warn!(%err, "failed to cancel scheduled notifications");
        }
        info!("schedule cancelled");
    }

    /// Restores a persisted schedule on startup. Never starts playback.
    #[instrument(skip(self))]
    pub fn reconcile_on_mount(&mut self) -> ReconcileOutcome {
        let record = match self.slot.load() {
            Ok(Some(record)) => record,
            Ok(None) => return ReconcileOutcome::Idle,
            Err(err) => {
                error!(%err, "failed to restore state");
                return ReconcileOutcome::Idle;
            }
        };

        let now = self.clock.now();
        self.selected_file = Some(record.to_selected_file());
        self.target_time = record.target_time;
        let delta = record.remaining(now);

        if delta > Duration::zero() {
            let remaining_secs = ceil_seconds(delta);
            let timer_id = self
                .timer
                .arm(record.target_time, record.file_uri.clone())
                .id;
            self.is_scheduled = true;
            self.status = Status::Restored {
                seconds: remaining_secs,
            };
            info!(timer_id, remaining_secs, "restored schedule");
            return ReconcileOutcome::Armed { remaining_secs };
        }

        self.status = Status::TimePassed;
        let overdue = -delta;
        let discarded = self
            .config
            .stale_after
            .is_some_and(|window| overdue > window);
        if discarded {
            if let Err(err) = self.slot.clear() {
                warn!(%err, "failed to discard stale schedule");
            }
            info!(overdue_secs = overdue.num_seconds(), "discarded stale schedule");
        } else {
            info!(overdue_secs = overdue.num_seconds(), "scheduled time passed");
        }
        ReconcileOutcome::Expired { discarded }
    }

    /// A tap plays the persisted file however late it is.
    #[instrument(skip(self, response), fields(uri = %response.data.uri))]
    pub fn handle_notification_response(
        &mut self,
        response: &NotificationResponse,
    ) -> Result<TapOutcome> {
        let record = match self.slot.load() {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("notification tapped with no persisted schedule");
                return Ok(TapOutcome::NoSchedule);
            }
            Err(err) => {
                error!(%err, "error restoring schedule for notification");
                return Err(err.into());
            }
        };
        if record.file_uri != response.data.uri {
            warn!(
                tapped = %response.data.uri,
                persisted = %record.file_uri,
                "notification uri differs from persisted record; playing persisted record"
            );
        }
        self.selected_file = Some(record.to_selected_file());
        self.fire_now(&record.file_uri)?;
        Ok(TapOutcome::Played {
            uri: record.file_uri,
        })
    }

    /// Feeds pending notification taps from the scheduler into the controller.
    pub fn drain_notification_responses(&mut self) -> Vec<Result<TapOutcome>> {
        let responses = self.notifier.take_responses();
        responses
            .iter()
            .map(|response| self.handle_notification_response(response))
            .collect()
    }

    /// Fires the foreground timer once its deadline is reached.
    pub fn poll(&mut self) -> Option<Result<()>> {
        let now = self.clock.now();
        let timer = self.timer.take_due(now)?;
        info!(timer_id = timer.id, "timer fired");
        Some(self.fire_now(&timer.uri))
    }

    /// Time until the armed timer fires, for the event loop's next wake-up.
    pub fn next_deadline(&self) -> Option<std::time::Duration> {
        let now = self.clock.now();
        self.timer.current().map(|timer| timer.remaining(now))
    }

    /// Releases the audio session and the timer. Persisted state and OS
    /// notifications survive so the next launch can reconcile.
    pub fn shutdown(&mut self) {
        self.unload_session();
        self.timer.clear();
        debug!("controller shut down");
    }

    fn unload_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(err) = session.unload() {
                warn!(%err, "failed to unload audio session");
            }
        }
    }
}

/// The instant today at `time_of_day` in `now`'s time zone, as picked from a
/// clock-time picker. Returns `None` for local times skipped by a DST jump.
pub fn target_for_clock_time<Tz: TimeZone>(
    time_of_day: NaiveTime,
    now: &DateTime<Tz>,
) -> Option<DateTime<Utc>> {
    let naive = now.date_naive().and_time(time_of_day);
    now.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
