use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime, Timelike};
use egui::{Align2, Color32, RichText};
use songtimer_core::{
    controller::target_for_clock_time, picker::FilePicker, status::Alert, store::JsonFileStore,
    ScheduleController,
};
use tracing::{debug, info, warn};

use crate::platform;

const IDLE_REPAINT: StdDuration = StdDuration::from_secs(1);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) state_dir: PathBuf,
    pub(crate) stale_after: Option<chrono::Duration>,
    pub(crate) notifications_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("SONGTIMER_STATE_DIR") {
            if !dir.trim().is_empty() {
                config.state_dir = PathBuf::from(dir);
            }
        }
        if let Ok(minutes) = std::env::var("SONGTIMER_STALE_AFTER_MINUTES") {
            let value = minutes
                .trim()
                .parse::<i64>()
                .with_context(|| format!("invalid SONGTIMER_STALE_AFTER_MINUTES `{minutes}`"))?;
            config.stale_after = if value > 0 {
                Some(chrono::Duration::minutes(value))
            } else {
                None
            };
        }
        if let Ok(flag) = std::env::var("SONGTIMER_NOTIFICATIONS") {
            config.notifications_enabled = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "off" | "0" | "false" | "no"
            );
        }
        Ok(config)
    }

    pub fn state_dir(&self) -> &PathBuf {
        &self.state_dir
    }

    #[cfg(any(target_os = "android", target_os = "ios"))]
    pub(crate) fn bootstrap_mobile_defaults(&mut self, storage_root: Option<PathBuf>) {
        if let Some(mut root) = storage_root {
            root.push("songtimer");
            info!(path = %root.display(), "using mobile state directory");
            self.state_dir = root;
        }
    }

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    #[allow(dead_code)]
    pub(crate) fn bootstrap_mobile_defaults(&mut self, _storage_root: Option<PathBuf>) {}
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: dirs::data_local_dir()
                .map(|dir| dir.join("songtimer"))
                .unwrap_or_else(|| PathBuf::from(".")),
            stale_after: Some(chrono::Duration::hours(24)),
            notifications_enabled: true,
        }
    }
}

/// The single screen: track picker, start time, status, schedule/cancel.
struct SongTimerApp {
    controller: ScheduleController,
    picker: Box<dyn FilePicker>,
    hour: u32,
    minute: u32,
    manual_path: String,
    alerts: VecDeque<Alert>,
}

impl SongTimerApp {
    fn new(config: AppConfig) -> Result<Self> {
        info!(state_dir = %config.state_dir.display(), "initializing controller");
        let store = JsonFileStore::open(&config.state_dir).with_context(|| {
            format!("unable to open state directory {}", config.state_dir.display())
        })?;
        let mut controller = ScheduleController::builder()
            .with_store(Box::new(store))
            .with_notifier(platform::default_notifier(config.notifications_enabled))
            .with_player(platform::default_player())
            .stale_after(config.stale_after)
            .build()
            .context("failed to build schedule controller")?;

        let report = controller.initialize();
        info!(
            channel_ready = report.channel_ready,
            permission = ?report.permission,
            audio_ready = report.audio_ready,
            restored = ?report.restored,
            "controller initialized"
        );

        let shown = controller.target_time().with_timezone(&Local);
        Ok(Self {
            controller,
            picker: platform::default_picker(),
            hour: shown.hour(),
            minute: shown.minute(),
            manual_path: String::new(),
            alerts: VecDeque::new(),
        })
    }

    fn pump_events(&mut self) {
        for outcome in self.controller.drain_notification_responses() {
            match outcome {
                Ok(outcome) => debug!(?outcome, "notification response handled"),
                Err(err) => warn!(%err, "notification playback failed"),
            }
        }
        if let Some(Err(err)) = self.controller.poll() {
            warn!(%err, "scheduled playback failed");
        }
        self.alerts.extend(self.controller.take_alerts());
    }

    fn apply_clock_time(&mut self) {
        let Some(time) = NaiveTime::from_hms_opt(self.hour, self.minute, 0) else {
            return;
        };
        match target_for_clock_time(time, &Local::now()) {
            Some(target) => self.controller.set_target_time(target),
            None => warn!(%time, "start time does not exist today in the local time zone"),
        }
    }

    fn select_manual_path(&mut self) {
        match platform::picker::pick_from_path(&self.manual_path) {
            Ok(result) => {
                self.controller.select_file(result);
                self.manual_path.clear();
            }
            Err(err) => {
                warn!(%err, "typed path rejected");
                self.alerts.push_back(Alert::new("Error", err.to_string()));
            }
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading(RichText::new("Song Timer").size(28.0).strong());
            ui.label(
                RichText::new("Select a track and set a time to play").color(Color32::GRAY),
            );
        });
        ui.add_space(24.0);

        ui.group(|ui| {
            ui.label(RichText::new("SELECTED TRACK").small().strong());
            let track = self
                .controller
                .selected_file()
                .map(|file| file.name.clone())
                .unwrap_or_else(|| "Tap to select audio file".to_string());
            if ui.button(track).clicked() {
                if let Err(err) = self.controller.pick_file(self.picker.as_mut()) {
                    debug!(%err, "file pick failed");
                }
            }
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.manual_path)
                    .on_hover_text("Path to an audio file");
                if ui.button("Use path").clicked() {
                    self.select_manual_path();
                }
            });
        });
        ui.add_space(12.0);

        ui.group(|ui| {
            ui.label(RichText::new("START TIME").small().strong());
            ui.horizontal(|ui| {
                let hour = ui.add(
                    egui::DragValue::new(&mut self.hour)
                        .range(0..=23)
                        .custom_formatter(|n, _| format!("{n:02}")),
                );
                ui.label(":");
                let minute = ui.add(
                    egui::DragValue::new(&mut self.minute)
                        .range(0..=59)
                        .custom_formatter(|n, _| format!("{n:02}")),
                );
                if hour.changed() || minute.changed() {
                    self.apply_clock_time();
                }
            });
        });
        ui.add_space(12.0);

        let status = self.controller.status_message();
        if !status.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(status).color(Color32::LIGHT_BLUE));
            });
            ui.add_space(12.0);
        }

        ui.vertical_centered(|ui| {
            if !self.controller.is_scheduled() {
                let enabled = self.controller.selected_file().is_some();
                let button = egui::Button::new(RichText::new("Schedule Playback").strong());
                if ui.add_enabled(enabled, button).clicked() {
                    self.apply_clock_time();
                    if let Err(err) = self.controller.schedule() {
                        debug!(%err, "schedule rejected");
                    }
                }
            } else {
                let button = egui::Button::new(RichText::new("Stop / Cancel").strong())
                    .fill(Color32::from_rgb(239, 68, 68));
                if ui.add(button).clicked() {
                    self.controller.cancel();
                }
            }
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.alerts.front() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(alert.title.clone())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(alert.message.clone());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alerts.pop_front();
        }
    }
}

impl eframe::App for SongTimerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_events();
        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
        self.show_alert(ctx);
        let wake = self
            .controller
            .next_deadline()
            .map(|remaining| remaining.min(IDLE_REPAINT))
            .unwrap_or(IDLE_REPAINT);
        ctx.request_repaint_after(wake);
    }
}

impl Drop for SongTimerApp {
    fn drop(&mut self) {
        self.controller.shutdown();
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Song Timer")
            .with_inner_size([420.0, 560.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    run_with_options(config, options)
}

pub(crate) fn run_with_options(config: AppConfig, options: eframe::NativeOptions) -> Result<()> {
    info!("starting egui runtime");
    let app = SongTimerApp::new(config).context("failed to initialize song timer")?;
    eframe::run_native(
        "Song Timer",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
