pub mod audio;
pub mod clock;
pub mod controller;
pub mod error;
pub mod notifications;
pub mod picker;
pub mod playback;
pub mod status;
pub mod store;
pub mod timer;

pub use crate::controller::{
    ControllerConfig, InitReport, ReconcileOutcome, ScheduleController,
    ScheduleControllerBuilder, TapOutcome,
};
pub use crate::error::{Result, ScheduleError};
pub use crate::playback::{PickResult, ScheduledPlayback, SelectedFile};
