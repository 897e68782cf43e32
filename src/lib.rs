pub mod controller;
pub mod device;
pub mod error;
pub mod schedule;
pub mod ticker;
pub mod timesync;
pub mod timeutil;

pub use controller::{LightDraft, LightStateController};
pub use device::{
    DeviceClient, DeviceClientConfig, LightStateTransport, NtpStatus, NtpSyncStatus,
};
pub use error::{DeviceError, LocalTimeError, OperationKind, SyncError};
pub use schedule::activity::{Activity, classify, classify_at};
pub use schedule::editor::{EntryId, ScheduleEditor, ScheduleEntry};
pub use schedule::model::{LightState, RgbColor, RgbPins, Schedule, WEEKDAY_NAMES, weekday_name};
pub use ticker::ActivityTicker;
pub use timesync::{ClockCorrection, correct_device_clock};
pub use timeutil::{
    format_local_datetime, is_epoch_past, is_within_daily_window, is_within_window,
    parse_local_datetime,
};
