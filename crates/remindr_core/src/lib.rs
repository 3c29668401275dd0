//! Reminder alarm core.
//!
//! Evaluates caller-supplied reminder snapshots on a fixed cadence and raises
//! one sound + notification alert per reminder occurrence. Host capabilities
//! (clock, settings slot, notifications, audio) are injected.

pub mod alarm;
pub mod audio;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use alarm::{
    classify, AlarmEngine, Clock, ManualClock, MonitorState, ReminderTiming, SystemClock,
    STALE_CUTOFF_MS, TICK_INTERVAL_MS, WARMUP_DELAY_MS,
};
pub use audio::{AudioSynthesizer, FrequencyShape, SilentSynthesizer, Tone, ToneSynthesizer};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::reminder::Reminder;
pub use model::settings::{
    parse_alarm_sound, AlarmSettings, AlarmSettingsPatch, AlarmSound, AlarmSoundParseError,
};
pub use notify::{
    DisabledNotifier, Notification, NotificationDispatcher, NotificationSink, PermissionState,
};
pub use repo::settings_repo::{
    MemorySettingsRepository, RepoError, RepoResult, SettingsRepository, SqliteSettingsRepository,
};
pub use service::settings_store::{SettingsStore, ALARM_SETTINGS_KEY};

#[cfg(feature = "rodio")]
pub use audio::RodioSynthesizer;
#[cfg(all(unix, not(target_os = "macos")))]
pub use notify::{ClickHandler, DesktopNotifier};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
