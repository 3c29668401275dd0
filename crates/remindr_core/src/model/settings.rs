//! Alarm preference model.
//!
//! # Responsibility
//! - Define the process-wide alarm preferences and their defaults.
//! - Provide the partial-update shape used by settings updates.
//!
//! # Invariants
//! - Persisted objects merge over `AlarmSettings::default()` field by field.
//! - `volume` is not range-checked here; the audio layer clamps at play time.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named tone profile selecting frequency shape in the synthesizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    #[default]
    Default,
    Bell,
    Chime,
    Beep,
}

impl AlarmSound {
    /// Stable string id used in persisted settings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Bell => "bell",
            Self::Chime => "chime",
            Self::Beep => "beep",
        }
    }
}

impl Display for AlarmSound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one alarm sound from its string id.
pub fn parse_alarm_sound(value: &str) -> Result<AlarmSound, AlarmSoundParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Err(AlarmSoundParseError::Empty),
        "default" => Ok(AlarmSound::Default),
        "bell" => Ok(AlarmSound::Bell),
        "chime" => Ok(AlarmSound::Chime),
        "beep" => Ok(AlarmSound::Beep),
        other => Err(AlarmSoundParseError::Unsupported(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmSoundParseError {
    Empty,
    Unsupported(String),
}

impl Display for AlarmSoundParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "alarm sound must not be empty"),
            Self::Unsupported(value) => write!(
                f,
                "alarm sound is unsupported: {value}; expected default|bell|chime|beep"
            ),
        }
    }
}

impl Error for AlarmSoundParseError {}

/// Process-wide alarm preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmSettings {
    pub enable_notifications: bool,
    pub enable_sound: bool,
    pub alarm_sound: AlarmSound,
    /// Percent, nominally 0..=100.
    pub volume: i32,
    /// How long before `reminder_date` an alert may first fire.
    pub advance_warning_minutes: u32,
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            enable_sound: true,
            alarm_sound: AlarmSound::Default,
            volume: 80,
            advance_warning_minutes: 5,
        }
    }
}

impl AlarmSettings {
    /// Advance-warning window in milliseconds.
    pub fn advance_window_ms(&self) -> i64 {
        i64::from(self.advance_warning_minutes) * 60_000
    }
}

/// Partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmSettingsPatch {
    pub enable_notifications: Option<bool>,
    pub enable_sound: Option<bool>,
    pub alarm_sound: Option<AlarmSound>,
    pub volume: Option<i32>,
    pub advance_warning_minutes: Option<u32>,
}

impl AlarmSettingsPatch {
    /// Returns whether this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges set fields into `settings`.
    pub fn apply_to(&self, settings: &mut AlarmSettings) {
        if let Some(value) = self.enable_notifications {
            settings.enable_notifications = value;
        }
        if let Some(value) = self.enable_sound {
            settings.enable_sound = value;
        }
        if let Some(value) = self.alarm_sound {
            settings.alarm_sound = value;
        }
        if let Some(value) = self.volume {
            settings.volume = value;
        }
        if let Some(value) = self.advance_warning_minutes {
            settings.advance_warning_minutes = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_alarm_sound, AlarmSettings, AlarmSettingsPatch, AlarmSound, AlarmSoundParseError,
    };

    #[test]
    fn defaults_match_documented_values() {
        let settings = AlarmSettings::default();
        assert!(settings.enable_notifications);
        assert!(settings.enable_sound);
        assert_eq!(settings.alarm_sound, AlarmSound::Default);
        assert_eq!(settings.volume, 80);
        assert_eq!(settings.advance_warning_minutes, 5);
        assert_eq!(settings.advance_window_ms(), 300_000);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let settings: AlarmSettings =
            serde_json::from_str(r#"{"alarmSound":"chime","volume":15}"#).expect("partial json");
        assert_eq!(settings.alarm_sound, AlarmSound::Chime);
        assert_eq!(settings.volume, 15);
        assert!(settings.enable_sound);
        assert_eq!(settings.advance_warning_minutes, 5);
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut settings = AlarmSettings::default();
        let patch = AlarmSettingsPatch {
            volume: Some(40),
            ..AlarmSettingsPatch::default()
        };
        assert!(!patch.is_empty());

        patch.apply_to(&mut settings);
        assert_eq!(
            settings,
            AlarmSettings {
                volume: 40,
                ..AlarmSettings::default()
            }
        );
    }

    #[test]
    fn parse_alarm_sound_accepts_known_ids() {
        assert_eq!(parse_alarm_sound(" Bell ").expect("bell"), AlarmSound::Bell);
        assert_eq!(parse_alarm_sound("beep").expect("beep"), AlarmSound::Beep);
        assert_eq!(parse_alarm_sound(""), Err(AlarmSoundParseError::Empty));
        assert!(matches!(
            parse_alarm_sound("gong"),
            Err(AlarmSoundParseError::Unsupported(value)) if value == "gong"
        ));
    }
}
