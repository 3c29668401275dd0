//! Alarm settings store.
//!
//! # Responsibility
//! - Load persisted alarm preferences merged over defaults.
//! - Persist updates wholesale to one named slot.
//!
//! # Invariants
//! - `load`, `save` and `update` never fail; storage problems are logged.
//! - In-memory settings reflect the last update even if persisting failed.

use crate::model::settings::{AlarmSettings, AlarmSettingsPatch};
use crate::repo::settings_repo::SettingsRepository;
use log::{debug, error, warn};

/// Slot key holding the serialized `AlarmSettings`.
pub const ALARM_SETTINGS_KEY: &str = "alarm_settings";

/// Settings use-case service over a slot repository.
pub struct SettingsStore<R: SettingsRepository> {
    repo: R,
    current: AlarmSettings,
}

impl<R: SettingsRepository> SettingsStore<R> {
    /// Creates the store and loads current settings from `repo`.
    pub fn new(repo: R) -> Self {
        let current = load_from(&repo);
        Self { repo, current }
    }

    /// Re-reads the slot, replacing in-memory settings.
    pub fn load(&mut self) -> AlarmSettings {
        self.current = load_from(&self.repo);
        self.current.clone()
    }

    /// Persists `settings` as the new current value.
    pub fn save(&mut self, settings: AlarmSettings) {
        self.current = settings;
        self.persist();
    }

    /// Merges `patch` into current settings, persists and returns the result.
    ///
    /// No range validation happens here; `volume` is clamped at play time.
    pub fn update(&mut self, patch: &AlarmSettingsPatch) -> AlarmSettings {
        patch.apply_to(&mut self.current);
        self.persist();
        self.current.clone()
    }

    /// Returns in-memory settings without touching storage.
    pub fn current(&self) -> &AlarmSettings {
        &self.current
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.current) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=settings_save module=settings status=error error_code=encode_failed error={err}"
                );
                return;
            }
        };
        match self.repo.write_slot(ALARM_SETTINGS_KEY, &encoded) {
            Ok(()) => debug!("event=settings_save module=settings status=ok"),
            Err(err) => {
                error!(
                    "event=settings_save module=settings status=error error_code=write_failed error={err}"
                )
            }
        }
    }
}

fn load_from<R: SettingsRepository>(repo: &R) -> AlarmSettings {
    let raw = match repo.read_slot(ALARM_SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=settings_load module=settings status=ok source=defaults");
            return AlarmSettings::default();
        }
        Err(err) => {
            warn!(
                "event=settings_load module=settings status=fallback error_code=read_failed error={err}"
            );
            return AlarmSettings::default();
        }
    };

    match serde_json::from_str::<AlarmSettings>(&raw) {
        Ok(settings) => {
            debug!("event=settings_load module=settings status=ok source=slot");
            settings
        }
        Err(err) => {
            warn!(
                "event=settings_load module=settings status=fallback error_code=corrupt_slot error={err}"
            );
            AlarmSettings::default()
        }
    }
}
