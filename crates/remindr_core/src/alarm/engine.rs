//! Alarm engine: monitoring state machine, evaluation tick and dedup.

use super::clock::Clock;
use crate::audio::{AudioSynthesizer, ToneSynthesizer};
use crate::model::reminder::Reminder;
use crate::model::settings::{AlarmSettings, AlarmSettingsPatch};
use crate::notify::{NotificationDispatcher, NotificationSink, PermissionState};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::settings_store::SettingsStore;
use log::{debug, info};
use std::collections::HashSet;
use uuid::Uuid;

/// Cadence of the recurring evaluation.
pub const TICK_INTERVAL_MS: i64 = 10_000;
/// One extra evaluation this long after monitoring starts.
pub const WARMUP_DELAY_MS: i64 = 5_000;
/// Reminders overdue by more than this are never fired.
pub const STALE_CUTOFF_MS: i64 = 5 * 60_000;

const TEST_ALARM_TITLE: &str = "Test Alarm";
const TEST_ALARM_DESCRIPTION: &str = "This is a test of your alarm settings";

/// Monitoring lifecycle. Deadlines are epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running {
        next_tick_at: i64,
        /// Pending one-shot evaluation after start; `None` once it ran.
        warmup_at: Option<i64>,
    },
}

/// Timing class of one reminder at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTiming {
    Completed,
    /// Due later than the advance-warning window.
    Upcoming,
    WithinWindow,
    /// Overdue past the staleness cutoff.
    Stale,
}

/// Classifies `reminder` at `now_ms` for an advance window of `advance_window_ms`.
///
/// The window boundary is inclusive; the staleness cutoff is exclusive.
pub fn classify(reminder: &Reminder, now_ms: i64, advance_window_ms: i64) -> ReminderTiming {
    if reminder.completed {
        return ReminderTiming::Completed;
    }
    let delta = reminder.reminder_date.saturating_sub(now_ms);
    if delta < -STALE_CUTOFF_MS {
        ReminderTiming::Stale
    } else if delta <= advance_window_ms {
        ReminderTiming::WithinWindow
    } else {
        ReminderTiming::Upcoming
    }
}

/// Client-side reminder alarm service.
///
/// Constructed once by the host and shared by reference. The host drives it
/// by calling `run_pending` whenever `next_deadline` has passed.
pub struct AlarmEngine<C, R, N, T>
where
    C: Clock,
    R: SettingsRepository,
    N: NotificationSink,
    T: ToneSynthesizer,
{
    clock: C,
    settings: SettingsStore<R>,
    notifier: NotificationDispatcher<N>,
    synthesizer: AudioSynthesizer<T>,
    reminders: Vec<Reminder>,
    alerted: HashSet<String>,
    state: MonitorState,
}

impl<C, R, N, T> AlarmEngine<C, R, N, T>
where
    C: Clock,
    R: SettingsRepository,
    N: NotificationSink,
    T: ToneSynthesizer,
{
    /// Wires the engine; settings are loaded (or defaulted) immediately.
    pub fn new(clock: C, settings_repo: R, notifications: N, tones: T) -> Self {
        Self {
            clock,
            settings: SettingsStore::new(settings_repo),
            notifier: NotificationDispatcher::new(notifications),
            synthesizer: AudioSynthesizer::new(tones),
            reminders: Vec::new(),
            alerted: HashSet::new(),
            state: MonitorState::Idle,
        }
    }

    /// Replaces the snapshot and (re)starts the tick schedule.
    ///
    /// Any previous schedule is stopped first. Dedup entries for reminders
    /// missing from the new snapshot are dropped right away.
    pub fn start_monitoring(&mut self, reminders: Vec<Reminder>) {
        self.stop_monitoring();
        self.reminders = reminders;
        self.purge_alerted();

        let now = self.clock.now_ms();
        self.state = MonitorState::Running {
            next_tick_at: now + TICK_INTERVAL_MS,
            warmup_at: Some(now + WARMUP_DELAY_MS),
        };
        info!(
            "event=monitor_start module=alarm status=ok reminders={} alerted={}",
            self.reminders.len(),
            self.alerted.len()
        );
    }

    /// Cancels future ticks. Idempotent.
    pub fn stop_monitoring(&mut self) {
        if self.state != MonitorState::Idle {
            self.state = MonitorState::Idle;
            info!("event=monitor_stop module=alarm status=ok");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        matches!(self.state, MonitorState::Running { .. })
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.state
    }

    /// Earliest pending evaluation, if monitoring.
    pub fn next_deadline(&self) -> Option<i64> {
        match self.state {
            MonitorState::Idle => None,
            MonitorState::Running {
                next_tick_at,
                warmup_at,
            } => Some(warmup_at.map_or(next_tick_at, |at| at.min(next_tick_at))),
        }
    }

    /// Runs every evaluation whose deadline has passed and returns how many ran.
    ///
    /// Several missed periodic ticks collapse into a single evaluation.
    pub fn run_pending(&mut self) -> usize {
        let mut runs = 0;
        while let MonitorState::Running {
            next_tick_at,
            warmup_at,
        } = self.state
        {
            let now = self.clock.now_ms();
            if let Some(at) = warmup_at.filter(|at| *at <= now) {
                debug!("event=monitor_warmup module=alarm status=ok due_at={at}");
                self.state = MonitorState::Running {
                    next_tick_at,
                    warmup_at: None,
                };
            } else if next_tick_at <= now {
                let missed = (now - next_tick_at) / TICK_INTERVAL_MS;
                self.state = MonitorState::Running {
                    next_tick_at: next_tick_at + (missed + 1) * TICK_INTERVAL_MS,
                    warmup_at,
                };
            } else {
                break;
            }
            self.check_reminders();
            runs += 1;
        }
        runs
    }

    /// One synchronous evaluation pass. Returns ids fired by this pass.
    pub fn check_reminders(&mut self) -> Vec<String> {
        let now = self.clock.now_ms();
        let settings = self.settings.current().clone();
        self.purge_alerted();

        let window = settings.advance_window_ms();
        let candidates: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|reminder| !self.alerted.contains(&reminder.id))
            .filter(|reminder| classify(reminder, now, window) == ReminderTiming::WithinWindow)
            .cloned()
            .collect();

        let mut fired = Vec::with_capacity(candidates.len());
        for reminder in candidates {
            if !self.alerted.insert(reminder.id.clone()) {
                continue;
            }
            self.dispatch(&reminder, &settings);
            fired.push(reminder.id);
        }

        debug!(
            "event=alarm_tick module=alarm status=ok now={now} reminders={} fired={} alerted={}",
            self.reminders.len(),
            fired.len(),
            self.alerted.len()
        );
        fired
    }

    /// Fires a synthetic reminder through both channels, bypassing dedup.
    ///
    /// Returns the generated reminder id.
    pub fn test_alarm(&mut self) -> String {
        let now = self.clock.now_ms();
        let reminder = Reminder {
            id: format!("test-{}", Uuid::new_v4()),
            title: TEST_ALARM_TITLE.to_string(),
            description: Some(TEST_ALARM_DESCRIPTION.to_string()),
            reminder_date: now,
            completed: false,
            created_at: now,
        };
        let settings = self.settings.current().clone();
        self.dispatch(&reminder, &settings);
        reminder.id
    }

    pub fn update_settings(&mut self, patch: &AlarmSettingsPatch) -> AlarmSettings {
        let updated = self.settings.update(patch);
        info!(
            "event=settings_update module=alarm status=ok sound={} volume={} advance_minutes={}",
            updated.alarm_sound, updated.volume, updated.advance_warning_minutes
        );
        updated
    }

    pub fn settings(&self) -> AlarmSettings {
        self.settings.current().clone()
    }

    /// Stops monitoring and releases the audio output.
    pub fn cleanup(&mut self) {
        self.stop_monitoring();
        self.synthesizer.release();
    }

    /// Whether the host can show notifications at all.
    pub fn is_supported(&self) -> bool {
        self.notifier.is_supported()
    }

    pub fn permission_state(&self) -> PermissionState {
        self.notifier.permission()
    }

    pub fn request_permission(&mut self) -> bool {
        self.notifier.request_permission()
    }

    /// Ids currently suppressed by dedup, sorted.
    pub fn alerted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.alerted.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn notification_sink(&self) -> &N {
        self.notifier.sink()
    }

    pub fn tone_output(&self) -> &T {
        self.synthesizer.output()
    }

    fn purge_alerted(&mut self) {
        let live: HashSet<&str> = self
            .reminders
            .iter()
            .filter(|reminder| reminder.is_active())
            .map(|reminder| reminder.id.as_str())
            .collect();
        self.alerted.retain(|id| live.contains(id.as_str()));
    }

    fn dispatch(&mut self, reminder: &Reminder, settings: &AlarmSettings) {
        info!(
            "event=alarm_fired module=alarm status=ok reminder_id={} sound={} notify={}",
            reminder.id, settings.enable_sound, settings.enable_notifications
        );
        if settings.enable_sound {
            self.synthesizer.play(settings.alarm_sound, settings.volume);
        }
        if settings.enable_notifications {
            self.notifier.show(reminder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, ReminderTiming, STALE_CUTOFF_MS};
    use crate::model::reminder::Reminder;

    const NOW: i64 = 1_700_000_000_000;
    const WINDOW: i64 = 5 * 60_000;

    fn at(offset_ms: i64) -> Reminder {
        Reminder::new("r", "t", NOW + offset_ms)
    }

    #[test]
    fn window_boundary_is_inclusive() {
        assert_eq!(classify(&at(WINDOW), NOW, WINDOW), ReminderTiming::WithinWindow);
        assert_eq!(classify(&at(WINDOW + 1_000), NOW, WINDOW), ReminderTiming::Upcoming);
    }

    #[test]
    fn staleness_cutoff_is_exclusive() {
        assert_eq!(
            classify(&at(-STALE_CUTOFF_MS), NOW, WINDOW),
            ReminderTiming::WithinWindow
        );
        assert_eq!(
            classify(&at(-STALE_CUTOFF_MS - 1), NOW, WINDOW),
            ReminderTiming::Stale
        );
    }

    #[test]
    fn zero_window_waits_until_due() {
        assert_eq!(classify(&at(1), NOW, 0), ReminderTiming::Upcoming);
        assert_eq!(classify(&at(0), NOW, 0), ReminderTiming::WithinWindow);
    }

    #[test]
    fn completed_wins_over_timing() {
        let mut reminder = at(0);
        reminder.completed = true;
        assert_eq!(classify(&reminder, NOW, WINDOW), ReminderTiming::Completed);
    }
}
