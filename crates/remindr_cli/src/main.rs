//! Reminder alarm host binary.
//!
//! # Responsibility
//! - Wire `remindr_core` to real host capabilities (wall clock, SQLite
//!   settings slot, desktop notifications, optional speaker output).
//! - Drive the engine's tick schedule and reload the reminder snapshot when
//!   its source file changes.

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use remindr_core::db::open_db;
use remindr_core::{
    default_log_level, init_logging, parse_alarm_sound, AlarmEngine, AlarmSettingsPatch,
    AlarmSound, Clock, Reminder, SqliteSettingsRepository, SystemClock,
};
use rusqlite::Connection;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

#[cfg(feature = "rodio")]
type HostTones = remindr_core::RodioSynthesizer;
#[cfg(not(feature = "rodio"))]
type HostTones = remindr_core::SilentSynthesizer;

#[cfg(all(unix, not(target_os = "macos")))]
type HostNotifier = remindr_core::DesktopNotifier;
#[cfg(not(all(unix, not(target_os = "macos"))))]
type HostNotifier = remindr_core::DisabledNotifier;

type HostEngine<'conn> =
    AlarmEngine<SystemClock, SqliteSettingsRepository<'conn>, HostNotifier, HostTones>;

const DEFAULT_DB_FILE_NAME: &str = "remindr_settings.sqlite3";
/// Upper bound on one sleep so snapshot file changes are noticed promptly.
const MAX_IDLE_WAIT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(version, about = "Reminder alarm monitor")]
struct Cli {
    /// Settings database path. Defaults to the system temp directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch a JSON reminder snapshot and raise alarms as they come due.
    Watch {
        /// JSON array of reminders (`id`, `title`, `reminderDate`, ...).
        reminders: PathBuf,
    },
    /// Fire one test alarm through every enabled channel.
    TestAlarm,
    /// Show settings, applying any given changes first.
    Settings(SettingsArgs),
}

#[derive(Args)]
struct SettingsArgs {
    #[arg(long)]
    notifications: Option<bool>,
    #[arg(long)]
    sound_enabled: Option<bool>,
    /// default|bell|chime|beep
    #[arg(long, value_parser = parse_sound_arg)]
    sound: Option<AlarmSound>,
    #[arg(long)]
    volume: Option<i32>,
    #[arg(long)]
    advance_minutes: Option<u32>,
}

impl SettingsArgs {
    fn into_patch(self) -> AlarmSettingsPatch {
        AlarmSettingsPatch {
            enable_notifications: self.notifications,
            enable_sound: self.sound_enabled,
            alarm_sound: self.sound,
            volume: self.volume,
            advance_warning_minutes: self.advance_minutes,
        }
    }
}

fn parse_sound_arg(value: &str) -> Result<AlarmSound, String> {
    parse_alarm_sound(value).map_err(|err| err.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .unwrap_or_else(|| std::env::temp_dir().join("remindr-logs"));
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy())?;

    let db_path = cli
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let conn = open_db(&db_path)?;
    let mut engine = build_engine(&conn);

    match cli.command {
        Command::Watch { reminders } => watch(&mut engine, &reminders)?,
        Command::TestAlarm => {
            engine.request_permission();
            let id = engine.test_alarm();
            println!("fired test alarm {id}");
            // Let a detached tone finish before the output is dropped.
            thread::sleep(Duration::from_millis(600));
        }
        Command::Settings(args) => {
            let patch = args.into_patch();
            let settings = if patch.is_empty() {
                engine.settings()
            } else {
                engine.update_settings(&patch)
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    engine.cleanup();
    Ok(())
}

fn build_engine(conn: &Connection) -> HostEngine<'_> {
    AlarmEngine::new(
        SystemClock,
        SqliteSettingsRepository::new(conn),
        host_notifier(),
        HostTones::default(),
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn host_notifier() -> HostNotifier {
    // A terminal host has no window to raise; surface the click on stdout.
    remindr_core::DesktopNotifier::new().with_click_handler(std::sync::Arc::new(|tag: &str| {
        info!("event=notification_click module=cli status=ok tag={tag}");
        println!("opened: {tag}");
    }))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn host_notifier() -> HostNotifier {
    remindr_core::DisabledNotifier
}

fn watch(engine: &mut HostEngine<'_>, source: &Path) -> Result<(), Box<dyn Error>> {
    if !engine.is_supported() {
        warn!("event=watch module=cli status=degraded reason=notifications_unsupported");
    }
    engine.request_permission();

    let mut loaded_at = modified_at(source);
    engine.start_monitoring(read_snapshot(source)?);
    info!("event=watch module=cli status=start source={}", source.display());

    while let Some(deadline) = engine.next_deadline() {
        let wait_ms = deadline.saturating_sub(SystemClock.now_ms()).max(0) as u64;
        thread::sleep(Duration::from_millis(wait_ms).min(MAX_IDLE_WAIT));

        let current = modified_at(source);
        if current != loaded_at {
            match read_snapshot(source) {
                Ok(reminders) => {
                    info!(
                        "event=snapshot_reload module=cli status=ok reminders={}",
                        reminders.len()
                    );
                    engine.start_monitoring(reminders);
                    loaded_at = current;
                }
                Err(err) => warn!("event=snapshot_reload module=cli status=error error={err}"),
            }
        }

        for id in fired_ids(engine) {
            println!("alarm: {id}");
        }
    }
    Ok(())
}

fn fired_ids(engine: &mut HostEngine<'_>) -> Vec<String> {
    let before = engine.alerted_ids();
    engine.run_pending();
    engine
        .alerted_ids()
        .into_iter()
        .filter(|id| !before.contains(id))
        .collect()
}

fn read_snapshot(path: &Path) -> Result<Vec<Reminder>, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
