//! Reminder alarm scheduling.
//!
//! # Responsibility
//! - Re-evaluate the current reminder snapshot on a fixed cadence.
//! - Fire each qualifying reminder once through sound and notification.
//!
//! # Invariants
//! - Evaluation is synchronous; no two evaluations overlap.
//! - A reminder fires at most once while it stays in the snapshot, open.
//! - Time comes only from the injected `Clock`.

pub mod clock;
pub mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    classify, AlarmEngine, MonitorState, ReminderTiming, STALE_CUTOFF_MS, TICK_INTERVAL_MS,
    WARMUP_DELAY_MS,
};
