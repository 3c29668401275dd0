//! Domain model for reminder alerting.
//!
//! # Responsibility
//! - Define the reminder snapshot records handed in by page-level code.
//! - Define the persisted alarm preferences and their defaults.
//!
//! # Invariants
//! - Reminder `id` is unique within one snapshot.
//! - Settings always deserialize; missing fields fall back to defaults.

pub mod reminder;
pub mod settings;
