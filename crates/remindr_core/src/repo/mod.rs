//! Durable key-value slots for persisted preferences.
//!
//! # Responsibility
//! - Define the narrow slot contract the settings store depends on.
//! - Isolate SQLite details from settings orchestration.
//!
//! # Invariants
//! - A write overwrites the whole slot value.
//! - Reading an absent slot is `Ok(None)`, not an error.

pub mod settings_repo;
