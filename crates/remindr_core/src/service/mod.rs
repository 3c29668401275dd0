//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Keep engine and host code decoupled from slot storage details.

pub mod settings_store;
