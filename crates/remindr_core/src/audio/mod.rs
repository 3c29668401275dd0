//! Alarm tone synthesis.
//!
//! # Responsibility
//! - Describe each alarm sound profile as a concrete tone.
//! - Play tones through a host output that may be missing.
//!
//! # Invariants
//! - Playing never fails; unsupported hosts are a silent no-op.
//! - Volume is clamped to 0..=100 only here, at play time.

pub mod synth;
pub mod tone;

#[cfg(feature = "rodio")]
pub mod rodio_output;

pub use synth::{AudioSynthesizer, SilentSynthesizer, ToneSynthesizer};
pub use tone::{FrequencyShape, Tone};

#[cfg(feature = "rodio")]
pub use rodio_output::RodioSynthesizer;
