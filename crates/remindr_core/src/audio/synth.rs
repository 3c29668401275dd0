//! Tone output capability and the profile-level synthesizer.

use super::tone::Tone;
use crate::model::settings::AlarmSound;
use log::debug;

/// Host audio output capability.
///
/// Implementations must never panic; failures degrade to silence.
pub trait ToneSynthesizer {
    /// Whether the host can produce audio at all.
    fn is_supported(&self) -> bool;
    /// Starts playing `tone` without blocking the caller.
    fn play(&mut self, tone: &Tone);
    /// Releases any lazily created output context.
    fn release(&mut self);
}

/// Output for hosts without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSynthesizer;

impl ToneSynthesizer for SilentSynthesizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn play(&mut self, _tone: &Tone) {}

    fn release(&mut self) {}
}

/// Maps alarm sound profiles onto a tone output.
pub struct AudioSynthesizer<T: ToneSynthesizer> {
    output: T,
}

impl<T: ToneSynthesizer> AudioSynthesizer<T> {
    pub fn new(output: T) -> Self {
        Self { output }
    }

    pub fn is_supported(&self) -> bool {
        self.output.is_supported()
    }

    /// Plays `sound` at `volume_percent`; a silent no-op on unsupported hosts.
    pub fn play(&mut self, sound: AlarmSound, volume_percent: i32) {
        if !self.output.is_supported() {
            debug!("event=tone_play module=audio status=skipped reason=unsupported sound={sound}");
            return;
        }
        let tone = Tone::for_profile(sound, volume_percent);
        debug!(
            "event=tone_play module=audio status=ok sound={sound} gain={:.2}",
            tone.peak_gain
        );
        self.output.play(&tone);
    }

    pub fn release(&mut self) {
        self.output.release();
    }

    pub fn output(&self) -> &T {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioSynthesizer, SilentSynthesizer, ToneSynthesizer};
    use crate::audio::tone::Tone;
    use crate::model::settings::AlarmSound;

    #[derive(Default)]
    struct RecordingOutput {
        played: Vec<Tone>,
        released: usize,
    }

    impl ToneSynthesizer for RecordingOutput {
        fn is_supported(&self) -> bool {
            true
        }

        fn play(&mut self, tone: &Tone) {
            self.played.push(tone.clone());
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    #[test]
    fn play_builds_profile_tone() {
        let mut synth = AudioSynthesizer::new(RecordingOutput::default());
        synth.play(AlarmSound::Chime, 250);
        synth.release();

        assert_eq!(synth.output().played, vec![Tone::for_profile(AlarmSound::Chime, 100)]);
        assert_eq!(synth.output().released, 1);
    }

    #[test]
    fn silent_output_is_a_no_op() {
        let mut synth = AudioSynthesizer::new(SilentSynthesizer);
        assert!(!synth.is_supported());
        synth.play(AlarmSound::Beep, 80);
        synth.release();
    }
}
