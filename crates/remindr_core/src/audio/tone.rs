//! Tone description and offline rendering.

use crate::model::settings::AlarmSound;
use std::f32::consts::TAU;

/// Time at which the oscillator stops.
pub const TONE_STOP_SECS: f32 = 0.5;
/// Time at which the gain envelope reaches its peak.
pub const TONE_ATTACK_SECS: f32 = 0.1;

/// Oscillator frequency over the tone's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyShape {
    /// Exponential glide from `from_hz` to `to_hz`, then held.
    Sweep {
        from_hz: f32,
        to_hz: f32,
        over_secs: f32,
    },
    /// `(start_secs, hz)` pairs in ascending start order.
    Steps(Vec<(f32, f32)>),
    Constant(f32),
}

impl FrequencyShape {
    pub fn for_sound(sound: AlarmSound) -> Self {
        match sound {
            AlarmSound::Bell => Self::Sweep {
                from_hz: 800.0,
                to_hz: 400.0,
                over_secs: 0.5,
            },
            // C5, E5, G5
            AlarmSound::Chime => Self::Steps(vec![(0.0, 523.0), (0.2, 659.0), (0.4, 784.0)]),
            AlarmSound::Beep => Self::Constant(1000.0),
            AlarmSound::Default => Self::Sweep {
                from_hz: 600.0,
                to_hz: 300.0,
                over_secs: 0.3,
            },
        }
    }

    /// Frequency in Hz at `t` seconds after start.
    pub fn at(&self, t: f32) -> f32 {
        match self {
            Self::Sweep {
                from_hz,
                to_hz,
                over_secs,
            } => {
                if t <= 0.0 {
                    *from_hz
                } else if t >= *over_secs {
                    *to_hz
                } else {
                    from_hz * (to_hz / from_hz).powf(t / over_secs)
                }
            }
            Self::Steps(steps) => steps
                .iter()
                .take_while(|(start, _)| *start <= t)
                .last()
                .or_else(|| steps.first())
                .map_or(0.0, |(_, hz)| *hz),
            Self::Constant(hz) => *hz,
        }
    }
}

/// A fully specified alarm tone: oscillator shape plus gain envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub frequency: FrequencyShape,
    /// Envelope peak, 0.0..=1.0.
    pub peak_gain: f32,
    pub attack_secs: f32,
    pub stop_secs: f32,
}

impl Tone {
    /// Builds the tone for `sound` at `volume_percent`, clamped to 0..=100.
    pub fn for_profile(sound: AlarmSound, volume_percent: i32) -> Self {
        Self {
            frequency: FrequencyShape::for_sound(sound),
            peak_gain: volume_percent.clamp(0, 100) as f32 / 100.0,
            attack_secs: TONE_ATTACK_SECS,
            stop_secs: TONE_STOP_SECS,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        self.stop_secs
    }

    pub fn frequency_at(&self, t: f32) -> f32 {
        self.frequency.at(t)
    }

    /// Linear attack to `peak_gain`, linear release to zero at `stop_secs`.
    pub fn gain_at(&self, t: f32) -> f32 {
        if t <= 0.0 || t >= self.stop_secs {
            0.0
        } else if t <= self.attack_secs {
            self.peak_gain * t / self.attack_secs
        } else {
            self.peak_gain * (self.stop_secs - t) / (self.stop_secs - self.attack_secs)
        }
    }

    /// Renders mono samples with a phase-accumulating sine oscillator.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let total = (self.stop_secs * rate).round() as usize;
        let mut phase = 0.0_f32;
        let mut samples = Vec::with_capacity(total);

        for index in 0..total {
            let t = index as f32 / rate;
            samples.push(phase.sin() * self.gain_at(t));
            phase = (phase + TAU * self.frequency_at(t) / rate) % TAU;
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::{FrequencyShape, Tone};
    use crate::model::settings::AlarmSound;

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.05,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn bell_sweeps_from_800_to_400_over_half_second() {
        let shape = FrequencyShape::for_sound(AlarmSound::Bell);
        approx(shape.at(0.0), 800.0);
        approx(shape.at(0.25), 800.0 * 0.5_f32.sqrt());
        approx(shape.at(0.5), 400.0);
    }

    #[test]
    fn default_sweeps_from_600_to_300_then_holds() {
        let shape = FrequencyShape::for_sound(AlarmSound::Default);
        approx(shape.at(0.0), 600.0);
        approx(shape.at(0.3), 300.0);
        approx(shape.at(0.45), 300.0);
    }

    #[test]
    fn chime_steps_through_c_e_g() {
        let shape = FrequencyShape::for_sound(AlarmSound::Chime);
        approx(shape.at(0.0), 523.0);
        approx(shape.at(0.19), 523.0);
        approx(shape.at(0.2), 659.0);
        approx(shape.at(0.39), 659.0);
        approx(shape.at(0.4), 784.0);
    }

    #[test]
    fn beep_is_constant() {
        let tone = Tone::for_profile(AlarmSound::Beep, 80);
        approx(tone.frequency_at(0.0), 1000.0);
        approx(tone.frequency_at(0.49), 1000.0);
    }

    #[test]
    fn envelope_peaks_at_volume_and_ends_silent() {
        let tone = Tone::for_profile(AlarmSound::Default, 40);
        approx(tone.gain_at(0.0), 0.0);
        approx(tone.gain_at(0.05), 0.2);
        approx(tone.gain_at(0.1), 0.4);
        approx(tone.gain_at(0.3), 0.2);
        approx(tone.gain_at(0.5), 0.0);
    }

    #[test]
    fn volume_is_clamped() {
        approx(Tone::for_profile(AlarmSound::Beep, 150).peak_gain, 1.0);
        approx(Tone::for_profile(AlarmSound::Beep, -10).peak_gain, 0.0);
    }

    #[test]
    fn render_covers_full_duration_within_gain_bounds() {
        let tone = Tone::for_profile(AlarmSound::Chime, 50);
        let samples = tone.render(8_000);

        assert_eq!(samples.len(), 4_000);
        assert!(samples.iter().all(|sample| sample.abs() <= 0.5 + f32::EPSILON));
        assert!(samples.iter().any(|sample| sample.abs() > 0.1));
    }

    #[test]
    fn zero_volume_renders_silence() {
        let samples = Tone::for_profile(AlarmSound::Bell, 0).render(8_000);
        assert!(samples.iter().all(|sample| *sample == 0.0));
    }
}
