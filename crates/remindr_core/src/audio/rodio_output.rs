//! Speaker output via `rodio`.

use super::synth::ToneSynthesizer;
use super::tone::Tone;
use log::{info, warn};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::fmt::Display;

const SAMPLE_RATE: u32 = 44_100;

/// Output context opened on first use.
///
/// A failed open is not retried until `release`.
#[derive(Debug)]
struct LazyOutput<S> {
    stream: Option<S>,
    open_failed: bool,
}

impl<S> Default for LazyOutput<S> {
    fn default() -> Self {
        Self {
            stream: None,
            open_failed: false,
        }
    }
}

impl<S> LazyOutput<S> {
    fn get_or_open<E: Display>(&mut self, open: impl FnOnce() -> Result<S, E>) -> Option<&S> {
        if self.stream.is_none() && !self.open_failed {
            match open() {
                Ok(stream) => {
                    info!("event=audio_open module=audio status=ok");
                    self.stream = Some(stream);
                }
                Err(err) => {
                    warn!("event=audio_open module=audio status=error error={err}");
                    self.open_failed = true;
                }
            }
        }
        self.stream.as_ref()
    }

    fn is_supported(&self) -> bool {
        !self.open_failed
    }

    /// Drops the context and re-arms opening. Returns whether one was open.
    fn release(&mut self) -> bool {
        self.open_failed = false;
        self.stream.take().is_some()
    }
}

/// Default output device, opened on first play.
#[derive(Default)]
pub struct RodioSynthesizer {
    output: LazyOutput<(OutputStream, OutputStreamHandle)>,
}

impl RodioSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneSynthesizer for RodioSynthesizer {
    fn is_supported(&self) -> bool {
        self.output.is_supported()
    }

    fn play(&mut self, tone: &Tone) {
        let Some((_, handle)) = self.output.get_or_open(OutputStream::try_default) else {
            return;
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, tone.render(SAMPLE_RATE)));
                sink.detach();
            }
            Err(err) => warn!("event=tone_play module=audio status=error error={err}"),
        }
    }

    fn release(&mut self) {
        if self.output.release() {
            info!("event=audio_release module=audio status=ok");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LazyOutput;

    #[test]
    fn opens_once_and_reuses_context() {
        let mut output = LazyOutput::<u32>::default();
        let mut opens = 0;

        for _ in 0..3 {
            let stream = output.get_or_open(|| {
                opens += 1;
                Ok::<_, String>(7)
            });
            assert_eq!(stream, Some(&7));
        }
        assert_eq!(opens, 1);
        assert!(output.is_supported());
    }

    #[test]
    fn failed_open_is_not_retried_until_release() {
        let mut output = LazyOutput::<u32>::default();
        let mut opens = 0;

        for _ in 0..2 {
            let stream = output.get_or_open(|| {
                opens += 1;
                Err::<u32, _>("no device")
            });
            assert_eq!(stream, None);
        }
        assert_eq!(opens, 1);
        assert!(!output.is_supported());

        assert!(!output.release());
        assert!(output.is_supported());
        assert_eq!(output.get_or_open(|| Ok::<_, String>(3)), Some(&3));
    }

    #[test]
    fn release_drops_open_context() {
        let mut output = LazyOutput::<u32>::default();
        output.get_or_open(|| Ok::<_, String>(1));

        assert!(output.release());
        assert!(!output.release());
    }
}
