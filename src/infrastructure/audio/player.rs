use super::completion::{CompletionSlot, OnEnded};
use super::pcm::AudioBuffer;
use super::sink::PcmSink;
use super::synthesizer::{SpeechSynthesizer, Utterance, UtteranceOutcome};
use super::AudioError;
use crate::domain::voice::PlatformVoice;

enum ActivePlayback {
    Buffer(CompletionSlot),
    Utterance(CompletionSlot),
}

/// Single audio output slot shared by both backends.
///
/// Starting playback on either backend stops whatever the other one was
/// doing, so at most one stream is audible. `on_ended` callbacks run exactly
/// once on natural end and never after `stop`.
pub struct AudioPlayer {
    sink: Box<dyn PcmSink>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    active: Option<ActivePlayback>,
}

impl AudioPlayer {
    pub fn new(sink: Box<dyn PcmSink>, synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            sink,
            synthesizer,
            active: None,
        }
    }

    /// Decode raw 16-bit PCM and play it once at `volume`
    ///
    /// A buffer that cannot be decoded, or holds no samples, ends at once so
    /// the caller's sequence keeps moving.
    pub fn play_pcm(
        &mut self,
        bytes: &[u8],
        volume: f32,
        on_ended: OnEnded,
    ) -> Result<(), AudioError> {
        self.stop();

        let slot = CompletionSlot::new(on_ended);
        let buffer = match AudioBuffer::from_pcm16le(bytes) {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::error!(error = %e, "Error decoding PCM audio");
                slot.fire();
                return Ok(());
            }
        };

        if buffer.is_empty() {
            tracing::debug!("Empty PCM buffer, completing immediately");
            slot.fire();
            return Ok(());
        }

        tracing::debug!(
            samples = buffer.samples().len(),
            duration_ms = buffer.duration().as_millis() as u64,
            volume = volume,
            "Playing PCM buffer"
        );

        self.sink.start(buffer, volume, slot.clone())?;
        self.active = Some(ActivePlayback::Buffer(slot));
        Ok(())
    }

    /// Speak `text` through the platform synthesizer
    pub fn play_utterance(
        &mut self,
        text: &str,
        voice: Option<PlatformVoice>,
        rate: f32,
        volume: f32,
        on_ended: OnEnded,
    ) -> Result<(), AudioError> {
        self.stop();

        let slot = CompletionSlot::new(on_ended);
        let handler_slot = slot.clone();
        let on_outcome = Box::new(move |outcome: UtteranceOutcome| match outcome {
            UtteranceOutcome::Ended => {
                handler_slot.fire();
            }
            UtteranceOutcome::Failed(failure) if failure.is_benign() => {
                tracing::debug!(failure = ?failure, "Utterance interrupted");
            }
            UtteranceOutcome::Failed(failure) => {
                tracing::error!(failure = ?failure, "Synthesis error");
                handler_slot.fire();
            }
        });

        let utterance = Utterance {
            text: text.to_string(),
            voice,
            rate,
            volume,
        };

        self.synthesizer.speak(utterance, on_outcome)?;
        self.active = Some(ActivePlayback::Utterance(slot));
        Ok(())
    }

    /// Stop whatever is playing without triggering its completion.
    /// Safe to call when nothing plays.
    pub fn stop(&mut self) {
        match self.active.take() {
            Some(ActivePlayback::Buffer(slot)) => {
                slot.detach();
                self.sink.halt();
            }
            Some(ActivePlayback::Utterance(slot)) => {
                slot.detach();
                self.synthesizer.cancel();
            }
            None => {}
        }

        if self.synthesizer.is_active() {
            self.synthesizer.cancel();
        }
    }

    pub fn pause(&mut self) {
        match &self.active {
            Some(ActivePlayback::Buffer(_)) => self.sink.suspend(),
            Some(ActivePlayback::Utterance(_)) => self.synthesizer.pause(),
            None => {}
        }
    }

    pub fn resume(&mut self) {
        match &self.active {
            Some(ActivePlayback::Buffer(_)) => self.sink.resume(),
            Some(ActivePlayback::Utterance(_)) => self.synthesizer.resume(),
            None => {}
        }
    }

    /// Whether a started stream has not yet ended or been stopped
    pub fn is_playing(&self) -> bool {
        match &self.active {
            Some(ActivePlayback::Buffer(slot)) | Some(ActivePlayback::Utterance(slot)) => {
                slot.is_armed()
            }
            None => false,
        }
    }

    pub async fn platform_voices(&self) -> Result<Vec<PlatformVoice>, AudioError> {
        self.synthesizer.voices().await
    }
}
