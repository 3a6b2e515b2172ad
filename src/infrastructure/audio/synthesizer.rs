use super::AudioError;
use crate::domain::voice::PlatformVoice;
use async_trait::async_trait;

/// Text handed to the platform synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// `None` selects the synthesizer's default voice
    pub voice: Option<PlatformVoice>,
    /// 1.0 is the synthesizer's normal speed
    pub rate: f32,
    /// 0.0 to 1.0
    pub volume: f32,
}

/// Why an utterance ended without finishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisFailure {
    /// Cut off by a newer utterance
    Interrupted,
    /// Cancelled by a stop
    Canceled,
    Other(String),
}

impl SynthesisFailure {
    /// Interruptions and cancellations come from an intentional stop
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Canceled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceOutcome {
    Ended,
    Failed(SynthesisFailure),
}

pub type OutcomeHandler = Box<dyn FnOnce(UtteranceOutcome) + Send + 'static>;

/// Platform speech synthesizer
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking, reporting how the utterance ended through `on_outcome`
    fn speak(&mut self, utterance: Utterance, on_outcome: OutcomeHandler)
        -> Result<(), AudioError>;

    /// Speaking or about to speak
    fn is_active(&self) -> bool;

    fn cancel(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Voices currently installed. The list may grow after startup.
    async fn voices(&self) -> Result<Vec<PlatformVoice>, AudioError>;
}
