pub mod completion;
pub mod espeak_synthesizer;
pub mod paplay_sink;
pub mod pcm;
pub mod player;
pub mod process;
pub mod sink;
pub mod synthesizer;

pub use completion::{CompletionSlot, OnEnded};
pub use espeak_synthesizer::ProcessSpeechSynthesizer;
pub use paplay_sink::ProcessPcmSink;
pub use pcm::{AudioBuffer, PCM_SAMPLE_RATE};
pub use player::AudioPlayer;
pub use sink::PcmSink;
pub use synthesizer::{
    OutcomeHandler, SpeechSynthesizer, SynthesisFailure, Utterance, UtteranceOutcome,
};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("PCM buffer has odd length {0}")]
    MalformedPcm(usize),
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("synthesizer error: {0}")]
    Synthesizer(String),
    #[error("audio device error: {0}")]
    Device(String),
}
