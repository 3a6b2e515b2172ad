use crate::domain::speech::{SpeechAudio, SpeechServiceError};

/// Something a backend reports back to the sequencer. Every event carries the
/// session it belongs to; events from a superseded session are dropped.
#[derive(Debug)]
pub enum SequencerEvent {
    /// Cloud audio for a chunk arrived (or failed)
    SpeechReady {
        session: u64,
        result: Result<SpeechAudio, SpeechServiceError>,
    },
    /// The current chunk's audio ended naturally
    ChunkEnded { session: u64 },
}

impl SequencerEvent {
    pub fn session(&self) -> u64 {
        match self {
            SequencerEvent::SpeechReady { session, .. } | SequencerEvent::ChunkEnded { session } => {
                *session
            }
        }
    }
}

/// What a sequencer call or event changed
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing changed
    Ignored,
    /// Waiting on the cloud service for this chunk
    Loading { index: usize },
    /// Audio for this chunk started
    Started { index: usize },
    Resumed { index: usize },
    Paused { index: usize },
    Stopped,
    /// Index moved without playing
    Moved { index: usize },
    VoiceChanged { voice_id: String },
    /// The last chunk ended; back at the start
    Finished,
    Failed { message: String },
}
