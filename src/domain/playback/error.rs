use crate::domain::speech::SpeechServiceError;
use crate::infrastructure::audio::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Speech(#[from] SpeechServiceError),
    #[error("audio backend failed: {0}")]
    Audio(#[from] AudioError),
}
