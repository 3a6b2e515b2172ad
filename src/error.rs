use crate::domain::playback::PlaybackError;
use crate::domain::reader::ReaderServiceError;
use crate::domain::speech::SpeechServiceError;
use crate::infrastructure::audio::AudioError;
use crate::infrastructure::config::ConfigError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not load text: {0}")]
    Reader(#[from] ReaderServiceError),

    #[error("Speech generation failed: {0}")]
    Speech(#[from] SpeechServiceError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether retrying the same action can succeed without the user changing anything
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Reader(err) => err.is_retryable(),
            Self::Speech(err) => !err.is_permanent(),
            Self::Io(_) => true,
            Self::Config(_) | Self::Audio(_) | Self::Playback(_) | Self::BadRequest(_) => false,
        }
    }

    /// Message suitable for showing to the reader
    pub fn user_message(&self) -> String {
        match self {
            Self::Reader(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
