use crate::infrastructure::repositories::SpeechRepositoryError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("cloud voices are unavailable: no API key configured")]
    Unavailable,
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl SpeechServiceError {
    /// Retrying will not help until the configuration changes
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl From<SpeechRepositoryError> for SpeechServiceError {
    fn from(err: SpeechRepositoryError) -> Self {
        match err {
            SpeechRepositoryError::Unavailable => SpeechServiceError::Unavailable,
            _ => SpeechServiceError::Dependency(err.to_string()),
        }
    }
}
