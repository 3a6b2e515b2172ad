use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechRepositoryError {
    /// No credentials configured. Permanent until the configuration changes.
    #[error("speech service unavailable: no API key configured")]
    Unavailable,
    #[error("speech request failed: {0}")]
    Request(String),
    #[error("speech service returned no audio")]
    NoAudio,
    #[error("could not decode audio payload: {0}")]
    Decode(String),
}

impl SpeechRepositoryError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Repository for cloud speech generation.
/// Abstracts the underlying provider so tests can substitute a fake.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Whether credentials are configured at all
    fn is_available(&self) -> bool;

    /// Generate speech for `text` with the given cloud voice
    ///
    /// Returns raw little-endian 16-bit mono PCM at 24 kHz.
    ///
    /// # Errors
    /// `Unavailable` when no credentials are configured, otherwise a
    /// transient failure.
    async fn generate_speech(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, SpeechRepositoryError>;
}
