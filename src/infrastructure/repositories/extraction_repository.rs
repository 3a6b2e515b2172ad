use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction unavailable: no API key configured")]
    Unavailable,
    #[error("extraction request failed: {0}")]
    Request(String),
    #[error("no readable content could be extracted")]
    NoContent,
}

/// Repository for turning a web page into readable article text
#[async_trait]
pub trait ExtractionRepository: Send + Sync {
    /// Best-effort extraction of the main article text behind `url`
    async fn extract_text(&self, url: &str) -> Result<String, ExtractionError>;
}
