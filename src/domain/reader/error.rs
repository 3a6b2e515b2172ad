use crate::infrastructure::repositories::ExtractionError;

/// Shown to the reader whenever article extraction fails
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract content. The URL might be protected or invalid. Please copy and paste the text manually.";

#[derive(Debug, thiserror::Error)]
pub enum ReaderServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Io(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Extraction(_) => EXTRACTION_FAILED_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}
