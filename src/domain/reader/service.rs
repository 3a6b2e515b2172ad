use super::chunker::chunk_text;
use super::error::ReaderServiceError;
use super::model::Document;
use super::stats::estimate;
use crate::infrastructure::repositories::ExtractionRepository;
use async_trait::async_trait;
use html2text::from_read;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Line width handed to html2text; large enough that paragraphs are not re-wrapped
const HTML_WRAP_WIDTH: usize = 10_000;

static HTML_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(html|body|article|main|p|div|br|h[1-6])[\s>/]")
        .expect("html markup pattern is valid")
});

/// Turns raw text, local files and web articles into chunked documents
pub struct ReaderService {
    extraction_repo: Arc<dyn ExtractionRepository>,
}

impl ReaderService {
    pub fn new(extraction_repo: Arc<dyn ExtractionRepository>) -> Self {
        Self { extraction_repo }
    }
}

#[async_trait]
pub trait ReaderServiceApi: Send + Sync {
    /// Chunk `text` and compute its stats. Never fails; unusable text
    /// produces an empty document.
    fn load_text(&self, text: &str) -> Document;

    /// Read a local file, converting HTML to plain text first
    async fn load_from_file(&self, path: &Path) -> Result<Document, ReaderServiceError>;

    /// Extract the main article text behind `url` and load it
    ///
    /// Fails with `ReaderServiceError::Extraction` when the page is
    /// inaccessible or yields nothing readable; the caller should fall back
    /// to manual input.
    async fn load_from_url(&self, url: &str) -> Result<Document, ReaderServiceError>;
}

#[async_trait]
impl ReaderServiceApi for ReaderService {
    fn load_text(&self, text: &str) -> Document {
        let chunks = chunk_text(text);
        let stats = estimate(text);

        tracing::info!(
            text_length = text.len(),
            chunk_count = chunks.len(),
            total_words = stats.total_words,
            estimated_time = %stats.estimated_time_label,
            "Text loaded"
        );

        Document {
            source: text.to_string(),
            chunks,
            stats,
        }
    }

    async fn load_from_file(&self, path: &Path) -> Result<Document, ReaderServiceError> {
        let raw = tokio::fs::read_to_string(path).await?;

        let text = if looks_like_html(&raw) {
            tracing::debug!(path = %path.display(), "Converting HTML file to text");
            html_to_text(&raw)
        } else {
            raw
        };

        Ok(self.load_text(&text))
    }

    async fn load_from_url(&self, url: &str) -> Result<Document, ReaderServiceError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReaderServiceError::InvalidUrl(url.to_string()));
        }

        tracing::info!(url = %url, "Extracting article text");

        let extracted = self.extraction_repo.extract_text(url).await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Article extraction failed");
            e
        })?;

        let text = strip_code_fences(&extracted);
        let text = if looks_like_html(&text) {
            html_to_text(&text)
        } else {
            text
        };

        Ok(self.load_text(&text))
    }
}

fn looks_like_html(text: &str) -> bool {
    HTML_MARKUP.is_match(text)
}

fn html_to_text(html: &str) -> String {
    from_read(html.as_bytes(), HTML_WRAP_WIDTH)
}

/// Drop markdown fence lines a model sometimes wraps its answer in
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
