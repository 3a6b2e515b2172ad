pub mod chunker;
pub mod error;
pub mod model;
pub mod service;
pub mod stats;

pub use chunker::chunk_text;
pub use error::{ReaderServiceError, EXTRACTION_FAILED_MESSAGE};
pub use model::{Document, ProcessingStats, TextChunk};
pub use service::{ReaderService, ReaderServiceApi};
pub use stats::estimate;

/// Loaded when the reader starts without any input
pub const DEFAULT_TEXT: &str = "Welcome to VoxStream AI Reader.

This is a powerful text-to-speech application designed to handle long documents, articles, and research papers with ease.

You can use high-quality AI voices powered by Google's Gemini models, or standard offline voices provided by your system.

To get started, simply paste your text, load a file, or enter a URL. The reader will break down the content into manageable chunks and allow you to listen seamlessly.

Try selecting the \"Zephyr\" voice for a natural listening experience, or switch to an offline voice for zero-latency reading.";
