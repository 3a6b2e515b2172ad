pub mod extraction_repository;
pub mod gemini_repository;
pub mod speech_repository;

pub use extraction_repository::{ExtractionError, ExtractionRepository};
pub use gemini_repository::GeminiRepository;
pub use speech_repository::{SpeechRepository, SpeechRepositoryError};
