use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous, independently playable unit of source text.
///
/// `start_char_index`/`end_char_index` locate the chunk in the text it was
/// produced from, counted in Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub id: Uuid,
    pub text: String,
    pub start_char_index: usize,
    pub end_char_index: usize,
}

impl TextChunk {
    pub fn new(text: String, start_char_index: usize, end_char_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            start_char_index,
            end_char_index,
        }
    }

    /// Number of characters in the chunk text
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Derived reading statistics for a whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_words: usize,
    pub estimated_time_label: String,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self {
            total_words: 0,
            estimated_time_label: "0 min".to_string(),
        }
    }
}

/// A loaded source text together with everything derived from it.
/// Replaced as a whole on every load, never mutated.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub source: String,
    pub chunks: Vec<TextChunk>,
    pub stats: ProcessingStats,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
