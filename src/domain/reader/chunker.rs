use super::model::TextChunk;
use regex::Regex;
use std::sync::LazyLock;

/// Paragraphs whose trimmed length exceeds this many characters are split
/// further into sentences.
pub const PARAGRAPH_SPLIT_THRESHOLD: usize = 500;

/// One or more newlines with only whitespace between them
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Terminators followed by whitespace. A terminator glued to the next
/// character (`3.14`, `U.S.A`) does not end a sentence.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("sentence boundary pattern is valid"));

/// Split text into ordered, independently playable chunks.
///
/// Short paragraphs are kept whole to preserve reading flow; long ones are
/// broken into sentence-like units. Spans are taken from the split positions
/// themselves rather than searched for, so repeated text resolves to the
/// occurrence that was actually split off and a span is never missing.
pub fn chunk_text(text: &str) -> Vec<TextChunk> {
    let normalized = text.replace("\r\n", "\n");
    let mut offsets = OffsetMap::new(text);
    let mut chunks = Vec::new();

    for (paragraph_start, paragraph) in split_paragraphs(&normalized) {
        let Some((lead, trimmed)) = trim_with_offset(paragraph) else {
            continue;
        };
        let base = paragraph_start + lead;

        if trimmed.chars().count() > PARAGRAPH_SPLIT_THRESHOLD {
            for (sentence_start, sentence) in split_sentences(trimmed) {
                chunks.push(locate(&mut offsets, base + sentence_start, sentence));
            }
        } else {
            chunks.push(locate(&mut offsets, base, trimmed));
        }
    }

    tracing::debug!(
        text_length = text.len(),
        chunk_count = chunks.len(),
        "Text chunked"
    );

    chunks
}

fn locate(offsets: &mut OffsetMap<'_>, start: usize, text: &str) -> TextChunk {
    let start_char_index = offsets.char_index(start);
    let end_char_index = offsets.char_index(start + text.len());
    TextChunk::new(text.to_string(), start_char_index, end_char_index)
}

/// Paragraph slices of `text` with their byte offsets
fn split_paragraphs(text: &str) -> Vec<(usize, &str)> {
    let mut paragraphs = Vec::new();
    let mut last_end = 0;

    for mat in PARAGRAPH_BREAK.find_iter(text) {
        paragraphs.push((last_end, &text[last_end..mat.start()]));
        last_end = mat.end();
    }
    paragraphs.push((last_end, &text[last_end..]));

    paragraphs
}

/// Trimmed sentence slices of `paragraph` with their byte offsets. Every
/// byte between two boundaries belongs to a sentence, so no text is dropped.
fn split_sentences(paragraph: &str) -> Vec<(usize, &str)> {
    let mut sentences = Vec::new();
    let mut last_end = 0;

    for mat in SENTENCE_BOUNDARY.find_iter(paragraph) {
        push_trimmed(&mut sentences, last_end, &paragraph[last_end..mat.end()]);
        last_end = mat.end();
    }
    push_trimmed(&mut sentences, last_end, &paragraph[last_end..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<(usize, &'a str)>, start: usize, text: &'a str) {
    if let Some((lead, trimmed)) = trim_with_offset(text) {
        sentences.push((start + lead, trimmed));
    }
}

/// Trim `text`, returning the byte length of the trimmed prefix alongside the
/// trimmed slice, or `None` when nothing remains.
fn trim_with_offset(text: &str) -> Option<(usize, &str)> {
    let without_lead = text.trim_start();
    let trimmed = without_lead.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    Some((text.len() - without_lead.len(), trimmed))
}

/// Maps byte offsets in the CRLF-normalized text back to character indices in
/// the original text. Lookups must be non-decreasing to stay linear.
struct OffsetMap<'a> {
    original: &'a str,
    /// Normalized byte offsets of every `\n` that was a `\r\n` originally
    removed_cr: Vec<usize>,
    cursor_byte: usize,
    cursor_chars: usize,
}

impl<'a> OffsetMap<'a> {
    fn new(original: &'a str) -> Self {
        let removed_cr = original
            .match_indices("\r\n")
            .enumerate()
            .map(|(removed_before, (byte, _))| byte - removed_before)
            .collect();

        Self {
            original,
            removed_cr,
            cursor_byte: 0,
            cursor_chars: 0,
        }
    }

    fn char_index(&mut self, normalized_byte: usize) -> usize {
        let shift = self.removed_cr.partition_point(|&pos| pos < normalized_byte);
        let byte = normalized_byte + shift;

        if byte < self.cursor_byte {
            self.cursor_byte = 0;
            self.cursor_chars = 0;
        }

        self.cursor_chars += self.original[self.cursor_byte..byte].chars().count();
        self.cursor_byte = byte;
        self.cursor_chars
    }
}
