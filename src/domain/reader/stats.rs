use super::model::ProcessingStats;

/// Average reading speed used for the estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Count words and estimate reading time for `text`.
///
/// Empty input reports zero words; the estimate never drops below one minute.
pub fn estimate(text: &str) -> ProcessingStats {
    let total_words = text.split_whitespace().count();
    let minutes = total_words.div_ceil(WORDS_PER_MINUTE).max(1);

    ProcessingStats {
        total_words,
        estimated_time_label: format_minutes(minutes),
    }
}

fn format_minutes(minutes: usize) -> String {
    if minutes > 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{} min", minutes)
    }
}
