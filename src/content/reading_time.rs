//! Reading time estimation

use super::ContentBlock;

/// Average reading speed used when none is configured
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Count the words of a post body
///
/// Each section contributes its heading words plus the words of all body
/// blocks joined with a space. Words are whitespace-separated tokens.
pub fn count_words(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            let heading = block.heading.split_whitespace().count();
            let body = block
                .body
                .iter()
                .map(|b| b.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .count();
            heading + body
        })
        .sum()
}

/// Estimated reading time in whole minutes at 200 words per minute
pub fn estimate_minutes(content: &[ContentBlock]) -> u32 {
    estimate_minutes_at(content, DEFAULT_WORDS_PER_MINUTE)
}

/// Estimated reading time in whole minutes, rounded up
pub fn estimate_minutes_at(content: &[ContentBlock], words_per_minute: u32) -> u32 {
    let words = count_words(content) as u64;
    let wpm = u64::from(words_per_minute.max(1));
    words.div_ceil(wpm) as u32
}
