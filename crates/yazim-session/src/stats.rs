//! Typing statistics computed when a session finishes.

use chrono::Duration;

use yazim_core::types::TypingStats;

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Compute final statistics for `text` typed over `elapsed` active time.
///
/// An instantaneous finish reports 0 wpm instead of a non-finite value.
pub fn compute_stats(text: &str, elapsed: Duration) -> TypingStats {
    let elapsed_secs = elapsed.num_milliseconds().max(0) as f64 / 1000.0;
    let words = word_count(text.trim());

    let wpm = if elapsed_secs > 0.0 {
        (words as f64 / (elapsed_secs / 60.0)).round() as u32
    } else {
        0
    };

    TypingStats {
        wpm,
        time_secs: (elapsed_secs * 100.0).round() / 100.0,
        word_count: words,
    }
}
