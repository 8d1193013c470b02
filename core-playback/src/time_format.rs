//! Queue arithmetic and time display helpers.

/// Position after `current` in a queue of `len`, wrapping to the start.
///
/// Returns 0 for an empty queue.
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + 1) % len
}

/// Position before `current` in a queue of `len`, wrapping to the end.
///
/// Returns 0 for an empty queue.
pub fn previous_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if current == 0 || current >= len {
        len - 1
    } else {
        current - 1
    }
}

/// Format seconds as `m:ss`.
///
/// Values that are not a usable time (NaN, infinite, negative) read as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}
