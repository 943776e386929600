//! String helpers for log previews.

/// Shorten `s` to at most `max_len` bytes, ending in `...` when cut.
///
/// The cut point backs up to a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("vote", 10), "vote");
        assert_eq!(truncate("[VOTE] Vote has passed.", 10), "[VOTE] ...");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 'é' is two bytes; cutting inside it backs up one byte
        assert_eq!(truncate("héllo", 5), "h...");
        assert_eq!(truncate("déjà", 20), "déjà");
    }
}
