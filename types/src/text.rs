//! Small pure text helpers.

/// Maximum length the image endpoint accepts for any string field.
pub const MAX_IMAGE_FIELD_CHARS: usize = 128;

/// Truncate to at most `max` characters (minimum 3), ending in `...` when cut.
#[must_use]
pub fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    let raw = raw.trim();
    let max = max.max(3);
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let head: String = raw.chars().take(max - 3).collect();
    format!("{}...", head.trim_end())
}

/// Trim and hard-cap a request field without adding an ellipsis.
#[must_use]
pub fn cap_chars(raw: &str, max: usize) -> String {
    raw.trim().chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::{cap_chars, truncate_with_ellipsis};

    #[test]
    fn short_strings_unchanged() {
        assert_eq!(truncate_with_ellipsis("Rebel 500", 20), "Rebel 500");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn long_strings_get_ellipsis_within_budget() {
        let out = truncate_with_ellipsis("Royal Enfield Himalayan 450", 12);
        assert_eq!(out, "Royal Enf...");
        assert!(out.chars().count() <= 12);
    }

    #[test]
    fn minimum_budget_is_three() {
        assert_eq!(truncate_with_ellipsis("hello", 1), "...");
    }

    #[test]
    fn cap_chars_counts_characters_not_bytes() {
        assert_eq!(cap_chars("  ééééé  ", 3), "ééé");
    }
}
