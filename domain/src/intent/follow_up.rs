//! Self-directed follow-up detection in model drafts.

/// Phrases with which a draft announces it wants more data.
pub const FOLLOW_UP_MARKERS: &[&str] = &[
    "let me check",
    "let me get",
    "let me look",
    "let me find",
    "let me verify",
    "i should check",
    "i'll check",
    "i will check",
    "i need to check",
    "i'll look up",
    "i will look up",
];

/// First follow-up marker found in `draft`, if any (case-insensitive,
/// typographic apostrophes accepted).
pub fn follow_up_marker(draft: &str) -> Option<&'static str> {
    let lower = draft.to_lowercase().replace('\u{2019}', "'");
    FOLLOW_UP_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
}

pub fn has_follow_up_marker(draft: &str) -> bool {
    follow_up_marker(draft).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_markers() {
        assert!(has_follow_up_marker("Let me check the weather in Oslo for you."));
        assert_eq!(
            follow_up_marker("I\u{2019}ll look up hotels in Porto."),
            Some("i'll look up")
        );
    }

    #[test]
    fn test_plain_answer_has_no_marker() {
        assert!(!has_follow_up_marker(
            "Tokyo in March is around 12°C, so pack layers."
        ));
        assert!(!has_follow_up_marker(""));
    }
}
