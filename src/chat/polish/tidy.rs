//! Reply shortening to a sentence boundary.

use crate::chat::core::config::PolishConfig;

/// Bound a reply's length and cut it at the last sentence terminator.
///
/// The text is first capped at `max_reply_chars` characters. Within the
/// capped text, the cut lands just after the last `.`, `!`, or `?` whose
/// character offset exceeds `min_sentence_chars`, so long replies end on a
/// full sentence instead of mid-word while short replies pass through
/// untouched. Without a qualifying terminator the capped text is returned
/// as-is.
#[must_use]
pub fn tidy_reply(reply: &str, config: &PolishConfig) -> String {
    let trimmed = reply.trim();
    let capped: String = if trimmed.chars().count() > config.max_reply_chars {
        trimmed.chars().take(config.max_reply_chars).collect()
    } else {
        trimmed.to_string()
    };

    let last_terminator = capped
        .char_indices()
        .enumerate()
        .filter(|&(_, (_, ch))| matches!(ch, '.' | '!' | '?'))
        .last();

    if let Some((char_pos, (byte_pos, ch))) = last_terminator
        && char_pos > config.min_sentence_chars
    {
        return capped[..byte_pos + ch.len_utf8()].trim().to_string();
    }

    capped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reply_untouched() {
        let config = PolishConfig::default();
        assert_eq!(tidy_reply("Hi there!", &config), "Hi there!");
    }

    #[test]
    fn test_long_reply_without_terminator_capped_exactly() {
        let config = PolishConfig::default();
        let input = "a".repeat(700);
        let tidied = tidy_reply(&input, &config);
        assert_eq!(tidied, "a".repeat(600));
    }

    #[test]
    fn test_long_reply_cut_at_sentence_boundary() {
        let config = PolishConfig::default();
        let sentence = "This opening sentence runs for well over sixty characters before it finally ends.";
        let input = format!("{sentence} {}", "x".repeat(700));
        let tidied = tidy_reply(&input, &config);
        assert_eq!(tidied, sentence);
    }

    #[test]
    fn test_terminator_before_floor_ignored() {
        let config = PolishConfig::default();
        let input = format!("Short. {}", "y".repeat(700));
        let tidied = tidy_reply(&input, &config);
        // The only terminator sits below the floor, so only the cap applies.
        assert_eq!(tidied.chars().count(), 600);
    }

    #[test]
    fn test_question_and_exclamation_terminate() {
        let config = PolishConfig::default();
        let head = "Would you rather hike in the mountains or walk along the beach today?";
        let input = format!("{head} and then some trailing fragment without an end");
        assert_eq!(tidy_reply(&input, &config), head);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let config = PolishConfig::default();
        assert_eq!(tidy_reply("  hello  ", &config), "hello");
    }
}
