//! Output sanitizer.
//!
//! Generated text arrives wrapped in assistant habits: think-tags, "here's
//! my post" prefixes, trailing self-commentary, bracketed stage directions,
//! and hashtags. The sanitizer strips all of it so only the post body
//! survives.

/// Assistant prefixes removed from the start of generated content.
const PREFIXES: &[&str] = &[
    "Here's a social media post that reflects my personality and interests:",
    "Here's my post:",
    "Here's what I would post:",
    "I would write:",
    "My post would be:",
    "Here's a relevant reply:",
    "I would respond with:",
    "My response would be:",
    "INTERESTS:",
    "USERNAME:",
    "POST:",
    "CONTENT:",
    "RESPONSE:",
];

/// Phrases that mark the start of trailing meta-commentary.
const META_INDICATORS: &[&str] = &[
    "I hope this post",
    "This post reflects",
    "This captures",
    "This response shows",
    "This maintains my",
    "[End of post]",
    "[Post ends]",
    "[Response ends]",
    "This is how I would post",
    "This aligns with my",
    "This demonstrates my",
];

/// Cleans raw generator output into post/reply body text.
///
/// Replies keep their hashtags; everything else loses them.
pub fn clean_generated_content(content: &str, is_reply: bool) -> String {
    if content.is_empty() {
        return String::new();
    }

    // Keep only the text after the last closing think tag, then drop any
    // remaining (possibly unterminated) think blocks.
    let mut cleaned = match content.rsplit_once("</think>") {
        Some((_, tail)) => tail.trim().to_string(),
        None => content.to_string(),
    };
    cleaned = strip_think_blocks(&cleaned);

    for prefix in PREFIXES {
        if starts_with_ignore_case(&cleaned, prefix) {
            cleaned = cleaned[prefix.len()..].trim().to_string();
        }
    }

    cleaned = cleaned
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string();

    for indicator in META_INDICATORS {
        if let Some(index) = find_ignore_case(&cleaned, indicator) {
            cleaned.truncate(index);
            cleaned = cleaned.trim().to_string();
        }
    }

    cleaned = strip_bracketed(&cleaned);

    if !is_reply {
        cleaned = strip_hashtags(&cleaned);
    }

    cleaned.trim().to_string()
}

/// Case-insensitive prefix test, safe for multi-byte content.
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Case-insensitive substring search (ASCII folding is enough for the
/// fixed English indicator phrases).
fn find_ignore_case(text: &str, needle: &str) -> Option<usize> {
    let haystack = text.to_ascii_lowercase();
    haystack.find(&needle.to_ascii_lowercase())
}

/// Removes `<think>...</think>` blocks, including an unterminated trailing
/// one.
fn strip_think_blocks(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("<think>") {
        result.push_str(&rest[..open]);
        match rest[open..].find("</think>") {
            Some(close) => rest = &rest[open + close + "</think>".len()..],
            None => return result.trim().to_string(),
        }
    }

    result.push_str(rest);
    result.trim().to_string()
}

/// Removes square-bracketed asides and their content.
fn strip_bracketed(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;

    for ch in text.chars() {
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(ch),
            _ => {}
        }
    }

    result.trim().to_string()
}

/// Removes `#hashtag` tokens.
fn strip_hashtags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '#' && chars.peek().is_some_and(|c| c.is_alphanumeric() || *c == '_') {
            while chars.peek().is_some_and(|c| c.is_alphanumeric() || *c == '_') {
                chars.next();
            }
        } else {
            result.push(ch);
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_text_after_last_think_tag() {
        let raw = "<think>should I be sarcastic?</think>coffee is a food group";
        assert_eq!(clean_generated_content(raw, false), "coffee is a food group");
    }

    #[test]
    fn test_strips_unterminated_think_block() {
        let raw = "decent post here <think>internal monologue";
        assert_eq!(clean_generated_content(raw, false), "decent post here");
    }

    #[test]
    fn test_strips_known_prefixes() {
        let raw = "Here's my post: mechanical keyboards are a lifestyle";
        assert_eq!(
            clean_generated_content(raw, false),
            "mechanical keyboards are a lifestyle"
        );
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let raw = "HERE'S MY POST: loud opinion";
        assert_eq!(clean_generated_content(raw, false), "loud opinion");
    }

    #[test]
    fn test_strips_surrounding_quotes() {
        assert_eq!(clean_generated_content("\"quoted post\"", false), "quoted post");
    }

    #[test]
    fn test_truncates_trailing_meta_commentary() {
        let raw = "great hike today. This post reflects my love of the outdoors.";
        assert_eq!(clean_generated_content(raw, false), "great hike today.");
    }

    #[test]
    fn test_strips_bracketed_asides() {
        let raw = "loving the new album [posted with enthusiasm] so much";
        assert_eq!(clean_generated_content(raw, false), "loving the new album  so much");
    }

    #[test]
    fn test_strips_hashtags_from_posts() {
        let raw = "new roast day #coffee #home_roasting is the best";
        assert_eq!(clean_generated_content(raw, false), "new roast day   is the best");
    }

    #[test]
    fn test_keeps_hashtags_in_replies() {
        let raw = "agreed, #coffee forever";
        assert_eq!(clean_generated_content(raw, true), "agreed, #coffee forever");
    }

    #[test]
    fn test_lone_hash_symbol_survives() {
        assert_eq!(clean_generated_content("rated # 1 overall", false), "rated # 1 overall");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_generated_content("", false), "");
    }
}
