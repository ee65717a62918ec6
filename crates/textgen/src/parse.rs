//! Label-based response parsing.
//!
//! Prompts ask for `LABEL: value` lines so the parser never has to guess at
//! free-form structure. Parsing is line-oriented and case-insensitive on
//! the label.

/// Extracts the value of the first `LABEL: value` line.
pub fn labeled_value(response: &str, label: &str) -> Option<String> {
    let needle = format!("{label}:");
    for line in response.lines() {
        let line = line.trim();
        if line
            .get(..needle.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&needle))
        {
            let value = line[needle.len()..].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Extracts a comma-separated list from a `LABEL: a, b, c` line.
pub fn labeled_list(response: &str, label: &str) -> Vec<String> {
    labeled_value(response, label)
        .map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes a tag into lowercase alphanumeric-and-hyphen slug form.
pub fn slugify_tag(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_hyphen = true;

    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
