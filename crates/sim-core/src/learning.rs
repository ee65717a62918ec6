//! Preference and tag learning.
//!
//! Users drift over time: tags they keep posting under become permanent
//! interests, and vote keywords accumulate into like/dislike preferences
//! that feed back into future prompts.

use sim_types::{KeywordCount, TagCount, User};

/// Uses before a tag is promoted into the user's interests.
pub const TAG_PROMOTE_THRESHOLD: u32 = 3;

/// Records that `user` posted under `tags`, promoting frequent tags into
/// permanent interests.
pub fn record_tag_usage(user: &mut User, tags: &[String]) {
    for tag in tags {
        match user.used_tags.iter_mut().find(|t| &t.tag == tag) {
            Some(existing) => existing.count += 1,
            None => user.used_tags.push(TagCount::new(tag.clone(), 1)),
        }
    }

    let frequent: Vec<String> = user
        .used_tags
        .iter()
        .filter(|t| t.count >= TAG_PROMOTE_THRESHOLD)
        .map(|t| t.tag.clone())
        .collect();

    for tag in frequent {
        if !user.interests.contains(&tag) {
            user.interests.push(tag);
        }
    }
}

/// Folds vote keywords into the user's like or dislike preferences.
pub fn record_vote_keywords(user: &mut User, is_like: bool, keywords: &[String]) {
    let list = if is_like {
        &mut user.preferences.likes
    } else {
        &mut user.preferences.dislikes
    };

    for keyword in keywords {
        match list.iter_mut().find(|k| &k.keyword == keyword) {
            Some(existing) => existing.count += 1,
            None => list.push(KeywordCount::new(keyword.clone(), 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_types::{BehavioralProfile, Gender};

    fn user() -> User {
        User::new(
            "learner",
            25,
            Gender::Female,
            "Europe",
            5,
            vec!["Photography".to_string()],
            BehavioralProfile::new("casual", 5, 5),
        )
    }

    #[test]
    fn test_tag_counts_accumulate() {
        let mut user = user();
        record_tag_usage(&mut user, &["film".to_string()]);
        record_tag_usage(&mut user, &["film".to_string(), "darkroom".to_string()]);

        assert_eq!(user.used_tags[0].tag, "film");
        assert_eq!(user.used_tags[0].count, 2);
        assert_eq!(user.used_tags[1].count, 1);
    }

    #[test]
    fn test_tag_promoted_to_interest_at_threshold() {
        let mut user = user();
        for _ in 0..2 {
            record_tag_usage(&mut user, &["film".to_string()]);
        }
        assert!(!user.interests.contains(&"film".to_string()));

        record_tag_usage(&mut user, &["film".to_string()]);
        assert!(user.interests.contains(&"film".to_string()));
    }

    #[test]
    fn test_promotion_does_not_duplicate_interest() {
        let mut user = user();
        for _ in 0..5 {
            record_tag_usage(&mut user, &["film".to_string()]);
        }
        let count = user.interests.iter().filter(|i| *i == "film").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_vote_keywords_split_by_polarity() {
        let mut user = user();
        record_vote_keywords(&mut user, true, &["astronomy".to_string()]);
        record_vote_keywords(&mut user, true, &["astronomy".to_string()]);
        record_vote_keywords(&mut user, false, &["spam".to_string()]);

        assert_eq!(user.preferences.likes[0].keyword, "astronomy");
        assert_eq!(user.preferences.likes[0].count, 2);
        assert_eq!(user.preferences.dislikes[0].keyword, "spam");
        assert!(user.preferences.dislikes.iter().all(|k| k.keyword != "astronomy"));
    }
}
