//! User Types
//!
//! Synthetic platform users: identity, demographics, behavioral profile,
//! and the accumulated tag/keyword counters the learning system maintains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declared gender of a synthetic user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    NonDisclosed,
}

impl Gender {
    /// Returns the distribution key for this gender.
    pub fn key(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::NonDisclosed => "non-disclosed",
        }
    }

    /// Parses a distribution key back into a gender.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "non-disclosed" => Some(Gender::NonDisclosed),
            _ => None,
        }
    }

    /// Returns all gender variants.
    pub fn all() -> &'static [Gender] {
        &[Gender::Male, Gender::Female, Gender::NonDisclosed]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// How a user writes and how quickly they engage.
///
/// `verbosity` and `response_speed` are 1-10 scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub tone: String,
    pub verbosity: u8,
    pub response_speed: u8,
}

impl BehavioralProfile {
    pub fn new(tone: impl Into<String>, verbosity: u8, response_speed: u8) -> Self {
        Self {
            tone: tone.into(),
            verbosity,
            response_speed,
        }
    }
}

/// Per-tag usage counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: u32) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Per-keyword like/dislike counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u32,
}

impl KeywordCount {
    pub fn new(keyword: impl Into<String>, count: u32) -> Self {
        Self {
            keyword: keyword.into(),
            count,
        }
    }
}

/// Accumulated vote preferences learned from a user's like/dislike history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub likes: Vec<KeywordCount>,
    #[serde(default)]
    pub dislikes: Vec<KeywordCount>,
}

/// A synthetic platform user.
///
/// `interaction_value` is a 1-10 scalar weighting how likely the user is to
/// be chosen as the actor for the next post, reply, or vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub joined_at: DateTime<Utc>,
    pub age: u8,
    pub gender: Gender,
    pub region: String,
    pub interaction_value: u8,
    pub interests: Vec<String>,
    pub profile: BehavioralProfile,
    #[serde(default)]
    pub used_tags: Vec<TagCount>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl User {
    /// Creates a new user with a fresh id and empty counters.
    pub fn new(
        username: impl Into<String>,
        age: u8,
        gender: Gender,
        region: impl Into<String>,
        interaction_value: u8,
        interests: Vec<String>,
        profile: BehavioralProfile,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            joined_at: Utc::now(),
            age,
            gender,
            region: region.into(),
            interaction_value,
            interests,
            profile,
            used_tags: Vec::new(),
            preferences: Preferences::default(),
        }
    }

    /// Top-N like keywords, most-used first.
    pub fn top_likes(&self, n: usize) -> Vec<&str> {
        let mut keywords: Vec<&KeywordCount> = self.preferences.likes.iter().collect();
        keywords.sort_by(|a, b| b.count.cmp(&a.count));
        keywords.into_iter().take(n).map(|k| k.keyword.as_str()).collect()
    }

    /// Top-N dislike keywords, most-used first.
    pub fn top_dislikes(&self, n: usize) -> Vec<&str> {
        let mut keywords: Vec<&KeywordCount> = self.preferences.dislikes.iter().collect();
        keywords.sort_by(|a, b| b.count.cmp(&a.count));
        keywords.into_iter().take(n).map(|k| k.keyword.as_str()).collect()
    }

    /// Tags the user has attached to posts, in insertion order.
    pub fn used_tag_names(&self) -> Vec<&str> {
        self.used_tags.iter().map(|t| t.tag.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "PixelPainter",
            29,
            Gender::Female,
            "Europe",
            7,
            vec!["Urban Beekeeping".to_string(), "Bouldering".to_string()],
            BehavioralProfile::new("playful", 6, 4),
        )
    }

    #[test]
    fn test_gender_serialization() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), r#""male""#);
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), r#""female""#);
        assert_eq!(
            serde_json::to_string(&Gender::NonDisclosed).unwrap(),
            r#""non-disclosed""#
        );
    }

    #[test]
    fn test_gender_key_roundtrip() {
        for gender in Gender::all() {
            assert_eq!(Gender::from_key(gender.key()), Some(*gender));
        }
        assert_eq!(Gender::from_key("other"), None);
    }

    #[test]
    fn test_user_serialization_roundtrip() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        let parsed: User = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
    }

    #[test]
    fn test_top_likes_sorted_and_truncated() {
        let mut user = sample_user();
        user.preferences.likes = vec![
            KeywordCount::new("coffee", 2),
            KeywordCount::new("climbing", 9),
            KeywordCount::new("bees", 5),
        ];

        assert_eq!(user.top_likes(2), vec!["climbing", "bees"]);
        assert_eq!(user.top_likes(10).len(), 3);
    }

    #[test]
    fn test_legacy_user_without_counters_deserializes() {
        // Counters were added after the first snapshot version; they default.
        let json = r#"{
            "id": "7f0c0a4e-58b5-4b9a-a7c7-0a4f6c1d2e3f",
            "username": "User42",
            "joined_at": "2025-01-01T00:00:00Z",
            "age": 33,
            "gender": "non-disclosed",
            "region": "Asia",
            "interaction_value": 5,
            "interests": ["Jazz Piano"],
            "profile": { "tone": "neutral", "verbosity": 5, "response_speed": 5 }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.used_tags.is_empty());
        assert!(user.preferences.likes.is_empty());
    }
}
