//! Post and Comment Types
//!
//! Content is immutable after creation; only the voter sets and accumulated
//! vote keywords change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A top-level post or a reply within a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub dislikes: Vec<Uuid>,
    pub thread_id: Uuid,
    /// Keywords extracted from votes cast on this post.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Event this post was written about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    /// Injected instruction that biased this post's generation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injection_id: Option<Uuid>,
    /// Parent post when this post is a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Uuid>,
}

impl Post {
    /// Creates a new top-level post.
    pub fn new(author: Uuid, thread_id: Uuid, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            content: content.into(),
            created_at: Utc::now(),
            tags,
            likes: Vec::new(),
            dislikes: Vec::new(),
            thread_id,
            keywords: Vec::new(),
            event_id: None,
            injection_id: None,
            reply_to: None,
        }
    }

    /// Marks the post as written about an event.
    pub fn with_event(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Marks the post as generated under an injected instruction.
    pub fn with_injection(mut self, injection_id: Uuid) -> Self {
        self.injection_id = Some(injection_id);
        self
    }

    /// Marks the post as a reply to another post.
    pub fn with_reply_to(mut self, parent: Uuid) -> Self {
        self.reply_to = Some(parent);
        self
    }

    /// True when the post is a reply rather than a thread starter.
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// True when the given user has already liked or disliked this post.
    pub fn has_voted(&self, user_id: &Uuid) -> bool {
        self.likes.contains(user_id) || self.dislikes.contains(user_id)
    }
}

/// A comment on a post, optionally nested under another comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub dislikes: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<Uuid>,
}

impl Comment {
    /// Creates a new top-level comment on a post.
    pub fn new(post_id: Uuid, author: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content: content.into(),
            created_at: Utc::now(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            parent_comment_id: None,
        }
    }

    /// Nests the comment under a parent comment.
    pub fn with_parent(mut self, parent: Uuid) -> Self {
        self.parent_comment_id = Some(parent);
        self
    }

    /// True when the given user has already liked or disliked this comment.
    pub fn has_voted(&self, user_id: &Uuid) -> bool {
        self.likes.contains(user_id) || self.dislikes.contains(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_builders() {
        let author = Uuid::new_v4();
        let thread = Uuid::new_v4();
        let event = Uuid::new_v4();
        let parent = Uuid::new_v4();

        let post = Post::new(author, thread, "hello", vec!["coffee".to_string()])
            .with_event(event)
            .with_reply_to(parent);

        assert_eq!(post.author, author);
        assert_eq!(post.event_id, Some(event));
        assert!(post.is_reply());
    }

    #[test]
    fn test_post_has_voted() {
        let voter = Uuid::new_v4();
        let mut post = Post::new(Uuid::new_v4(), Uuid::new_v4(), "x", vec![]);
        assert!(!post.has_voted(&voter));

        post.dislikes.push(voter);
        assert!(post.has_voted(&voter));
    }

    #[test]
    fn test_post_serialization_skips_empty_optionals() {
        let post = Post::new(Uuid::new_v4(), Uuid::new_v4(), "x", vec![]);
        let json = serde_json::to_string(&post).unwrap();
        assert!(!json.contains("event_id"));
        assert!(!json.contains("reply_to"));
        assert!(!json.contains("keywords"));
    }

    #[test]
    fn test_comment_roundtrip() {
        let comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "nice post")
            .with_parent(Uuid::new_v4());
        let json = serde_json::to_string(&comment).unwrap();
        let parsed: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, comment);
    }
}
