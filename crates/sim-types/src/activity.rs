//! Activity Log Types
//!
//! A bounded, newest-first log of recent simulation actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum entries kept in the recent-action log.
pub const MAX_RECENT_ACTIONS: usize = 50;

/// What kind of action a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentActionKind {
    User,
    Post,
    Comment,
    Vote,
    Reply,
}

/// One entry in the recent-action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAction {
    pub kind: RecentActionKind,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl RecentAction {
    pub fn new(kind: RecentActionKind, user_id: Uuid, description: impl Into<String>) -> Self {
        Self {
            kind,
            user_id,
            post_id: None,
            comment_id: None,
            timestamp: Utc::now(),
            description: description.into(),
        }
    }

    pub fn with_post(mut self, post_id: Uuid) -> Self {
        self.post_id = Some(post_id);
        self
    }

    pub fn with_comment(mut self, comment_id: Uuid) -> Self {
        self.comment_id = Some(comment_id);
        self
    }
}
