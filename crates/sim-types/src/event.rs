//! Platform Event Types
//!
//! Events are time-boxed campaigns that bias post generation: a tag event
//! pulls in users whose interests match, a regional event pulls in users
//! from the affected regions, and a world event is relevant to everyone.
//! Each event carries a post quota and deactivates once it is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Scope of a platform event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Tag,
    Regional,
    World,
}

impl EventType {
    /// Returns the distribution key for this event type.
    pub fn key(&self) -> &'static str {
        match self {
            EventType::Tag => "tag",
            EventType::Regional => "regional",
            EventType::World => "world",
        }
    }

    /// Parses a distribution key back into an event type.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "tag" => Some(EventType::Tag),
            "regional" => Some(EventType::Regional),
            "world" => Some(EventType::World),
            _ => None,
        }
    }

    /// Post quota for a freshly created event of this type.
    pub fn default_max_posts(&self) -> u32 {
        match self {
            EventType::Tag => 20,
            EventType::Regional => 35,
            EventType::World => 50,
        }
    }

    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[EventType::Tag, EventType::Regional, EventType::World]
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A time-boxed platform campaign that posts can be written "about".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Affected regions; only meaningful for regional events.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,
    pub post_count: u32,
    pub max_posts: u32,
    pub active: bool,
}

impl Event {
    /// Creates a new active event with the per-type default quota.
    pub fn new(
        event_type: EventType,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            title: title.into(),
            description: description.into(),
            created_at: Utc::now(),
            tags,
            regions: Vec::new(),
            post_count: 0,
            max_posts: event_type.default_max_posts(),
            active: true,
        }
    }

    /// Sets the affected regions.
    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    /// True once the event has absorbed its full post quota.
    pub fn quota_reached(&self) -> bool {
        self.post_count >= self.max_posts
    }

    /// Counts a post written about this event.
    pub fn record_post(&mut self) {
        self.post_count += 1;
    }

    /// Deactivates the event.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Caller-supplied event data that bypasses generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSeed {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}
