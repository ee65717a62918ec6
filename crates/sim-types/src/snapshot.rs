//! State Snapshot
//!
//! The versioned whole-state export blob: everything the platform persists
//! between runs, as one JSON document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Comment, Event, InjectedInstruction, InstructionSet, Post, RecentAction, SimulationWeights,
    User,
};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

/// The full persisted subset of simulation state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub weights: SimulationWeights,
    #[serde(default)]
    pub recent_actions: Vec<RecentAction>,
    #[serde(default)]
    pub instruction_sets: Vec<InstructionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_instruction_set: Option<Uuid>,
    #[serde(default)]
    pub injected_instructions: Vec<InjectedInstruction>,
}

impl StateSnapshot {
    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a snapshot from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
