//! Shared entity types and serialization for the feed simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod activity;
pub mod content;
pub mod event;
pub mod instruction;
pub mod snapshot;
pub mod user;
pub mod weights;

// Re-export activity types
pub use activity::{RecentAction, RecentActionKind, MAX_RECENT_ACTIONS};

// Re-export content types
pub use content::{Comment, Post};

// Re-export event types
pub use event::{Event, EventSeed, EventType};

// Re-export instruction types
pub use instruction::{InjectedInstruction, InstructionSet};

// Re-export snapshot types
pub use snapshot::{StateSnapshot, SNAPSHOT_VERSION};

// Re-export user types
pub use user::{BehavioralProfile, Gender, KeywordCount, Preferences, TagCount, User};

// Re-export weight types
pub use weights::{Distribution, SimulationWeights, DEFAULT_REGIONS, WEIGHT_SUM, WEIGHT_TOLERANCE};
