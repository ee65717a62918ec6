//! Simulation engine: weighted action selection, event lifecycle, preference
//! learning, and the state container behind the feed.
//!
//! The engine is deterministic apart from its RNG: construct a
//! [`Simulator`] with a seeded RNG and a scripted generator and a run is
//! fully reproducible.

pub mod config;
pub mod dispatch;
pub mod events;
pub mod learning;
pub mod runner;
pub mod select;
pub mod store;
pub mod weights;

pub use config::{Tuning, TuningError, DEFAULT_TUNING_PATH};
pub use dispatch::{ActionKind, SimError, Simulator};
pub use events::{event_is_relevant, interaction_probability, select_event};
pub use runner::{RunSummary, Runner};
pub use select::{level_value, weighted_choice, InteractionLevel};
pub use store::{SimState, StoreError, VoteTarget};
pub use weights::{randomize_distribution, set_weight, validate_weights, WeightsError};
