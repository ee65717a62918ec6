//! Tuning configuration.
//!
//! Runtime knobs load from tuning.toml so probabilities can be adjusted
//! without recompiling. Every section and field is optional; missing
//! pieces fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use textgen::GeneratorConfig;

/// Default tuning file path.
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level tuning structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub simulation: SimulationTuning,
    pub engagement: EngagementTuning,
    pub generator: GeneratorConfig,
}

/// Simulation loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationTuning {
    /// Seconds between simulation ticks.
    pub tick_interval_secs: f64,
    /// Users created up front before the loop starts.
    pub min_users: usize,
    /// Ticks to run when the CLI does not say otherwise.
    pub default_ticks: u64,
}

impl Default for SimulationTuning {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1.0,
            min_users: 10,
            default_ticks: 100,
        }
    }
}

/// Engagement probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementTuning {
    /// Chance a generate-post action becomes a reply instead.
    pub reply_chance: f64,
    /// Chance a user engages with a relevant active event per post.
    pub event_engage_chance: f64,
}

impl Default for EngagementTuning {
    fn default() -> Self {
        Self {
            reply_chance: 0.3,
            event_engage_chance: 0.6,
        }
    }
}

impl Tuning {
    /// Loads tuning from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads from the default path, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(error) => {
                warn!(path = %path.as_ref().display(), %error, "using default tuning");
                Self::default()
            }
        }
    }
}
