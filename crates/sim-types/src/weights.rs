//! Simulation Weight Distributions
//!
//! Every knob the simulation draws from is a percentage distribution over
//! named categories. Distributions are ordered maps so that weighted draws
//! iterate deterministically under a seeded RNG.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target sum for every distribution.
pub const WEIGHT_SUM: f64 = 100.0;

/// Tolerance when checking that a distribution sums to [`WEIGHT_SUM`].
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Regions known to the platform out of the box.
pub const DEFAULT_REGIONS: &[&str] = &[
    "North America",
    "South America",
    "Europe",
    "Asia",
    "Africa",
    "Oceania",
    "Middle East",
    "Caribbean",
    "Central America",
];

/// An ordered category -> percentage mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(BTreeMap<String, f64>);

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a distribution from key/weight pairs.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Sets a raw weight without rebalancing the others.
    pub fn set(&mut self, key: impl Into<String>, weight: f64) {
        self.0.insert(key.into(), weight);
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// True when the distribution sums to 100 within tolerance.
    pub fn is_normalized(&self) -> bool {
        (self.total() - WEIGHT_SUM).abs() <= WEIGHT_TOLERANCE
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut f64)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

/// The full bundle of independent percentage distributions driving the
/// simulation. Each distribution is invariant-constrained to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationWeights {
    /// add_user / generate_post / vote / generate_event
    pub actions: Distribution,
    pub gender: Distribution,
    pub age_ranges: Distribution,
    pub regions: Distribution,
    /// When false, new-user regions come from the text generator instead
    /// of the region distribution.
    pub use_region_weights: bool,
    /// low / medium / high engagement propensity bands
    pub interaction_value: Distribution,
    pub tone: Distribution,
    /// low / medium / high verbosity bands
    pub verbosity: Distribution,
    /// tag / regional / world
    pub events: Distribution,
}

impl SimulationWeights {
    /// All distributions in the bundle, paired with their names.
    pub fn distributions(&self) -> Vec<(&'static str, &Distribution)> {
        vec![
            ("actions", &self.actions),
            ("gender", &self.gender),
            ("age_ranges", &self.age_ranges),
            ("regions", &self.regions),
            ("interaction_value", &self.interaction_value),
            ("tone", &self.tone),
            ("verbosity", &self.verbosity),
            ("events", &self.events),
        ]
    }
}

impl Default for SimulationWeights {
    fn default() -> Self {
        let tones: Vec<(&str, f64)> = [
            "friendly",
            "formal",
            "casual",
            "enthusiastic",
            "professional",
            "humorous",
            "sarcastic",
            "intellectual",
            "empathetic",
            "inspirational",
            "analytical",
            "diplomatic",
            "creative",
            "philosophical",
            "technical",
            "educational",
            "supportive",
            "controversial",
            "playful",
            "serious",
            "poetic",
            "journalistic",
            "storytelling",
            "cynical",
            "pessimistic",
            "aggressive",
            "bitter",
            "critical",
            "snarky",
            "hostile",
            "dismissive",
            "argumentative",
        ]
        .iter()
        .map(|t| (*t, 3.0))
        .chain(std::iter::once(("neutral", 4.0)))
        .collect();

        Self {
            actions: Distribution::from_pairs([
                ("add_user", 19.0),
                ("generate_post", 47.5),
                ("vote", 28.5),
                ("generate_event", 5.0),
            ]),
            gender: Distribution::from_pairs([
                ("male", 45.0),
                ("female", 45.0),
                ("non-disclosed", 10.0),
            ]),
            age_ranges: Distribution::from_pairs([
                ("18-25", 30.0),
                ("26-35", 35.0),
                ("36-50", 25.0),
                ("51+", 10.0),
            ]),
            regions: Distribution::from_pairs([
                ("North America", 20.0),
                ("South America", 10.0),
                ("Europe", 20.0),
                ("Asia", 20.0),
                ("Africa", 10.0),
                ("Oceania", 5.0),
                ("Middle East", 5.0),
                ("Caribbean", 5.0),
                ("Central America", 5.0),
            ]),
            use_region_weights: true,
            interaction_value: Distribution::from_pairs([
                ("low", 20.0),
                ("medium", 60.0),
                ("high", 20.0),
            ]),
            tone: Distribution::from_pairs(tones),
            verbosity: Distribution::from_pairs([
                ("low", 25.0),
                ("medium", 50.0),
                ("high", 25.0),
            ]),
            events: Distribution::from_pairs([
                ("tag", 60.0),
                ("regional", 30.0),
                ("world", 10.0),
            ]),
        }
    }
}
