//! Weight distribution editing.
//!
//! Every distribution must keep summing to [`WEIGHT_SUM`] as individual
//! keys are edited. Editing one key rescales the others proportionally;
//! the last rescaled key absorbs the rounding remainder so the invariant
//! holds exactly rather than drifting a tenth per edit.

use rand::Rng;
use thiserror::Error;

use sim_types::{Distribution, SimulationWeights, WEIGHT_SUM, WEIGHT_TOLERANCE};

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("unknown weight key: {0}")]
    UnknownKey(String),
    #[error("weight {value} for {key} is outside 0..=100")]
    OutOfRange { key: String, value: f64 },
    #[error("distribution {name} sums to {total}, expected {expected}")]
    BadSum {
        name: String,
        total: f64,
        expected: f64,
    },
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sets `key` to `value` and rescales every other key so the distribution
/// still sums to [`WEIGHT_SUM`].
///
/// When the other keys currently sum to zero the remainder is split
/// equally among them.
pub fn set_weight(
    distribution: &mut Distribution,
    key: &str,
    value: f64,
) -> Result<(), WeightsError> {
    if !distribution.contains(key) {
        return Err(WeightsError::UnknownKey(key.to_string()));
    }
    if !(0.0..=WEIGHT_SUM).contains(&value) {
        return Err(WeightsError::OutOfRange {
            key: key.to_string(),
            value,
        });
    }

    let value = round_tenth(value);
    let remaining = WEIGHT_SUM - value;
    let other_keys: Vec<String> = distribution
        .keys()
        .filter(|k| *k != key)
        .map(str::to_string)
        .collect();

    // A single-key distribution can only ever hold the full sum.
    if other_keys.is_empty() {
        distribution.set(key, WEIGHT_SUM);
        return Ok(());
    }
    distribution.set(key, value);

    let other_total: f64 = other_keys
        .iter()
        .map(|k| distribution.get(k).unwrap_or(0.0))
        .sum();

    let mut shares: Vec<f64> = other_keys
        .iter()
        .map(|other| {
            if other_total > 0.0 {
                round_tenth(distribution.get(other).unwrap_or(0.0) * remaining / other_total)
            } else {
                round_tenth(remaining / other_keys.len() as f64)
            }
        })
        .collect();

    // The last key absorbs the rounding remainder so the sum lands exactly
    // on WEIGHT_SUM. If rounding overshot, take the deficit out of the
    // largest share instead of going negative.
    let rounded_total: f64 = shares.iter().take(shares.len() - 1).sum();
    let last = shares.len() - 1;
    shares[last] = remaining - rounded_total;
    if shares[last] < 0.0 {
        let deficit = -shares[last];
        shares[last] = 0.0;
        if let Some(largest) = shares
            .iter_mut()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            *largest -= deficit;
        }
    }

    for (other, share) in other_keys.iter().zip(shares) {
        distribution.set(other.as_str(), share);
    }

    Ok(())
}

/// Replaces the distribution with random weights that sum to
/// [`WEIGHT_SUM`], giving every key at least one point.
pub fn randomize_distribution<R: Rng>(distribution: &mut Distribution, rng: &mut R) {
    let keys: Vec<String> = distribution.keys().map(str::to_string).collect();
    if keys.is_empty() {
        return;
    }

    let mut remaining = WEIGHT_SUM;
    for (index, key) in keys.iter().enumerate() {
        if index == keys.len() - 1 {
            distribution.set(key.as_str(), round_tenth(remaining));
            break;
        }
        let reserve = (keys.len() - index - 1) as f64;
        let weight = round_tenth(rng.gen::<f64>() * (remaining - reserve));
        distribution.set(key.as_str(), weight);
        remaining -= weight;
    }
}

/// Checks every distribution in the bundle against the sum invariant.
pub fn validate_weights(weights: &SimulationWeights) -> Result<(), WeightsError> {
    for (name, distribution) in weights.distributions() {
        let total = distribution.total();
        if (total - WEIGHT_SUM).abs() > WEIGHT_TOLERANCE {
            return Err(WeightsError::BadSum {
                name: name.to_string(),
                total,
                expected: WEIGHT_SUM,
            });
        }
    }
    Ok(())
}
