//! Weighted random selection.
//!
//! One cumulative-roll primitive drives every probabilistic choice:
//! action type, event type, demographics, and which user acts next.

use rand::Rng;

use sim_types::{Distribution, User};

/// Engagement propensity bands drawn from the interaction distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionLevel {
    Low,
    Medium,
    High,
}

impl InteractionLevel {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Draws one key from the distribution proportionally to its weight.
///
/// Returns `None` for an empty distribution or a non-positive total. Zero
/// weight keys are never drawn.
pub fn weighted_choice<'a, R: Rng>(rng: &mut R, distribution: &'a Distribution) -> Option<&'a str> {
    let total = distribution.total();
    if distribution.is_empty() || total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen::<f64>() * total;
    let mut last = None;
    for (key, weight) in distribution.iter() {
        if weight <= 0.0 {
            continue;
        }
        roll -= weight;
        last = Some(key);
        if roll <= 0.0 {
            return Some(key);
        }
    }
    // Floating point left a sliver; fall back to the last positive key.
    last
}

/// Picks the acting user, weighted by interaction value.
pub fn pick_actor<'a, R: Rng>(rng: &mut R, users: &'a [User]) -> Option<&'a User> {
    let total: f64 = users.iter().map(|u| u.interaction_value as f64).sum();
    if users.is_empty() || total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen::<f64>() * total;
    for user in users {
        roll -= user.interaction_value as f64;
        if roll <= 0.0 {
            return Some(user);
        }
    }
    users.last()
}

/// Maps a low/medium/high band to a 1-10 scalar: 1-3, 4-7, or 8-10.
pub fn level_value<R: Rng>(rng: &mut R, level: InteractionLevel) -> u8 {
    match level {
        InteractionLevel::Low => rng.gen_range(1..=3),
        InteractionLevel::Medium => rng.gen_range(4..=7),
        InteractionLevel::High => rng.gen_range(8..=10),
    }
}

/// Draws a concrete age from a range key like `26-35` or `51+`.
///
/// A plus suffix means an open range, capped at 75.
pub fn age_from_range<R: Rng>(rng: &mut R, range: &str) -> Option<u8> {
    if let Some(min) = range.strip_suffix('+') {
        let min: u8 = min.trim().parse().ok()?;
        return Some(rng.gen_range(min..=min.max(75)));
    }

    let (min, max) = range.split_once('-')?;
    let min: u8 = min.trim().parse().ok()?;
    let max: u8 = max.trim().parse().ok()?;
    if min > max {
        return None;
    }
    Some(rng.gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use sim_types::{BehavioralProfile, Gender};

    fn user_with_interaction(name: &str, value: u8) -> User {
        User::new(
            name,
            30,
            Gender::NonDisclosed,
            "Europe",
            value,
            vec!["Reading".to_string()],
            BehavioralProfile::new("neutral", 5, 5),
        )
    }

    #[test]
    fn test_weighted_choice_respects_weights() {
        let mut rng = SmallRng::seed_from_u64(99);
        let dist = Distribution::from_pairs([("rare", 1.0), ("common", 99.0)]);

        let mut common = 0;
        for _ in 0..1000 {
            if weighted_choice(&mut rng, &dist) == Some("common") {
                common += 1;
            }
        }
        assert!(common > 900, "common drawn only {common} times");
    }

    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(3);
        let dist = Distribution::from_pairs([("never", 0.0), ("always", 100.0)]);

        for _ in 0..100 {
            assert_eq!(weighted_choice(&mut rng, &dist), Some("always"));
        }
    }

    #[test]
    fn test_weighted_choice_empty_or_zero_total() {
        let mut rng = SmallRng::seed_from_u64(4);
        assert_eq!(weighted_choice(&mut rng, &Distribution::new()), None);

        let zeros = Distribution::from_pairs([("a", 0.0), ("b", 0.0)]);
        assert_eq!(weighted_choice(&mut rng, &zeros), None);
    }

    #[test]
    fn test_pick_actor_prefers_high_interaction() {
        let mut rng = SmallRng::seed_from_u64(11);
        let users = vec![
            user_with_interaction("quiet", 1),
            user_with_interaction("loud", 9),
        ];

        let mut loud = 0;
        for _ in 0..1000 {
            if pick_actor(&mut rng, &users).unwrap().username == "loud" {
                loud += 1;
            }
        }
        assert!(loud > 800, "loud picked only {loud} times");
    }

    #[test]
    fn test_pick_actor_empty() {
        let mut rng = SmallRng::seed_from_u64(12);
        assert!(pick_actor(&mut rng, &[]).is_none());
    }

    #[test]
    fn test_level_value_bands() {
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..100 {
            assert!((1..=3).contains(&level_value(&mut rng, InteractionLevel::Low)));
            assert!((4..=7).contains(&level_value(&mut rng, InteractionLevel::Medium)));
            assert!((8..=10).contains(&level_value(&mut rng, InteractionLevel::High)));
        }
    }

    #[test]
    fn test_age_from_range() {
        let mut rng = SmallRng::seed_from_u64(14);
        for _ in 0..100 {
            assert!((26..=35).contains(&age_from_range(&mut rng, "26-35").unwrap()));
            assert!((51..=75).contains(&age_from_range(&mut rng, "51+").unwrap()));
        }
        assert_eq!(age_from_range(&mut rng, "junk"), None);
    }
}
