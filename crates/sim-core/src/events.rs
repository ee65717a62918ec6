//! Event lifecycle.
//!
//! Events are time-boxed campaigns with a post quota. Post generation walks
//! the active events, retires any that hit quota, and lets the candidate
//! author engage with the first relevant one.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use sim_types::{Event, EventType, User};

/// Exponential decay rate for content age. Roughly 50% engagement at 7
/// days, 5% at 30.
const AGE_DECAY_PER_DAY: f64 = 0.1;

/// Probability that a user still engages with content created at
/// `created_at`, as seen from `now`.
pub fn interaction_probability(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age = now.signed_duration_since(created_at);
    let days = age.num_seconds().max(0) as f64 / 86_400.0;
    (-AGE_DECAY_PER_DAY * days).exp()
}

/// Heuristic match between an event and a candidate author.
///
/// Tag events need a tag that appears in one of the user's interests,
/// regional events need the user's region, world events reach everyone.
pub fn event_is_relevant(event: &Event, user: &User) -> bool {
    match event.event_type {
        EventType::Tag => event.tags.iter().any(|tag| {
            user.interests
                .iter()
                .any(|interest| interest.to_lowercase().contains(tag.as_str()))
        }),
        EventType::Regional => event.regions.iter().any(|region| region == &user.region),
        EventType::World => true,
    }
}

/// Picks the event the author engages with for their next post, if any.
///
/// Walks events in order, deactivating any active event whose quota is
/// already spent. Each relevant event gets one engagement roll against
/// `engage_chance`.
pub fn select_event<R: Rng>(
    rng: &mut R,
    events: &mut [Event],
    user: &User,
    engage_chance: f64,
) -> Option<Uuid> {
    for event in events.iter_mut() {
        if !event.active {
            continue;
        }
        if event.quota_reached() {
            debug!(event = %event.title, "event quota reached, deactivating");
            event.deactivate();
            continue;
        }
        if event_is_relevant(event, user) && rng.gen_bool(engage_chance.clamp(0.0, 1.0)) {
            return Some(event.id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use sim_types::{BehavioralProfile, Gender};

    fn user_in(region: &str, interests: Vec<String>) -> User {
        User::new(
            "tester",
            30,
            Gender::Male,
            region,
            5,
            interests,
            BehavioralProfile::new("neutral", 5, 5),
        )
    }

    fn tag_event(tags: Vec<&str>) -> Event {
        Event::new(
            EventType::Tag,
            "Launch Week",
            "A product launch dominates the feeds.",
            tags.into_iter().map(String::from).collect(),
        )
    }

    #[test]
    fn test_interaction_probability_decays() {
        let now = Utc::now();
        let fresh = interaction_probability(now, now);
        let week = interaction_probability(now - Duration::days(7), now);
        let month = interaction_probability(now - Duration::days(30), now);

        assert!((fresh - 1.0).abs() < 1e-9);
        assert!((week - 0.4966).abs() < 0.01);
        assert!(month < 0.06);
    }

    #[test]
    fn test_interaction_probability_future_timestamps_clamp() {
        let now = Utc::now();
        let future = interaction_probability(now + Duration::days(3), now);
        assert!((future - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tag_event_matches_interest_substring() {
        let user = user_in("Europe", vec!["Home Coffee Roasting".to_string()]);
        assert!(event_is_relevant(&tag_event(vec!["coffee"]), &user));
        assert!(!event_is_relevant(&tag_event(vec!["gardening"]), &user));
    }

    #[test]
    fn test_regional_event_matches_region() {
        let user = user_in("Asia", vec![]);
        let event = Event::new(
            EventType::Regional,
            "Regional Election Results",
            "Polls close across the region tonight.",
            vec!["election".to_string()],
        )
        .with_regions(vec!["Asia".to_string()]);

        assert!(event_is_relevant(&event, &user));

        let elsewhere = user_in("Europe", vec![]);
        assert!(!event_is_relevant(&event, &elsewhere));
    }

    #[test]
    fn test_world_event_is_always_relevant() {
        let user = user_in("Oceania", vec![]);
        let event = Event::new(
            EventType::World,
            "Comet Visible Worldwide",
            "A rare comet is visible across all regions.",
            vec!["comet".to_string()],
        );
        assert!(event_is_relevant(&event, &user));
    }

    #[test]
    fn test_select_event_deactivates_spent_events() {
        let mut rng = SmallRng::seed_from_u64(5);
        let user = user_in("Europe", vec![]);
        let mut spent = Event::new(
            EventType::World,
            "Old Global Story",
            "An event whose quota is already used up.",
            vec!["old".to_string()],
        );
        for _ in 0..spent.max_posts {
            spent.record_post();
        }
        let mut events = vec![spent];

        let selected = select_event(&mut rng, &mut events, &user, 1.0);
        assert_eq!(selected, None);
        assert!(!events[0].active);
    }

    #[test]
    fn test_select_event_with_certain_engagement() {
        let mut rng = SmallRng::seed_from_u64(6);
        let user = user_in("Europe", vec![]);
        let mut events = vec![Event::new(
            EventType::World,
            "Fresh Global Story",
            "A worldwide story everyone is talking about.",
            vec!["fresh".to_string()],
        )];

        let selected = select_event(&mut rng, &mut events, &user, 1.0);
        assert_eq!(selected, Some(events[0].id));

        let skipped = select_event(&mut rng, &mut events, &user, 0.0);
        assert_eq!(skipped, None);
    }
}
