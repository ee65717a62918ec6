//! High-level entity generation.
//!
//! Each function builds a prompt, runs it through the [`Generator`], and
//! parses the response into a domain value. Language models drift from
//! output contracts, so every generator carries a deterministic fallback
//! path.

use chrono::{Datelike, Utc};
use rand::Rng;
use tracing::warn;

use sim_types::{BehavioralProfile, Event, EventSeed, EventType, Gender, Post, User};

use crate::parse::{labeled_list, labeled_value, slugify_tag};
use crate::prompts;
use crate::provider::{GenerateError, Generator};
use crate::sanitize::clean_generated_content;

/// Username attempts before falling back to `User` plus a random suffix.
const MAX_USERNAME_ATTEMPTS: u32 = 3;

/// Interests per user; responses outside this band trigger a retry.
const MIN_INTERESTS: usize = 4;

/// Tag cap per post.
const MAX_TAGS: usize = 5;

/// Demographics drawn from the weight tables before generation starts.
///
/// The draw is separate from generation so the weighted-selection side owns
/// all randomness over distributions and this crate only owns text.
#[derive(Debug, Clone)]
pub struct UserDraw {
    pub age: u8,
    pub gender: Gender,
    pub region: String,
    pub tone: String,
    pub verbosity: u8,
    pub interaction_value: u8,
    pub response_speed: u8,
}

/// Outcome of a vote decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub is_like: bool,
    pub keywords: Vec<String>,
}

/// Generates a complete user from drawn demographics.
///
/// Retries when the response is missing a usable username or enough
/// interests; after [`MAX_USERNAME_ATTEMPTS`] the username falls back to
/// `User` plus two random characters and interests fall back to
/// demographic-derived defaults.
pub async fn generate_user<R: Rng>(
    generator: &Generator,
    draw: &UserDraw,
    existing_usernames: &[String],
    rng: &mut R,
) -> Result<User, GenerateError> {
    let prompt = prompts::user_prompt(
        draw.age,
        draw.gender.key(),
        &draw.region,
        &draw.tone,
        draw.verbosity,
        draw.interaction_value,
    );

    let mut username = String::new();
    let mut interests: Vec<String> = Vec::new();

    for _ in 0..MAX_USERNAME_ATTEMPTS {
        let response = generator.generate(&prompt).await?;

        if let Some(value) = labeled_value(&response, "USERNAME") {
            username = value;
        }
        interests = labeled_list(&response, "INTERESTS")
            .into_iter()
            .filter(|interest| interest_word_count_ok(interest))
            .collect();

        if username_ok(&username, existing_usernames) && interests.len() >= MIN_INTERESTS {
            break;
        }
    }

    if !username_ok(&username, existing_usernames) {
        username = fallback_username(rng);
    }

    if interests.len() < MIN_INTERESTS {
        let retry = prompts::interests_retry_prompt(draw.age, draw.gender.key(), &draw.region);
        let response = generator.generate(&retry).await?;
        interests = labeled_list(&response, "INTERESTS")
            .into_iter()
            .filter(|interest| interest_word_count_ok(interest))
            .collect();
    }

    if interests.len() < MIN_INTERESTS {
        warn!(username = %username, "falling back to demographic interests");
        interests = fallback_interests(draw);
    }

    Ok(User::new(
        username,
        draw.age,
        draw.gender,
        draw.region.clone(),
        draw.interaction_value,
        interests,
        BehavioralProfile::new(draw.tone.clone(), draw.verbosity, draw.response_speed),
    ))
}

/// Generates a free-form region name.
///
/// Returns `None` when the response carries no `REGION:` line; the caller
/// then falls back to the weighted region table.
pub async fn generate_region(generator: &Generator) -> Result<Option<String>, GenerateError> {
    let response = generator.generate(&prompts::region_prompt()).await?;
    Ok(labeled_value(&response, "REGION"))
}

/// Generates the body text for a new post, optionally about an event.
pub async fn generate_post(
    generator: &Generator,
    user: &User,
    event: Option<&Event>,
    injected: &[String],
) -> Result<String, GenerateError> {
    let prompt = prompts::post_prompt(user, event, injected);
    let response = generator.generate(&prompt).await?;
    let cleaned = clean_generated_content(&response, false);
    if cleaned.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(cleaned)
}

/// Generates the body text for a reply in an existing thread.
pub async fn generate_reply(
    generator: &Generator,
    user: &User,
    original: &Post,
    previous: &[&Post],
    injected: &[String],
) -> Result<String, GenerateError> {
    let prompt = prompts::reply_prompt(user, original, previous, injected);
    let response = generator.generate(&prompt).await?;
    let cleaned = clean_generated_content(&response, true);
    if cleaned.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(cleaned)
}

/// Generates up to [`MAX_TAGS`] slugified hashtags for a post body.
pub async fn generate_tags(
    generator: &Generator,
    content: &str,
) -> Result<Vec<String>, GenerateError> {
    let response = generator.generate(&prompts::tags_prompt(content)).await?;
    let tags: Vec<String> = labeled_list(&response, "TAGS")
        .iter()
        .map(|tag| slugify_tag(tag))
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect();
    Ok(tags)
}

/// Decides whether `user` likes or dislikes `post`.
///
/// A malformed response falls back to an 80% like with a generic keyword
/// rather than failing the action.
pub async fn generate_vote<R: Rng>(
    generator: &Generator,
    user: &User,
    post: &Post,
    rng: &mut R,
) -> Result<VoteOutcome, GenerateError> {
    let response = generator.generate(&prompts::vote_prompt(user, post)).await?;

    let vote = labeled_value(&response, "VOTE");
    let reason = labeled_value(&response, "REASON");

    match (vote, reason) {
        (Some(vote), Some(reason)) if is_vote_word(&vote) => {
            let is_like = vote.trim().eq_ignore_ascii_case("like");
            let keyword = reason
                .split_whitespace()
                .next()
                .unwrap_or("content")
                .to_lowercase();
            Ok(VoteOutcome {
                is_like,
                keywords: vec![keyword],
            })
        }
        _ => {
            let is_like = rng.gen_bool(0.8);
            Ok(VoteOutcome {
                is_like,
                keywords: vec![if is_like { "content" } else { "irrelevant" }.to_string()],
            })
        }
    }
}

fn is_vote_word(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("like") || value.eq_ignore_ascii_case("dislike")
}

/// Generates a platform event of the given type.
///
/// A complete seed bypasses generation entirely. Generation and parse
/// failures degrade to a canned event of the right type instead of
/// erroring, so event scheduling never stalls on a flaky provider.
pub async fn generate_event<R: Rng>(
    generator: &Generator,
    event_type: EventType,
    seed: Option<&EventSeed>,
    regions: &[String],
    rng: &mut R,
) -> Event {
    if let Some(seed) = seed {
        if !seed.title.is_empty() && !seed.description.is_empty() && !seed.tags.is_empty() {
            let event = Event::new(event_type, seed.title.clone(), seed.description.clone(), seed.tags.clone());
            return if event_type == EventType::Regional {
                event.with_regions(seed.regions.clone())
            } else {
                event
            };
        }
    }

    let region_refs: Vec<&str> = regions.iter().map(String::as_str).collect();
    let prompt = prompts::event_prompt(event_type, &region_refs);

    match generator.generate(&prompt).await {
        Ok(response) => match parse_event_response(&response, event_type, regions, rng) {
            Some(event) => event,
            None => {
                warn!(kind = event_type.key(), "event response failed validation, using fallback");
                fallback_event(event_type, regions)
            }
        },
        Err(error) => {
            warn!(kind = event_type.key(), %error, "event generation failed, using fallback");
            fallback_event(event_type, regions)
        }
    }
}

fn parse_event_response<R: Rng>(
    response: &str,
    event_type: EventType,
    regions: &[String],
    rng: &mut R,
) -> Option<Event> {
    let title = labeled_value(response, "TITLE")?;
    let description = labeled_value(response, "DESCRIPTION")?;
    if title.len() < 5 || description.len() < 10 {
        return None;
    }

    let mut tags: Vec<String> = labeled_list(response, "TAGS")
        .iter()
        .map(|tag| slugify_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect();
    if tags.is_empty() {
        tags = vec![unique_event_tag(event_type, &title), event_type.key().to_string()];
    }

    let event = Event::new(event_type, title, description, tags);
    if event_type != EventType::Regional {
        return Some(event);
    }

    let mut event_regions: Vec<String> = labeled_list(response, "REGIONS")
        .into_iter()
        .filter(|region| regions.iter().any(|known| known == region))
        .collect();
    if event_regions.is_empty() && !regions.is_empty() {
        event_regions = vec![regions[rng.gen_range(0..regions.len())].clone()];
    }
    Some(event.with_regions(event_regions))
}

fn unique_event_tag(event_type: EventType, title: &str) -> String {
    let year = Utc::now().year();
    let slug: String = slugify_tag(title).chars().take(30).collect();
    let slug = slug.trim_end_matches('-');
    format!("{}-{}-{}", event_type.key(), slug, year)
}

fn fallback_event(event_type: EventType, regions: &[String]) -> Event {
    let year = Utc::now().year();
    match event_type {
        EventType::Tag => Event::new(
            event_type,
            "Trending Topic Gains Momentum",
            "A new trend is spreading across social media, sparking discussions and creative content.",
            vec![
                format!("trending-topic-{year}"),
                "viral-content".to_string(),
                "social-media".to_string(),
            ],
        ),
        EventType::Regional => {
            let region = regions.first().cloned().unwrap_or_else(|| "North America".to_string());
            Event::new(
                event_type,
                format!("Local Event Impacts {region}"),
                format!("A significant regional development is affecting communities across {region}."),
                vec![
                    format!("regional-event-{}-{year}", slugify_tag(&region)),
                    "local-news".to_string(),
                    "community-impact".to_string(),
                ],
            )
            .with_regions(vec![region])
        }
        EventType::World => Event::new(
            event_type,
            "Global Phenomenon Captures Attention",
            "A worldwide event is making headlines and generating discussions across all regions.",
            vec![
                format!("global-event-{year}"),
                "worldwide-impact".to_string(),
                "international-news".to_string(),
            ],
        ),
    }
}

fn username_ok(username: &str, existing: &[String]) -> bool {
    username.len() >= 3
        && !existing
            .iter()
            .any(|taken| taken.eq_ignore_ascii_case(username))
}

fn interest_word_count_ok(interest: &str) -> bool {
    let words = interest.split_whitespace().count();
    (1..=5).contains(&words)
}

fn fallback_username<R: Rng>(rng: &mut R) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let suffix: String = (0..2)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("User{suffix}")
}

fn fallback_interests(draw: &UserDraw) -> Vec<String> {
    vec![
        format!("{} Culture", draw.region),
        format!(
            "Local {}",
            if draw.gender == Gender::Male { "Sports" } else { "Arts" }
        ),
        if draw.age < 30 { "Social Media" } else { "Traditional Media" }.to_string(),
        if draw.verbosity > 5 { "Creative Writing" } else { "Visual Arts" }.to_string(),
    ]
}
