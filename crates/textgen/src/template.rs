//! Offline template provider.
//!
//! Serves canned, contract-conforming responses keyed off the prompt's
//! output contract. Useful for demos, tests, and running the simulation
//! with no model endpoint at all. Classification checks the most specific
//! contract labels first since the event prompt mentions several.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::provider::{GenerateError, TextGenerator};

const USERNAMES: &[&str] = &[
    "MossGarden", "bean_counter", "night_owl", "QuietHiker", "PixelPainter",
    "fernweh", "static_bloom", "RainyDayReader", "kilnfired", "orbit_decay",
    "sourdough_sam", "velvetfog", "TrailMixTakes", "inkwell", "lowtide",
];

const INTEREST_SETS: &[&str] = &[
    "Vintage Synthesizer Repair, Bouldering, Science Fiction Writing, Urban Beekeeping",
    "Home Coffee Roasting, Trail Running, Documentary Photography, Fermentation",
    "Mechanical Keyboards, Night Sky Photography, Korean Cooking, Zine Making",
    "Wild Swimming, Ceramic Glazing, Retro Game Preservation, Birdwatching",
    "Analog Film Development, Community Gardening, Jazz Piano, Longboarding",
];

const REGIONS: &[&str] = &[
    "Tokyo Bay Area", "Scottish Highlands", "Pacific Northwest", "Rhine Valley",
    "Mekong Delta", "Andean Foothills", "Baltic Coast", "Great Lakes Region",
];

const POSTS: &[&str] = &[
    "ok so my third attempt at sourdough actually worked and I don't trust it",
    "hot take: the best part of any hike is the gas station snacks on the drive home",
    "does anyone actually calibrate their monitors or do we all just live with it",
    "rain on a tin roof is still the best album of the year, no skips",
    "the community garden plot lottery results are in and I have opinions 🌱",
    "spent two hours debugging and the fix was a single missing comma. rich inner life, this hobby",
    "night market season is back and my wallet is already filing a complaint",
    "tried explaining my hobby at dinner and watched everyone's eyes glaze over in real time",
];

const REPLIES: &[&str] = &[
    "hard agree, this matches what I've seen too",
    "counterpoint: it depends entirely on the weather that day",
    "this thread is the only good thing on my feed today",
    "I had the exact opposite experience last month, interesting",
    "saving this, genuinely useful",
    "ok but have you tried doing it the other way around?",
];

const TAG_SETS: &[&str] = &[
    "TAGS: baking, sourdough, home-cooking",
    "TAGS: hiking, outdoors, weekend-trips",
    "TAGS: music, album-review",
    "TAGS: gardening, community, urban-gardening",
    "TAGS: photography, night-sky",
];

const VOTE_RESPONSES: &[&str] = &[
    "VOTE: LIKE\nREASON: relatable",
    "VOTE: LIKE\nREASON: hobbies",
    "VOTE: LIKE\nREASON: community",
    "VOTE: LIKE\nREASON: humor",
    "VOTE: DISLIKE\nREASON: irrelevant",
];

const EVENT_RESPONSES: &[&str] = &[
    "TITLE: Community Garden Festival Announced\n\
     DESCRIPTION: A city-wide gardening festival invites residents to showcase their plots and swap seeds.\n\
     TAGS: garden-festival, community, urban-gardening\n\
     REGIONS: Europe",
    "TITLE: Indie Game Jam Breaks Participation Record\n\
     DESCRIPTION: Thousands of developers join a weekend game jam, producing hundreds of experimental titles.\n\
     TAGS: game-jam, indie-games, game-development\n\
     REGIONS: North America",
    "TITLE: Rare Comet Visible Worldwide This Week\n\
     DESCRIPTION: Astronomers confirm a once-in-a-decade comet will be visible to the naked eye across all regions.\n\
     TAGS: comet-watch, astronomy, night-sky\n\
     REGIONS: Asia",
];

/// Canned-response provider for offline runs.
pub struct TemplateGenerator {
    rng: Mutex<SmallRng>,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Deterministic variant for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn pick<'a>(&self, pool: &[&'a str]) -> &'a str {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pool[rng.gen_range(0..pool.len())]
    }

    fn respond(&self, prompt: &str) -> String {
        if prompt.contains("TITLE:") {
            return self.pick(EVENT_RESPONSES).to_string();
        }
        if prompt.contains("USERNAME:") {
            return format!(
                "USERNAME: {}\nINTERESTS: {}",
                self.pick(USERNAMES),
                self.pick(INTEREST_SETS)
            );
        }
        if prompt.contains("VOTE:") {
            return self.pick(VOTE_RESPONSES).to_string();
        }
        if prompt.contains("REGION:") {
            return format!("REGION: {}", self.pick(REGIONS));
        }
        if prompt.contains("TAGS:") {
            return self.pick(TAG_SETS).to_string();
        }
        if prompt.contains("INTERESTS:") {
            return format!("INTERESTS: {}", self.pick(INTEREST_SETS));
        }
        if prompt.contains("You are replying to a discussion") {
            return self.pick(REPLIES).to_string();
        }
        self.pick(POSTS).to_string()
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        Ok(self.respond(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts;
    use sim_types::EventType;

    #[tokio::test]
    async fn test_user_prompt_gets_contract_response() {
        let generator = TemplateGenerator::seeded(1);
        let prompt = prompts::user_prompt(25, "female", "Europe", "dry", 5, 5);
        let response = generator.generate(&prompt).await.unwrap();
        assert!(response.contains("USERNAME: "));
        assert!(response.contains("INTERESTS: "));
    }

    #[tokio::test]
    async fn test_event_prompt_beats_tags_prompt_in_classification() {
        let generator = TemplateGenerator::seeded(2);
        let prompt = prompts::event_prompt(EventType::Tag, &["Europe"]);
        let response = generator.generate(&prompt).await.unwrap();
        assert!(response.contains("TITLE: "));
        assert!(response.contains("DESCRIPTION: "));
    }

    #[tokio::test]
    async fn test_tags_prompt_gets_tags_line() {
        let generator = TemplateGenerator::seeded(3);
        let response = generator.generate(&prompts::tags_prompt("body")).await.unwrap();
        assert!(response.starts_with("TAGS: "));
    }

    #[tokio::test]
    async fn test_vote_prompt_gets_vote_line() {
        let generator = TemplateGenerator::seeded(4);
        // Vote prompts always carry the VOTE: contract example.
        let response = generator.generate("Format your response EXACTLY like this:\nVOTE: LIKE\nREASON: topic").await.unwrap();
        assert!(response.starts_with("VOTE: "));
    }

    #[tokio::test]
    async fn test_seeded_generators_agree() {
        let a = TemplateGenerator::seeded(42);
        let b = TemplateGenerator::seeded(42);
        for _ in 0..5 {
            assert_eq!(a.respond("free-form post"), b.respond("free-form post"));
        }
    }
}
