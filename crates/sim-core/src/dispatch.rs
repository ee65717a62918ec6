//! Action dispatch.
//!
//! [`Simulator`] glues the pieces together: it draws the next action from
//! the action weights, picks the acting user by interaction value, runs
//! content generation, and commits the results to the state container.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use sim_types::{
    Comment, Event, EventSeed, EventType, Gender, Post, RecentAction, RecentActionKind,
    StateSnapshot, User,
};
use textgen::{
    generate_event, generate_post, generate_region, generate_reply, generate_tags, generate_user,
    generate_vote, GenerateError, Generator, InstructionLibrary, UserDraw,
};

use crate::config::Tuning;
use crate::events::{interaction_probability, select_event};
use crate::learning::{record_tag_usage, record_vote_keywords};
use crate::select::{age_from_range, level_value, pick_actor, weighted_choice, InteractionLevel};
use crate::store::{SimState, StoreError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("no users available to act")]
    NoUsers,
}

/// What a simulation tick ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddUser,
    Post,
    Reply,
    Vote,
    Event,
    /// Drew an action that had nothing to act on this tick.
    Skip,
}

/// The simulation engine: state, generator, instruction registry, RNG.
pub struct Simulator {
    state: SimState,
    generator: Generator,
    library: InstructionLibrary,
    tuning: Tuning,
    rng: SmallRng,
}

impl Simulator {
    pub fn new(tuning: Tuning, generator: Generator, seed: u64) -> Self {
        Self {
            state: SimState::new(),
            generator,
            library: InstructionLibrary::new(),
            tuning,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn library(&self) -> &InstructionLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut InstructionLibrary {
        &mut self.library
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Selects an instruction set as the generation preamble.
    pub fn select_instruction_set(&mut self, id: Uuid) -> bool {
        if !self.library.select_set(id) {
            return false;
        }
        let instructions = self
            .library
            .selected_instructions()
            .unwrap_or_default()
            .to_string();
        self.generator.set_preamble(instructions);
        true
    }

    /// Clears the instruction-set selection, restoring the default
    /// preamble.
    pub fn clear_instruction_set(&mut self) {
        self.library.clear_selection();
        self.generator.set_preamble(String::new());
    }

    /// Creates one user from the demographic weight tables.
    pub async fn add_user(&mut self) -> Result<Uuid, SimError> {
        let draw = self.draw_demographics().await?;
        let taken = self.state.taken_usernames();
        let user = generate_user(&self.generator, &draw, &taken, &mut self.rng).await?;
        let user_id = user.id;

        info!(username = %user.username, region = %user.region, "user joined");
        self.state.push_action(RecentAction::new(
            RecentActionKind::User,
            user_id,
            format!("New user {} joined", user.username),
        ));
        self.state.users.push(user);
        Ok(user_id)
    }

    async fn draw_demographics(&mut self) -> Result<UserDraw, SimError> {
        let weights = self.state.weights.clone();

        let gender = weighted_choice(&mut self.rng, &weights.gender)
            .and_then(Gender::from_key)
            .unwrap_or(Gender::NonDisclosed);
        let age = weighted_choice(&mut self.rng, &weights.age_ranges)
            .and_then(|range| age_from_range(&mut self.rng, range))
            .unwrap_or(30);
        let tone = weighted_choice(&mut self.rng, &weights.tone)
            .unwrap_or("neutral")
            .to_string();
        let interaction_value = weighted_choice(&mut self.rng, &weights.interaction_value)
            .and_then(InteractionLevel::from_key)
            .map(|level| level_value(&mut self.rng, level))
            .unwrap_or(5);
        let verbosity = weighted_choice(&mut self.rng, &weights.verbosity)
            .and_then(InteractionLevel::from_key)
            .map(|level| level_value(&mut self.rng, level))
            .unwrap_or(5);

        let region = if weights.use_region_weights {
            None
        } else {
            generate_region(&self.generator).await?
        };
        let region = match region {
            Some(region) => region,
            None => weighted_choice(&mut self.rng, &weights.regions)
                .unwrap_or("North America")
                .to_string(),
        };

        Ok(UserDraw {
            age,
            gender,
            region,
            tone,
            verbosity,
            interaction_value,
            response_speed: self.rng.gen_range(1..=10),
        })
    }

    /// Creates a post or reply.
    ///
    /// With no explicit author the actor is drawn by interaction value.
    /// Top-level posts may engage a relevant active event; replies inherit
    /// their parent's thread and carry no generated tags.
    pub async fn add_post(
        &mut self,
        author: Option<Uuid>,
        reply_to: Option<Uuid>,
    ) -> Result<Uuid, SimError> {
        let actor = match author {
            Some(id) => self
                .state
                .user(id)
                .cloned()
                .ok_or(StoreError::UnknownUser(id))?,
            None => pick_actor(&mut self.rng, &self.state.users)
                .cloned()
                .ok_or(SimError::NoUsers)?,
        };

        let injected = self.library.active_injections();
        let injection_ids = self.library.active_injection_ids();

        let post = if let Some(parent_id) = reply_to {
            let parent = self
                .state
                .post(parent_id)
                .cloned()
                .ok_or(StoreError::UnknownPost(parent_id))?;
            let previous = self.state.replies_to(parent_id);
            let content =
                generate_reply(&self.generator, &actor, &parent, &previous, &injected).await?;

            // Replies carry a single interest-derived tag.
            let tags = vec![self.fallback_tag(&actor)];
            Post::new(actor.id, parent.thread_id, content, tags).with_reply_to(parent_id)
        } else {
            let event_id = {
                let engage = self.tuning.engagement.event_engage_chance;
                select_event(&mut self.rng, &mut self.state.events, &actor, engage)
            };
            let event = event_id.and_then(|id| {
                self.state
                    .events
                    .iter()
                    .find(|e| e.id == id)
                    .cloned()
            });

            let content =
                generate_post(&self.generator, &actor, event.as_ref(), &injected).await?;
            let mut tags = generate_tags(&self.generator, &content).await?;
            if tags.is_empty() {
                tags = vec![self.fallback_tag(&actor)];
            }
            if let Some(event) = &event {
                for tag in &event.tags {
                    if !tags.contains(tag) {
                        tags.push(tag.clone());
                    }
                }
            }

            let mut post = Post::new(actor.id, Uuid::new_v4(), content, tags);
            if let Some(event) = &event {
                post = post.with_event(event.id);
                self.state.record_event_post(event.id);
            }
            post
        };

        let post = match injection_ids.first() {
            Some(id) => post.with_injection(*id),
            None => post,
        };
        for id in &injection_ids {
            self.library.record_use(*id);
        }

        if let Some(user) = self.state.user_mut(actor.id) {
            record_tag_usage(user, &post.tags);
        }

        let is_reply = post.is_reply();
        let post_id = post.id;
        debug!(author = %actor.username, reply = is_reply, "post created");
        self.state.push_action(
            RecentAction::new(
                if is_reply {
                    RecentActionKind::Reply
                } else {
                    RecentActionKind::Post
                },
                actor.id,
                format!(
                    "{} {}",
                    actor.username,
                    if is_reply {
                        "replied to a post"
                    } else {
                        "created a new post"
                    }
                ),
            )
            .with_post(post_id),
        );
        self.state.posts.push(post);
        Ok(post_id)
    }

    /// Creates a comment under a post, optionally threaded under another
    /// comment.
    pub async fn add_comment(
        &mut self,
        post_id: Uuid,
        parent_comment_id: Option<Uuid>,
    ) -> Result<Uuid, SimError> {
        let post = self
            .state
            .post(post_id)
            .cloned()
            .ok_or(StoreError::UnknownPost(post_id))?;
        let actor = pick_actor(&mut self.rng, &self.state.users)
            .cloned()
            .ok_or(SimError::NoUsers)?;

        let injected = self.library.active_injections();
        let content = generate_reply(&self.generator, &actor, &post, &[], &injected).await?;

        let mut comment = Comment::new(post_id, actor.id, content);
        if let Some(parent) = parent_comment_id {
            comment = comment.with_parent(parent);
        }
        let comment_id = comment.id;

        self.state.push_action(
            RecentAction::new(
                RecentActionKind::Comment,
                actor.id,
                format!("{} commented on a post", actor.username),
            )
            .with_post(post_id)
            .with_comment(comment_id),
        );
        self.state.comments.push(comment);
        Ok(comment_id)
    }

    /// Runs one simulated vote.
    ///
    /// The voter may skip entirely when the post is old; a skipped vote
    /// leaves no trace. Returns whether a vote landed.
    pub async fn add_vote(&mut self) -> Result<bool, SimError> {
        let actor = pick_actor(&mut self.rng, &self.state.users)
            .cloned()
            .ok_or(SimError::NoUsers)?;

        let candidates = self.state.votable_posts(actor.id);
        if candidates.is_empty() {
            return Ok(false);
        }
        let post = candidates[self.rng.gen_range(0..candidates.len())].clone();

        // Engagement decays with post age.
        let probability = interaction_probability(post.created_at, chrono::Utc::now());
        if self.rng.gen::<f64>() > probability {
            debug!(voter = %actor.username, "vote skipped on stale post");
            return Ok(false);
        }

        let outcome = generate_vote(&self.generator, &actor, &post, &mut self.rng).await?;
        self.state
            .record_vote(post.id, actor.id, outcome.is_like, &outcome.keywords)?;
        if let Some(user) = self.state.user_mut(actor.id) {
            record_vote_keywords(user, outcome.is_like, &outcome.keywords);
        }

        self.state.push_action(
            RecentAction::new(
                RecentActionKind::Vote,
                actor.id,
                format!(
                    "{} {} a post",
                    actor.username,
                    if outcome.is_like { "liked" } else { "disliked" }
                ),
            )
            .with_post(post.id),
        );
        Ok(true)
    }

    /// Creates a platform event. The type is drawn from the event weights
    /// unless given; a complete seed skips generation.
    pub async fn add_event(
        &mut self,
        event_type: Option<EventType>,
        seed: Option<&EventSeed>,
    ) -> Result<Uuid, SimError> {
        let event_type = event_type
            .or_else(|| {
                weighted_choice(&mut self.rng, &self.state.weights.events)
                    .and_then(EventType::from_key)
            })
            .unwrap_or(EventType::Tag);

        let regions: Vec<String> = self
            .state
            .weights
            .regions
            .keys()
            .map(str::to_string)
            .collect();
        let event: Event =
            generate_event(&self.generator, event_type, seed, &regions, &mut self.rng).await;
        let event_id = event.id;

        info!(kind = event_type.key(), title = %event.title, "event created");
        self.state.events.push(event);
        Ok(event_id)
    }

    /// Draws and performs one action from the action weights.
    pub async fn simulate_action(&mut self) -> Result<ActionKind, SimError> {
        let action = weighted_choice(&mut self.rng, &self.state.weights.actions)
            .unwrap_or("generate_post")
            .to_string();

        match action.as_str() {
            "add_user" => {
                self.add_user().await?;
                Ok(ActionKind::AddUser)
            }
            "vote" => {
                if self.state.users.is_empty() || self.state.posts.is_empty() {
                    return Ok(ActionKind::Skip);
                }
                match self.add_vote().await? {
                    true => Ok(ActionKind::Vote),
                    false => Ok(ActionKind::Skip),
                }
            }
            "generate_event" => {
                self.add_event(None, None).await?;
                Ok(ActionKind::Event)
            }
            _ => {
                if self.state.users.is_empty() {
                    return Ok(ActionKind::Skip);
                }
                let parents: Vec<Uuid> =
                    self.state.parent_posts().iter().map(|p| p.id).collect();
                let is_reply =
                    !parents.is_empty() && self.rng.gen::<f64>() < self.tuning.engagement.reply_chance;

                if is_reply {
                    let parent = parents[self.rng.gen_range(0..parents.len())];
                    self.add_post(None, Some(parent)).await?;
                    Ok(ActionKind::Reply)
                } else {
                    self.add_post(None, None).await?;
                    Ok(ActionKind::Post)
                }
            }
        }
    }

    fn fallback_tag(&mut self, user: &User) -> String {
        if user.interests.is_empty() {
            return "general".to_string();
        }
        let interest = &user.interests[self.rng.gen_range(0..user.interests.len())];
        interest.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
    }

    /// Full-state snapshot, including the instruction registry.
    pub fn export_snapshot(&self) -> StateSnapshot {
        self.state.to_snapshot(
            self.library.sets().to_vec(),
            self.library.selected_id(),
            self.library.injected().to_vec(),
        )
    }

    /// Replaces all state from a snapshot.
    pub fn import_snapshot(&mut self, snapshot: StateSnapshot) -> Result<(), SimError> {
        let (state, sets, selected, injected) = SimState::from_snapshot(snapshot)?;
        self.state = state;
        self.library = InstructionLibrary::from_parts(sets, selected, injected);
        let preamble = self
            .library
            .selected_instructions()
            .unwrap_or_default()
            .to_string();
        self.generator.set_preamble(preamble);
        Ok(())
    }

    /// Resets to an empty state with default weights. Instruction sets are
    /// kept; injections are not.
    pub fn reset(&mut self) {
        let sets = self.library.sets().to_vec();
        let selected = self.library.selected_id();
        self.state = SimState::new();
        self.library = InstructionLibrary::from_parts(sets, selected, Vec::new());
    }
}
