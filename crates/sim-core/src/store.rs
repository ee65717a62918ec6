//! State container.
//!
//! Owns every entity the simulation produces and enforces the structural
//! invariants: disjoint like/dislike voter sets, cascaded user deletion,
//! and the recent-action cap. Snapshot import/export lives here too.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use sim_types::{
    Comment, Event, Post, RecentAction, SimulationWeights, StateSnapshot, User,
    MAX_RECENT_ACTIONS, SNAPSHOT_VERSION,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown user: {0}")]
    UnknownUser(Uuid),
    #[error("unknown post: {0}")]
    UnknownPost(Uuid),
    #[error("unknown comment: {0}")]
    UnknownComment(Uuid),
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a vote toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Post,
    Comment,
}

/// All simulation entities plus the weight tables.
#[derive(Debug, Clone, Default)]
pub struct SimState {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub events: Vec<Event>,
    pub weights: SimulationWeights,
    /// Newest first, capped at [`MAX_RECENT_ACTIONS`].
    pub recent_actions: Vec<RecentAction>,
}

impl SimState {
    pub fn new() -> Self {
        Self {
            weights: SimulationWeights::default(),
            ..Self::default()
        }
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn post(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Usernames already taken, lowercased for collision checks.
    pub fn taken_usernames(&self) -> Vec<String> {
        self.users
            .iter()
            .map(|u| u.username.to_lowercase())
            .collect()
    }

    /// Top-level posts (non-replies), for the reply picker.
    pub fn parent_posts(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| !p.is_reply()).collect()
    }

    /// Replies under a post, oldest first.
    pub fn replies_to(&self, post_id: Uuid) -> Vec<&Post> {
        let mut replies: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.reply_to == Some(post_id))
            .collect();
        replies.sort_by_key(|p| p.created_at);
        replies
    }

    /// Posts the user can still vote on: not their own, not yet voted.
    pub fn votable_posts(&self, user_id: Uuid) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|p| p.author != user_id && !p.has_voted(&user_id))
            .collect()
    }

    /// Prepends an action, keeping only the newest [`MAX_RECENT_ACTIONS`].
    pub fn push_action(&mut self, action: RecentAction) {
        self.recent_actions.insert(0, action);
        self.recent_actions.truncate(MAX_RECENT_ACTIONS);
    }

    /// Removes a user and everything they authored.
    /// Sets a user's engagement propensity, clamped to the 1..=10 scale.
    pub fn update_interaction_value(
        &mut self,
        user_id: Uuid,
        value: u8,
    ) -> Result<(), StoreError> {
        let user = self
            .user_mut(user_id)
            .ok_or(StoreError::UnknownUser(user_id))?;
        user.interaction_value = value.clamp(1, 10);
        Ok(())
    }

    pub fn remove_user(&mut self, user_id: Uuid) -> Result<(), StoreError> {
        if self.user(user_id).is_none() {
            return Err(StoreError::UnknownUser(user_id));
        }
        self.users.retain(|u| u.id != user_id);
        self.posts.retain(|p| p.author != user_id);
        self.comments.retain(|c| c.author != user_id);
        Ok(())
    }

    /// Toggles a like. A standing dislike by the same user is cleared
    /// first so the voter sets stay disjoint.
    pub fn toggle_like(
        &mut self,
        target: VoteTarget,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let (likes, dislikes) = self.voter_sets(target, id)?;
        toggle_vote(likes, dislikes, user_id);
        Ok(())
    }

    /// Toggles a dislike, clearing a standing like by the same user.
    pub fn toggle_dislike(
        &mut self,
        target: VoteTarget,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let (likes, dislikes) = self.voter_sets(target, id)?;
        toggle_vote(dislikes, likes, user_id);
        Ok(())
    }

    fn voter_sets(
        &mut self,
        target: VoteTarget,
        id: Uuid,
    ) -> Result<(&mut Vec<Uuid>, &mut Vec<Uuid>), StoreError> {
        match target {
            VoteTarget::Post => {
                let post = self
                    .posts
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or(StoreError::UnknownPost(id))?;
                Ok((&mut post.likes, &mut post.dislikes))
            }
            VoteTarget::Comment => {
                let comment = self
                    .comments
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or(StoreError::UnknownComment(id))?;
                Ok((&mut comment.likes, &mut comment.dislikes))
            }
        }
    }

    /// Records a simulated vote on a post: voter id into the right set,
    /// keywords onto the post.
    pub fn record_vote(
        &mut self,
        post_id: Uuid,
        user_id: Uuid,
        is_like: bool,
        keywords: &[String],
    ) -> Result<(), StoreError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(StoreError::UnknownPost(post_id))?;

        if is_like {
            post.likes.push(user_id);
        } else {
            post.dislikes.push(user_id);
        }
        post.keywords.extend(keywords.iter().cloned());
        Ok(())
    }

    /// Bumps an event's post counter.
    pub fn record_event_post(&mut self, event_id: Uuid) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.record_post();
        }
    }

    /// Assembles a snapshot from this state plus the instruction parts the
    /// caller owns.
    pub fn to_snapshot(
        &self,
        instruction_sets: Vec<sim_types::InstructionSet>,
        selected_instruction_set: Option<Uuid>,
        injected_instructions: Vec<sim_types::InjectedInstruction>,
    ) -> StateSnapshot {
        StateSnapshot {
            version: SNAPSHOT_VERSION,
            users: self.users.clone(),
            posts: self.posts.clone(),
            comments: self.comments.clone(),
            events: self.events.clone(),
            weights: self.weights.clone(),
            recent_actions: self.recent_actions.clone(),
            instruction_sets,
            selected_instruction_set,
            injected_instructions,
        }
    }

    /// Rebuilds state from a snapshot, handing the instruction parts back.
    pub fn from_snapshot(
        snapshot: StateSnapshot,
    ) -> Result<
        (
            Self,
            Vec<sim_types::InstructionSet>,
            Option<Uuid>,
            Vec<sim_types::InjectedInstruction>,
        ),
        StoreError,
    > {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut recent_actions = snapshot.recent_actions;
        recent_actions.truncate(MAX_RECENT_ACTIONS);

        let state = Self {
            users: snapshot.users,
            posts: snapshot.posts,
            comments: snapshot.comments,
            events: snapshot.events,
            weights: snapshot.weights,
            recent_actions,
        };

        Ok((
            state,
            snapshot.instruction_sets,
            snapshot.selected_instruction_set,
            snapshot.injected_instructions,
        ))
    }

    /// Writes a snapshot to disk as pretty JSON.
    pub fn save_snapshot(snapshot: &StateSnapshot, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let json = snapshot.to_json()?;
        fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "saved state snapshot");
        Ok(())
    }

    /// Reads a snapshot back from disk.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<StateSnapshot, StoreError> {
        let json = fs::read_to_string(path.as_ref())?;
        Ok(StateSnapshot::from_json(&json)?)
    }
}

fn toggle_vote(target: &mut Vec<Uuid>, opposite: &mut Vec<Uuid>, user_id: Uuid) {
    if target.contains(&user_id) {
        target.retain(|id| *id != user_id);
    } else {
        target.push(user_id);
        opposite.retain(|id| *id != user_id);
    }
}
