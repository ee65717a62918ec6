//! End-to-end engine tests driven through a scripted generator.

use sim_core::{set_weight, validate_weights, SimState, Simulator, Tuning, VoteTarget};
use sim_types::{EventType, RecentActionKind, MAX_RECENT_ACTIONS};
use textgen::fixtures::{sample_user_response, ScriptedGenerator};
use textgen::Generator;
use uuid::Uuid;

fn scripted_simulator(scripted: ScriptedGenerator, tuning: Tuning) -> Simulator {
    Simulator::new(tuning, Generator::with_provider(Box::new(scripted)), 7)
}

/// Seeds users from scripted responses and checks a full posting round:
/// generated content, parsed tags, tag usage learning, recent actions.
#[tokio::test]
async fn test_population_and_posting_round() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("coffee_prophet"),
        sample_user_response("midnight_rambler"),
        "Anyone else obsessed with pour-over lately? Changed my mornings.".to_string(),
        "TAGS: coffee, brewing".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    sim.add_user().await.unwrap();
    assert_eq!(sim.state().users.len(), 2);
    assert_eq!(sim.state().users[0].username, "coffee_prophet");
    assert!(sim.state().users[0].interests.len() >= 4);

    let post_id = sim.add_post(None, None).await.unwrap();
    let post = sim.state().post(post_id).unwrap();
    assert_eq!(post.tags, vec!["coffee", "brewing"]);
    assert!(!post.is_reply());

    let author = sim.state().user(post.author).unwrap();
    assert!(
        author.used_tags.iter().any(|t| t.tag == "coffee"),
        "posting should count tag usage for the author"
    );

    assert_eq!(sim.state().recent_actions[0].kind, RecentActionKind::Post);
    assert_eq!(sim.state().recent_actions[1].kind, RecentActionKind::User);
}

/// A reply inherits its parent's thread and carries one interest tag.
#[tokio::test]
async fn test_reply_joins_parent_thread() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("thread_starter"),
        sample_user_response("lurker_no_more"),
        "Hot take: bouldering gyms peaked five years ago.".to_string(),
        "TAGS: bouldering".to_string(),
        "Strong disagree, the new gyms have way better setting.".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    sim.add_user().await.unwrap();
    let parent_id = sim.add_post(None, None).await.unwrap();
    let reply_id = sim.add_post(None, Some(parent_id)).await.unwrap();

    let parent = sim.state().post(parent_id).unwrap().clone();
    let reply = sim.state().post(reply_id).unwrap();
    assert!(reply.is_reply());
    assert_eq!(reply.reply_to, Some(parent_id));
    assert_eq!(reply.thread_id, parent.thread_id);
    assert_eq!(reply.tags.len(), 1, "replies carry a single interest tag");

    let replies = sim.state().replies_to(parent_id);
    assert_eq!(replies.len(), 1);
}

/// A landed vote records the voter, accumulates keywords on the post, and
/// feeds the voter's preference profile.
#[tokio::test]
async fn test_vote_lands_and_updates_preferences() {
    let scripted =
        ScriptedGenerator::new().with_fallback("VOTE: like\nREASON: content, insightful");
    scripted.push_many([
        sample_user_response("author_a"),
        sample_user_response("voter_b"),
        "Urban beekeeping update: the hive made it through winter.".to_string(),
        "TAGS: beekeeping".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    sim.add_user().await.unwrap();
    let author = sim.state().users[0].id;
    let post_id = sim.add_post(Some(author), None).await.unwrap();

    // The actor draw may pick the author, who has nothing to vote on.
    let mut landed = false;
    for _ in 0..50 {
        if sim.add_vote().await.unwrap() {
            landed = true;
            break;
        }
    }
    assert!(landed, "a vote should land within 50 attempts");

    let post = sim.state().post(post_id).unwrap().clone();
    assert_eq!(post.likes.len(), 1);
    assert_ne!(post.likes[0], author, "authors cannot vote on their own posts");
    assert!(post.keywords.contains(&"content".to_string()));

    let voter = sim.state().user(post.likes[0]).unwrap();
    assert!(
        voter.preferences.likes.iter().any(|k| k.keyword == "content"),
        "vote keywords should accumulate on the voter"
    );
    assert_eq!(sim.state().votable_posts(post.likes[0]).len(), 0);
}

/// Like and dislike toggles on the same target stay mutually exclusive.
#[tokio::test]
async fn test_manual_vote_toggles_stay_exclusive() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("toggler"),
        "Testing the waters with a first post.".to_string(),
        "TAGS: introductions".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    let author = sim.state().users[0].id;
    let post_id = sim.add_post(Some(author), None).await.unwrap();
    let outsider = Uuid::new_v4();

    let state = sim.state_mut();
    state
        .toggle_like(VoteTarget::Post, post_id, outsider)
        .unwrap();
    state
        .toggle_dislike(VoteTarget::Post, post_id, outsider)
        .unwrap();

    let post = state.post(post_id).unwrap();
    assert!(post.likes.is_empty(), "dislike should clear the standing like");
    assert_eq!(post.dislikes, vec![outsider]);
}

/// A tag event whose tag matches a user interest gets engaged when the
/// engage chance is forced to one: the post links the event and unions its
/// tags, and the event quota counts the post.
#[tokio::test]
async fn test_event_engagement_unions_tags() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("crimp_lord"),
        "TITLE: Bouldering World Cup Weekend\n\
         DESCRIPTION: Finals stream all weekend and everyone has opinions.\n\
         TAGS: bouldering"
            .to_string(),
        "Watching the finals and screaming at my screen.".to_string(),
        "TAGS: climbing".to_string(),
    ]);
    let mut tuning = Tuning::default();
    tuning.engagement.event_engage_chance = 1.0;
    let mut sim = scripted_simulator(scripted, tuning);

    sim.add_user().await.unwrap();
    let event_id = sim.add_event(Some(EventType::Tag), None).await.unwrap();
    let post_id = sim.add_post(None, None).await.unwrap();

    let post = sim.state().post(post_id).unwrap();
    assert_eq!(post.event_id, Some(event_id));
    assert!(post.tags.contains(&"climbing".to_string()));
    assert!(post.tags.contains(&"bouldering".to_string()));

    let event = sim.state().events.iter().find(|e| e.id == event_id).unwrap();
    assert_eq!(event.post_count, 1);
}

/// Injected instructions stamp generated posts and expire after their use
/// count runs out.
#[tokio::test]
async fn test_injection_stamps_posts_until_expiry() {
    let scripted = ScriptedGenerator::new();
    scripted.push(sample_user_response("pineapple_fan"));
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    let injection_id = sim.library_mut().inject("Mention pineapples", 2);

    let first = sim.add_post(None, None).await.unwrap();
    let second = sim.add_post(None, None).await.unwrap();
    let third = sim.add_post(None, None).await.unwrap();

    assert_eq!(sim.state().post(first).unwrap().injection_id, Some(injection_id));
    assert_eq!(sim.state().post(second).unwrap().injection_id, Some(injection_id));
    assert_eq!(
        sim.state().post(third).unwrap().injection_id,
        None,
        "the injection should expire after two uses"
    );
    assert!(sim.library().active_injections().is_empty());
}

/// Removing a user cascades to everything they authored.
#[tokio::test]
async fn test_user_removal_cascades() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("departing_soon"),
        sample_user_response("staying_put"),
        "One last post before I go.".to_string(),
        "TAGS: farewell".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    sim.add_user().await.unwrap();
    let departing = sim.state().users[0].id;
    let post_id = sim.add_post(Some(departing), None).await.unwrap();
    sim.add_comment(post_id, None).await.unwrap();

    sim.state_mut().remove_user(departing).unwrap();

    assert_eq!(sim.state().users.len(), 1);
    assert!(sim.state().posts.iter().all(|p| p.author != departing));
    assert!(sim.state().comments.iter().all(|c| c.author != departing));
}

/// The recent-action feed keeps only the newest entries, newest first.
#[tokio::test]
async fn test_recent_actions_are_capped() {
    let scripted = ScriptedGenerator::new();
    scripted.push(sample_user_response("busy_bee"));
    let mut sim = scripted_simulator(scripted, Tuning::default());
    sim.add_user().await.unwrap();

    for _ in 0..(MAX_RECENT_ACTIONS + 10) {
        sim.add_post(None, None).await.unwrap();
    }

    assert_eq!(sim.state().recent_actions.len(), MAX_RECENT_ACTIONS);
    assert_eq!(sim.state().recent_actions[0].kind, RecentActionKind::Post);
}

/// Snapshots survive a disk roundtrip and restore the instruction library.
#[tokio::test]
async fn test_snapshot_roundtrip_through_file() {
    let scripted = ScriptedGenerator::new();
    scripted.push_many([
        sample_user_response("archivist"),
        "Documenting everything, as always.".to_string(),
        "TAGS: archives".to_string(),
    ]);
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    sim.add_post(None, None).await.unwrap();
    let set_id = sim
        .library_mut()
        .add_set("noir", "Write like a detective novel narrator.");
    assert!(sim.select_instruction_set(set_id));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    SimState::save_snapshot(&sim.export_snapshot(), &path).unwrap();

    let mut restored = scripted_simulator(ScriptedGenerator::new(), Tuning::default());
    restored
        .import_snapshot(SimState::load_snapshot(&path).unwrap())
        .unwrap();

    assert_eq!(restored.state().users.len(), 1);
    assert_eq!(restored.state().posts.len(), 1);
    assert_eq!(restored.library().selected_id(), Some(set_id));
    assert_eq!(restored.state().users[0].username, "archivist");
}

/// Rebalancing one action weight keeps the whole table normalized.
#[tokio::test]
async fn test_weight_rebalance_keeps_state_valid() {
    let scripted = ScriptedGenerator::new();
    let mut sim = scripted_simulator(scripted, Tuning::default());

    set_weight(&mut sim.state_mut().weights.actions, "vote", 60.0).unwrap();
    validate_weights(&sim.state().weights).unwrap();
    assert!(sim.state().weights.actions.is_normalized());
}

/// Reset drops content and injections but keeps authored instruction sets.
#[tokio::test]
async fn test_reset_keeps_instruction_sets() {
    let scripted = ScriptedGenerator::new();
    scripted.push(sample_user_response("ephemeral"));
    let mut sim = scripted_simulator(scripted, Tuning::default());

    sim.add_user().await.unwrap();
    let set_id = sim.library_mut().add_set("dry", "Keep it factual.");
    sim.library_mut().inject("Plug the newsletter", 5);

    sim.reset();

    assert!(sim.state().users.is_empty());
    assert!(sim.library().sets().iter().any(|s| s.id == set_id));
    assert!(sim.library().active_injections().is_empty());
}
