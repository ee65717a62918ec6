//! Determinism verification tests
//!
//! The engine must produce identical action sequences and content given
//! the same seed and the same (seeded) offline generator.

use sim_core::{ActionKind, Simulator, Tuning};
use textgen::{Generator, TemplateGenerator};

fn seeded_simulator(seed: u64) -> Simulator {
    let generator = Generator::with_provider(Box::new(TemplateGenerator::seeded(seed)));
    Simulator::new(Tuning::default(), generator, seed)
}

async fn run_actions(seed: u64, count: usize) -> (Vec<ActionKind>, Vec<String>, Vec<String>) {
    let mut sim = seeded_simulator(seed);
    let mut kinds = Vec::with_capacity(count);
    for _ in 0..count {
        kinds.push(sim.simulate_action().await.unwrap());
    }

    let usernames = sim
        .state()
        .users
        .iter()
        .map(|u| u.username.clone())
        .collect();
    let contents = sim
        .state()
        .posts
        .iter()
        .map(|p| p.content.clone())
        .collect();
    (kinds, usernames, contents)
}

#[tokio::test]
async fn test_same_seed_same_run() {
    let first = run_actions(42, 40).await;
    let second = run_actions(42, 40).await;

    assert_eq!(first.0, second.0, "action sequences should match");
    assert_eq!(first.1, second.1, "usernames should match");
    assert_eq!(first.2, second.2, "post contents should match");
}

#[tokio::test]
async fn test_different_seeds_diverge() {
    let first = run_actions(42, 40).await;
    let second = run_actions(43, 40).await;

    assert!(
        first.0 != second.0 || first.1 != second.1 || first.2 != second.2,
        "different seeds should not replay the same run"
    );
}
