//! Simulation loop.
//!
//! Drives [`Simulator::simulate_action`] on a fixed interval. A tick that
//! is still generating when the next one comes due simply swallows the
//! missed ticks; actions never overlap.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::dispatch::{ActionKind, SimError, Simulator};

/// Tally of what a run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub counts: HashMap<ActionKind, u64>,
}

impl RunSummary {
    pub fn count(&self, kind: ActionKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Owns a simulator and runs it for a bounded number of ticks.
pub struct Runner {
    simulator: Simulator,
}

impl Runner {
    pub fn new(simulator: Simulator) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    pub fn into_simulator(self) -> Simulator {
        self.simulator
    }

    /// Creates users until the population reaches the configured floor.
    pub async fn ensure_min_users(&mut self) -> Result<(), SimError> {
        let target = self.simulator.tuning().simulation.min_users;
        let missing = target.saturating_sub(self.simulator.state().users.len());
        if missing > 0 {
            info!(missing, "seeding users before simulation");
        }
        for _ in 0..missing {
            self.simulator.add_user().await?;
        }
        Ok(())
    }

    /// Runs `ticks` actions at the configured interval.
    ///
    /// A failed action is logged and counted as a skip rather than ending
    /// the run; one flaky generation should not kill a long session.
    pub async fn run(&mut self, ticks: u64) -> Result<RunSummary, SimError> {
        self.ensure_min_users().await?;

        let period = Duration::from_secs_f64(
            self.simulator
                .tuning()
                .simulation
                .tick_interval_secs
                .max(0.001),
        );
        let mut clock = interval(period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            clock.tick().await;
            summary.ticks += 1;

            match self.simulator.simulate_action().await {
                Ok(kind) => {
                    *summary.counts.entry(kind).or_insert(0) += 1;
                }
                Err(error) => {
                    warn!(%error, "action failed, skipping tick");
                    *summary.counts.entry(ActionKind::Skip).or_insert(0) += 1;
                }
            }
        }

        info!(
            ticks = summary.ticks,
            users = self.simulator.state().users.len(),
            posts = self.simulator.state().posts.len(),
            "run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use textgen::{Generator, TemplateGenerator};

    fn fast_runner(seed: u64) -> Runner {
        let mut tuning = Tuning::default();
        tuning.simulation.tick_interval_secs = 0.001;
        tuning.simulation.min_users = 3;
        let generator = Generator::with_provider(Box::new(TemplateGenerator::seeded(seed)));
        Runner::new(Simulator::new(tuning, generator, seed))
    }

    #[tokio::test]
    async fn test_ensure_min_users_tops_up() {
        let mut runner = fast_runner(1);
        runner.ensure_min_users().await.unwrap();
        assert_eq!(runner.simulator().state().users.len(), 3);

        // Already at the floor; nothing more is created.
        runner.ensure_min_users().await.unwrap();
        assert_eq!(runner.simulator().state().users.len(), 3);
    }

    #[tokio::test]
    async fn test_run_counts_every_tick() {
        let mut runner = fast_runner(2);
        let summary = runner.run(20).await.unwrap();

        assert_eq!(summary.ticks, 20);
        let total: u64 = summary.counts.values().sum();
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_run_produces_content() {
        let mut runner = fast_runner(3);
        runner.run(30).await.unwrap();

        let state = runner.simulator().state();
        assert!(state.users.len() >= 3);
        assert!(!state.posts.is_empty());
        assert!(!state.recent_actions.is_empty());
    }
}
