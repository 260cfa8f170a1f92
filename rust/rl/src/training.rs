use crate::agent::{ActionSelection, Agent};
use crate::checkpoint::{CheckpointStore, Qualifier};
use crate::episode::run_episode;
use crate::learner::Learner;
use crate::{Result, TrainConfig};
use chrono::{DateTime, Utc};
use gridworld::{Continous, Environment};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Rates over one log interval and where its checkpoints went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalReport {
    pub episode: usize,
    pub success_rate: Continous,
    pub test_success_rate: Continous,
    pub mean_loss: Continous,
    pub checkpoint: Qualifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub episodes: usize,
    pub intervals: Vec<IntervalReport>,
    pub best_test_success_rate: Continous,
}

pub struct Trainer<L: Learner> {
    config: TrainConfig,
    env: Environment,
    agent: Agent,
    learner: L,
    store: CheckpointStore,
}

impl<L: Learner> Trainer<L> {
    pub fn new(config: TrainConfig, env: Environment, agent: Agent, learner: L) -> Result<Self> {
        config.validate()?;
        let store = CheckpointStore::new(&config.checkpoint_dir);
        Ok(Self {
            config,
            env,
            agent,
            learner,
            store,
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Sampled episodes with a greedy test episode every `test_interval`.
    /// Every `log_interval` all modules are checkpointed, as `best` when the
    /// test success rate beats the previous interval's and as `last` otherwise.
    pub fn run(&mut self) -> Result<TrainingReport> {
        let started_at = Utc::now();
        let max_steps = self.config.max_steps;
        let mut intervals = Vec::new();
        let mut previous = 0.;
        let mut best: Continous = 0.;

        let (mut successes, mut test_successes) = (0usize, 0usize);
        let mut loss_sum = 0.;

        for episode in 1..=self.config.num_episode {
            let outcome = run_episode(&mut self.env, &mut self.agent, ActionSelection::Sample, max_steps)?;
            successes += outcome.success as usize;
            loss_sum += self.learner.update(&outcome.trajectory)?.controller.total;

            if episode % self.config.test_interval == 0 {
                let test = run_episode(&mut self.env, &mut self.agent, ActionSelection::Greedy, max_steps)?;
                test_successes += test.success as usize;
            }

            if episode % self.config.log_interval == 0 {
                let n = self.config.log_interval as Continous;
                let success_rate = successes as Continous / n;
                let test_success_rate = test_successes as Continous / self.config.tests_per_log_interval() as Continous;
                let mean_loss = loss_sum / n;

                let checkpoint = qualify(&mut previous, test_success_rate);
                best = best.max(test_success_rate);
                self.agent.save_checkpoints(&self.store, checkpoint)?;

                info!(
                    episode,
                    success_rate,
                    test_success_rate,
                    mean_loss,
                    %checkpoint,
                    "interval"
                );
                intervals.push(IntervalReport {
                    episode,
                    success_rate,
                    test_success_rate,
                    mean_loss,
                    checkpoint,
                });

                successes = 0;
                test_successes = 0;
                loss_sum = 0.;
            }
        }

        Ok(TrainingReport {
            started_at,
            finished_at: Utc::now(),
            episodes: self.config.num_episode,
            intervals,
            best_test_success_rate: best,
        })
    }
}

/// `Best` when `rate` beats the previous interval's rate, which `rate` then replaces.
fn qualify(previous: &mut Continous, rate: Continous) -> Qualifier {
    let qualifier = if rate > *previous {
        Qualifier::Best
    } else {
        Qualifier::Last
    };
    *previous = rate;
    qualifier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_recovering_rate_is_best_again() {
        let mut previous = 0.;
        let qualifiers = [0.5, 0., 0.25]
            .into_iter()
            .map(|rate| qualify(&mut previous, rate))
            .collect::<Vec<_>>();

        assert_eq!(qualifiers, vec![Qualifier::Best, Qualifier::Last, Qualifier::Best]);
        assert_eq!(previous, 0.25);
    }

    #[test]
    fn equal_rate_is_last() {
        let mut previous = 0.5;
        assert_eq!(qualify(&mut previous, 0.5), Qualifier::Last);
        let mut previous = 0.;
        assert_eq!(qualify(&mut previous, 0.), Qualifier::Last);
    }
}
