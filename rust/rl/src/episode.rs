use crate::agent::{ActionSelection, Agent};
use crate::belief::BeliefTracker;
use crate::trajectory::{StepRecord, Trajectory};
use crate::{Error, Result};
use gridworld::{Continous, Environment};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub trajectory: Trajectory,
    pub steps: usize,
    /// The environment terminated the episode before the step budget ran out.
    pub success: bool,
    pub truncated: bool,
    pub total_reward: Continous,
}

/// Plays one episode of at most `max_steps` steps from a fresh reset.
///
/// The belief tracker and trajectory live only for the episode. The last step
/// of a truncated episode is recorded as done.
pub fn run_episode(
    env: &mut Environment,
    agent: &mut Agent,
    selection: ActionSelection,
    max_steps: usize,
) -> Result<EpisodeOutcome> {
    if max_steps == 0 {
        return Err(Error::InvalidConfig("max_steps must be positive".into()));
    }

    let (_, start) = env.reset();
    debug!(%start, reward = %env.reward_position(), ?selection, "episode start");

    let mut tracker = BeliefTracker::new();
    let mut trajectory = Trajectory::new();
    let mut success = false;

    for t in 0..max_steps {
        let decision = agent.decide(t, env, &mut tracker, selection)?;
        let info = env.step(decision.action)?;
        let out_of_steps = t == max_steps - 1;

        trajectory.push(StepRecord {
            t,
            partial: decision.partial,
            latent: decision.latent,
            transmission: decision.transmission,
            belief: decision.belief,
            action: decision.action,
            action_prob: decision.action_prob,
            action_probs: decision.policy.action_probs,
            value: decision.policy.value,
            reward: info.reward,
            done: info.done || out_of_steps,
        });

        if info.done {
            success = true;
            break;
        }
        if out_of_steps {
            debug!(t, agent = %env.agent(), "step budget exhausted, forcing termination");
        }
    }

    let total_reward = trajectory.total_reward();
    debug!(steps = trajectory.len(), success, total_reward, "episode end");

    Ok(EpisodeOutcome {
        steps: trajectory.len(),
        success,
        truncated: !success,
        total_reward,
        trajectory,
    })
}
