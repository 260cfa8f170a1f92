use crate::modules::entropy;
use crate::trajectory::Trajectory;
use crate::{Result, TrainConfig};
use gridworld::Continous;
use serde::{Deserialize, Serialize};
use std::iter::zip;

/// Terms of the actor-critic objective for one trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerLoss {
    pub actor: Continous,
    pub critic: Continous,
    pub entropy: Continous,
    pub total: Continous,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LossReport {
    pub controller: ControllerLoss,
    pub messages_received: usize,
    pub steps: usize,
}

/// Consumes finished episodes. Implementations own the parameter update.
pub trait Learner {
    fn update(&mut self, trajectory: &Trajectory) -> Result<LossReport>;
}

/// Computes the loss terms without changing any parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LossMonitor {
    pub gamma: Continous,
    pub lmd_v: Continous,
    pub lmd_ent: Continous,
}

impl LossMonitor {
    pub fn new(gamma: Continous, lmd_v: Continous, lmd_ent: Continous) -> Self {
        Self { gamma, lmd_v, lmd_ent }
    }

    pub fn from_config(config: &TrainConfig) -> Self {
        Self::new(config.gamma, config.lmd_v, config.lmd_ent)
    }

    pub fn controller_loss(&self, trajectory: &Trajectory) -> ControllerLoss {
        if trajectory.is_empty() {
            return ControllerLoss::default();
        }

        let n = trajectory.len() as Continous;
        let returns = trajectory.discounted_returns(self.gamma);
        let advantages = trajectory.advantages(self.gamma);

        let actor = -zip(trajectory, &advantages)
            .map(|(s, adv)| (s.action_prob.max(1e-10) as Continous).ln() * adv)
            .sum::<Continous>()
            / n;
        let critic = zip(trajectory, &returns)
            .map(|(s, r)| smooth_l1(s.value as Continous - r))
            .sum::<Continous>()
            / n;
        let entropy = trajectory
            .iter()
            .map(|s| entropy(&s.action_probs) as Continous)
            .sum::<Continous>()
            / n;

        ControllerLoss {
            actor,
            critic,
            entropy,
            total: actor + self.lmd_v * critic - self.lmd_ent * entropy,
        }
    }
}

impl Learner for LossMonitor {
    fn update(&mut self, trajectory: &Trajectory) -> Result<LossReport> {
        Ok(LossReport {
            controller: self.controller_loss(trajectory),
            messages_received: trajectory.messages().count(),
            steps: trajectory.len(),
        })
    }
}

fn smooth_l1(x: Continous) -> Continous {
    if x.abs() < 1. {
        0.5 * x * x
    } else {
        x.abs() - 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::StepRecord;
    use crate::{Belief, Message, Transmission};
    use float_eq::*;
    use gridworld::{Action, GridVariant, Observation, Position};
    use rstest::rstest;

    fn step(t: usize, reward: Continous, value: f32, action_prob: f32) -> StepRecord {
        StepRecord {
            t,
            partial: Observation::render(&GridVariant::B.template(), Position::new(1, 7), true),
            latent: vec![0.; 2],
            transmission: if t == 0 {
                Transmission::Message(Message::new(vec![1], 2).unwrap())
            } else {
                Transmission::NoMessage
            },
            belief: Belief::new(vec![0.; 2]),
            action: Action::Up,
            action_prob,
            action_probs: vec![action_prob, 1. - action_prob],
            value,
            reward,
            done: false,
        }
    }

    #[rstest]
    #[case(0.5, 0.125)]
    #[case(-2., 1.5)]
    #[case(0., 0.)]
    fn smooth_l1_is_quadratic_then_linear(#[case] x: Continous, #[case] expected: Continous) {
        assert_float_eq!(smooth_l1(x), expected, abs <= 1e-12);
    }

    #[test]
    fn loss_terms_of_a_hand_computed_trajectory() {
        let mut tr = Trajectory::new();
        tr.push(step(0, 0., 0., 0.5));
        tr.push(step(1, 1., 0.5, 0.5));

        // returns [0.5, 1.0], advantages [0.5, 0.5] with gamma 0.5.
        let loss = LossMonitor::new(0.5, 0.1, 0.02).controller_loss(&tr);
        let ln_half = 0.5f64.ln();

        assert_float_eq!(loss.actor, -ln_half * 0.5, abs <= 1e-6);
        assert_float_eq!(loss.critic, 0.125, abs <= 1e-6);
        assert_float_eq!(loss.entropy, -ln_half, abs <= 1e-6);
        assert_float_eq!(
            loss.total,
            loss.actor + 0.1 * loss.critic - 0.02 * loss.entropy,
            abs <= 1e-12
        );
    }

    #[test]
    fn update_reports_messages_and_steps() {
        let mut tr = Trajectory::new();
        for t in 0..4 {
            tr.push(step(t, -0.04, 0., 0.25));
        }
        let report = LossMonitor::new(0.99, 0.1, 0.02).update(&tr).unwrap();
        assert_eq!(report.messages_received, 1);
        assert_eq!(report.steps, 4);
    }

    #[test]
    fn empty_trajectory_has_zero_loss() {
        let loss = LossMonitor::new(0.99, 0.1, 0.02).controller_loss(&Trajectory::new());
        assert_eq!(loss, ControllerLoss::default());
    }
}
