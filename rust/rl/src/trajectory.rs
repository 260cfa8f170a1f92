use crate::{Belief, Message, Transmission};
use gridworld::{Action, Continous, Observation};
use itertools::Itertools;
use std::iter::zip;

/// Everything the listener saw and did at one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub t: usize,
    pub partial: Observation,
    pub latent: Vec<f32>,
    pub transmission: Transmission,
    pub belief: Belief,
    pub action: Action,
    pub action_prob: f32,
    pub action_probs: Vec<f32>,
    pub value: f32,
    pub reward: Continous,
    pub done: bool,
}

/// Step records of a single episode, in time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    steps: Vec<StepRecord>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    pub fn rewards(&self) -> Vec<Continous> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    pub fn total_reward(&self) -> Continous {
        self.steps.iter().map(|s| s.reward).sum()
    }

    pub fn latents(&self) -> impl Iterator<Item = &[f32]> {
        self.steps.iter().map(|s| s.latent.as_slice())
    }

    pub fn beliefs(&self) -> impl Iterator<Item = &Belief> {
        self.steps.iter().map(|s| &s.belief)
    }

    pub fn partial_observations(&self) -> impl Iterator<Item = &Observation> {
        self.steps.iter().map(|s| &s.partial)
    }

    /// Received messages with the step they arrived at.
    pub fn messages(&self) -> impl Iterator<Item = (usize, &Message)> {
        self.steps
            .iter()
            .filter_map(|s| s.transmission.message().map(|m| (s.t, m)))
    }

    pub fn message_times(&self) -> Vec<usize> {
        self.messages().map(|(t, _)| t).collect_vec()
    }

    /// `R_t = r_t + gamma * R_{t+1}`, accumulated backwards from the last step.
    pub fn discounted_returns(&self, gamma: Continous) -> Vec<Continous> {
        let mut returns = vec![0.; self.steps.len()];
        let mut g = 0.;
        for t in (0..self.steps.len()).rev() {
            g = self.steps[t].reward + gamma * g;
            returns[t] = g;
        }
        returns
    }

    /// Return minus the value estimate at every step.
    pub fn advantages(&self, gamma: Continous) -> Vec<Continous> {
        zip(self.discounted_returns(gamma), &self.steps)
            .map(|(r, s)| r - s.value as Continous)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
