//! Seams for the learned parts of the agent.
//!
//! The listener is a world model: an observation encoder (V), a latent belief
//! network (M) and a controller (C). The speaker turns the full observation into a
//! message. Only the interfaces matter to the decision loop; the `Linear*` types
//! are fixed, seeded projections that make the loop runnable without a training
//! framework.

mod controller;
mod encoder;
mod lbn;
mod linear;
mod speaker;

pub use controller::LinearController;
pub use encoder::LinearEncoder;
pub use lbn::LinearBelief;
pub use linear::Linear;
pub use speaker::LinearSpeaker;

use crate::{Belief, Message, Result};
use gridworld::Observation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Checkpointable parameters of a module.
pub trait Module {
    /// Name the checkpoint files are keyed by.
    fn name(&self) -> &'static str;

    fn state_dict(&self) -> Result<Value>;

    fn load_state_dict(&mut self, state: Value) -> Result<()>;
}

/// Compresses the listener's partial observation into a latent `z`.
pub trait ObservationEncoder: Module {
    fn z_dim(&self) -> usize;

    fn encode(&self, obs: &Observation) -> Result<Vec<f32>>;
}

pub trait Speaker: Module {
    /// Encodes the full observation into a message.
    fn speak(&mut self, obs: &Observation) -> Result<Message>;
}

/// Forms a belief from the current latent and a received message.
pub trait BeliefNetwork: Module {
    fn beta_dim(&self) -> usize;

    fn infer(&self, z: &[f32], message: &Message) -> Result<Belief>;
}

pub trait Controller: Module {
    fn evaluate(&self, z: &[f32], belief: &Belief) -> Result<PolicyOutput>;
}

/// Action distribution and state-value estimate for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutput {
    pub action_probs: Vec<f32>,
    pub value: f32,
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|&l| (l - max).exp()).collect::<Vec<_>>();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum.
pub fn argmax(xs: &[f32]) -> usize {
    xs.iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        })
        .0
}

/// Entropy in nats, with probabilities clamped away from zero.
pub fn entropy(probs: &[f32]) -> f32 {
    -probs.iter().map(|&p| p * p.max(1e-10).ln()).sum::<f32>()
}

fn from_state<T: DeserializeOwned>(state: Value) -> Result<T> {
    Ok(serde_json::from_value(state)?)
}
