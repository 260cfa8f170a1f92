use crate::modules::BeliefNetwork;
use crate::{Error, Result, Transmission};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The listener's belief vector `beta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief(Vec<f32>);

impl Belief {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for Belief {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeliefState {
    AwaitingFirstMessage,
    BeliefEstablished(Belief),
}

/// Per-episode belief. Starts out waiting for the message that every episode
/// opens with, then keeps the last inferred belief until a new message arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefTracker {
    state: BeliefState,
}

impl Default for BeliefTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BeliefTracker {
    pub fn new() -> Self {
        Self {
            state: BeliefState::AwaitingFirstMessage,
        }
    }

    pub fn state(&self) -> &BeliefState {
        &self.state
    }

    pub fn belief(&self) -> Option<&Belief> {
        match &self.state {
            BeliefState::AwaitingFirstMessage => None,
            BeliefState::BeliefEstablished(beta) => Some(beta),
        }
    }

    pub fn update(
        &mut self,
        t: usize,
        z: &[f32],
        transmission: &Transmission,
        network: &dyn BeliefNetwork,
    ) -> Result<&Belief> {
        match transmission {
            Transmission::Message(m) => {
                let beta = network.infer(z, m)?;
                trace!(t, tokens = ?m.tokens(), "belief updated");
                self.state = BeliefState::BeliefEstablished(beta);
            }
            Transmission::NoMessage => {
                if t == 0 || self.state == BeliefState::AwaitingFirstMessage {
                    return Err(Error::MissingFirstMessage { t });
                }
            }
        }

        self.belief().ok_or(Error::MissingFirstMessage { t })
    }
}
