use crate::modules::Speaker;
use crate::{Error, Result, Transmission};
use gridworld::Observation;
use rand::prelude::*;

/// Decides at which steps the speaker talks. The first step of an episode
/// always carries a message.
#[derive(Debug)]
pub struct MessageChannel {
    message_prob: f64,
    rng: StdRng,
}

impl MessageChannel {
    pub fn new(message_prob: f64, seed: Option<u64>) -> Result<Self> {
        if !(0. ..=1.).contains(&message_prob) {
            return Err(Error::InvalidConfig(format!(
                "message_prob must be within [0, 1], got {message_prob}"
            )));
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { message_prob, rng })
    }

    pub fn message_prob(&self) -> f64 {
        self.message_prob
    }

    pub fn transmits(&mut self, t: usize) -> bool {
        t == 0 || self.rng.gen_bool(self.message_prob)
    }

    pub fn transmit(
        &mut self,
        t: usize,
        speaker: &mut dyn Speaker,
        full: &Observation,
    ) -> Result<Transmission> {
        if self.transmits(t) {
            Ok(Transmission::Message(speaker.speak(full)?))
        } else {
            Ok(Transmission::NoMessage)
        }
    }
}
