use crate::{Error, Result};
use gridworld::{Action, CHANNELS, GRID_COLUMNS, GRID_ROWS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Length of a flattened observation.
pub const OBSERVATION_DIM: usize = CHANNELS * GRID_ROWS * GRID_COLUMNS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub z_dim: usize,

    /// Number of distinct tokens per message slot.
    pub m_tokens: usize,

    /// Number of slots per message.
    pub m_length: usize,

    pub beta_dim: usize,
    pub num_action: usize,

    /// Probability that the speaker transmits at any step after the first.
    pub message_prob: f64,

    /// Capacity of the speaker's ring buffer of full observations.
    pub speaker_buffer: usize,

    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            z_dim: 8,
            m_tokens: 2,
            m_length: 10,
            beta_dim: 10,
            num_action: Action::ALL.len(),
            message_prob: 0.5,
            speaker_buffer: 150,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn m_dim(&self) -> usize {
        self.m_tokens * self.m_length
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("z_dim", self.z_dim),
            ("m_tokens", self.m_tokens),
            ("m_length", self.m_length),
            ("beta_dim", self.beta_dim),
            ("speaker_buffer", self.speaker_buffer),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidConfig(format!("{name} must be positive")));
        }
        if self.num_action != Action::ALL.len() {
            return Err(Error::InvalidConfig(format!(
                "num_action must be {}, got {}",
                Action::ALL.len(),
                self.num_action
            )));
        }
        if !(0. ..=1.).contains(&self.message_prob) {
            return Err(Error::InvalidConfig(format!(
                "message_prob must be within [0, 1], got {}",
                self.message_prob
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub num_episode: usize,

    /// Step budget `T` of a single episode.
    pub max_steps: usize,

    /// Run a greedy test episode every this many episodes.
    pub test_interval: usize,

    /// Report success rates and checkpoint every this many episodes.
    pub log_interval: usize,

    pub gamma: f64,

    /// Weight of the critic term.
    pub lmd_v: f64,

    /// Weight of the entropy bonus.
    pub lmd_ent: f64,

    pub checkpoint_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episode: 200_000,
            max_steps: 36,
            test_interval: 100,
            log_interval: 5_000,
            gamma: 0.99,
            lmd_v: 0.1,
            lmd_ent: 0.02,
            checkpoint_dir: PathBuf::from("checkpoints"),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::InvalidConfig("max_steps must be positive".into()));
        }
        if self.test_interval == 0 || self.log_interval == 0 {
            return Err(Error::InvalidConfig("intervals must be positive".into()));
        }
        if self.log_interval % self.test_interval != 0 {
            return Err(Error::InvalidConfig(format!(
                "log_interval ({}) must be a multiple of test_interval ({})",
                self.log_interval, self.test_interval
            )));
        }
        if !(0. ..=1.).contains(&self.gamma) {
            return Err(Error::InvalidConfig(format!(
                "gamma must be within [0, 1], got {}",
                self.gamma
            )));
        }

        Ok(())
    }

    /// Number of greedy test episodes within one log interval.
    pub fn tests_per_log_interval(&self) -> usize {
        self.log_interval / self.test_interval
    }
}
