extern crate gridworld;
extern crate rand;

pub mod agent;
pub mod belief;
pub mod channel;
pub mod checkpoint;
pub mod config;
pub mod episode;
pub mod error;
pub mod learner;
pub mod message;
pub mod modules;
pub mod ring_buffer;
pub mod training;
pub mod trajectory;

pub use agent::{ActionSelection, Agent, Decision};
pub use belief::{Belief, BeliefState, BeliefTracker};
pub use channel::MessageChannel;
pub use checkpoint::{CheckpointStore, Qualifier};
pub use config::{AgentConfig, TrainConfig, OBSERVATION_DIM};
pub use episode::{run_episode, EpisodeOutcome};
pub use error::{Error, Result};
pub use learner::{ControllerLoss, Learner, LossMonitor, LossReport};
pub use message::{Message, Transmission};
pub use ring_buffer::RingBuffer;
pub use training::{IntervalReport, Trainer, TrainingReport};
pub use trajectory::{StepRecord, Trajectory};
