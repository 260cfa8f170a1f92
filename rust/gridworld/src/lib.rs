extern crate rand;
extern crate serde;

pub mod env;
pub mod error;
pub mod grid;
pub mod observation;
pub mod position;
pub mod sampling;
pub mod transitions;

pub use env::{EnvConfig, Environment, StepInfo, DEFAULT_REWARD};
pub use error::{Error, Result};
pub use grid::{Cell, Grid, GridVariant, GRID_COLUMNS, GRID_ROWS, REWARD_DRAWS};
pub use observation::{Observation, CHANNELS};
pub use position::{Action, Position};
pub use transitions::{Transition, TransitionDistribution, Transitions};

pub type Discrete = i32;
pub type Continous = f64;
