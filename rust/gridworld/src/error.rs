use crate::{Continous, Discrete, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grid variant must be 'A' or 'B', got '{0}'")]
    UnknownGridVariant(String),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: Continous },

    #[error("unrecognized cell attribute: {0}")]
    UnknownCellAttribute(Discrete),

    #[error("action index must be one of 0..4, got {0}")]
    UnknownAction(usize),

    #[error("{0} is outside the grid")]
    OutOfBounds(Position),

    #[error("{0} is a block cell, the agent cannot be located there")]
    BlockedPosition(Position),

    #[error(transparent)]
    Sampling(#[from] rand::distributions::WeightedError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
