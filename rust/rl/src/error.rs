use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Env(#[from] gridworld::Error),

    /// Every episode's belief has to start from a message-conditioned state.
    #[error("first message must be received at t=0, no belief at t={t}")]
    MissingFirstMessage { t: usize },

    #[error("{module} expects an input of length {expected}, got {actual}")]
    DimensionMismatch {
        module: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("token {token} is out of range for {m_tokens} tokens")]
    InvalidToken { token: usize, m_tokens: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("checkpoint holds module '{found}', expected '{expected}'")]
    ModuleMismatch { expected: String, found: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sampling(#[from] rand::distributions::WeightedError),
}

pub type Result<T> = std::result::Result<T, Error>;
