use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("too many waypoints: {count} exceeds the limit of {max}")]
    TooManyWaypoints { count: usize, max: usize },

    #[error("optimization exceeded its time budget ({elapsed_ms} ms > {budget_ms} ms)")]
    TimeBudgetExceeded { elapsed_ms: u128, budget_ms: u128 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
