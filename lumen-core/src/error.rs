use lumen_llm::{GenerationError, ParseModeError};

/// Request-level failures. Every variant is terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Username already exists.")]
    DuplicateUser,
    #[error("Username must be at most {0} characters.")]
    UsernameTooLong(usize),
    #[error("Login Failed. Check your username and password.")]
    InvalidCredentials,
    #[error("Missing {0}")]
    MissingParameter(&'static str),
    #[error("Unknown node `{0}`")]
    UnknownNode(String),
    #[error(transparent)]
    UnknownMode(#[from] ParseModeError),
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
