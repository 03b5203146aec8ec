/// Failure of a single content-generation round trip.
///
/// `Display` carries the provider's own error text; callers surface it as-is.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("content generation is not configured")]
    Disabled,
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("provider response contained no content")]
    EmptyResponse,
    #[error("{0}")]
    Provider(String),
}
