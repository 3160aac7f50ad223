//! Error types for biaslens-core

/// Failure of one provider call.
///
/// The display strings are shown to the user verbatim in the turn's error
/// banner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid API key. Please check your Anthropic API key.")]
    InvalidCredentials,

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Invalid request. Please try a different question.")]
    BadRequest,

    #[error("API error: {0}")]
    Other(String),
}

/// Why a critique payload could not be turned into a critique.
///
/// Always recovered inside [`crate::critique::parse_critique`].
#[derive(Debug, thiserror::Error)]
pub enum CritiqueParseError {
    #[error("critique payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid structure: missing segments array")]
    MissingSegments,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Turn {turn_id} cannot move from {from} to {to}")]
    IllegalTransition {
        turn_id: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("Unknown turn: {0}")]
    UnknownTurn(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
