use reelscout_api::ApiError;
use thiserror::Error;

/// Default text when a search comes back empty without an upstream message.
pub const NO_RESULTS_MESSAGE: &str = "No movies found. Try another search.";

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a movie title.")]
    EmptyQuery,

    #[error("Enter at least {min} characters to search.")]
    QueryTooShort { min: usize },

    #[error("No title selected.")]
    MissingTitleId,

    #[error("API key not configured. Set OMDB_API_KEY or add it to your .env file.")]
    MissingCredential,
}

/// Why a search or detail cycle did not produce a result.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{}", .0.as_deref().unwrap_or(NO_RESULTS_MESSAGE))]
    NoResults(Option<String>),
}

impl From<ApiError> for LookupError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::MalformedPayload(msg) => Self::MalformedPayload(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}
