use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Empty query")]
    EmptyQuery,

    #[error("Unknown field prefix: {0:?}")]
    UnknownPrefix(String),

    #[error("Term not in vocabulary: {0}")]
    OutOfVocabulary(String),

    #[error("Word-vector model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// True for errors caused by the request itself rather than by a collaborator.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::EmptyQuery | Error::UnknownPrefix(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
