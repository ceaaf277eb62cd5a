use thiserror::Error as ThisError;

use crate::auth::Role;
use crate::validation::ValidationErrors;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// The backend rejected the bearer token. Stored credentials are cleared
    /// by the session before this reaches the caller.
    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("request failed with HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("local storage: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("requires role {required}, current role is {actual}")]
    Forbidden { required: Role, actual: Role },

    #[error("{completed} succeeded but the next step failed: {source}")]
    PartialFailure {
        completed: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("malformed access token")]
    InvalidToken,
}

impl Error {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    /// Wraps a failure that happened after `completed` was already saved.
    /// An expired session or a cancellation is returned as is, since the
    /// caller has to react to those and not to the half-written data.
    pub(crate) fn after(completed: &'static str, source: Error) -> Error {
        match source {
            Error::Unauthorized | Error::Cancelled => source,
            source => Error::PartialFailure {
                completed,
                source: Box::new(source),
            },
        }
    }
}
