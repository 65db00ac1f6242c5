use super::models::NoteId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a [crate::store::Store] operation can fail with.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The note text was empty after trimming.
    #[error("Note cannot be empty")]
    Validation,

    /// No live note carries this id.
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// The item service could not be reached, answered with a non-success
    /// status, or sent a body we could not decode.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Shown to the user whenever an action fails for a reason they cannot fix
/// by editing their input.
pub const FAILURE_NOTICE: &str = "Something went wrong, please try again";

#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log::error!("{:?}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_NOTICE).into_response()
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>`
// or `StoreResult<_>` to turn them into `Result<_, ServerError>`.
impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
