use solvr_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in, run `solvr auth login`")]
    NotAuthenticated,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("backend did not return a user id")]
    MissingUserId,

    #[error("{0}")]
    Validation(String),

    #[error("identity store error: {0}")]
    IdentityStore(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}
