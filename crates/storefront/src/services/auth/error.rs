//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during sign-in, registration and profile refresh.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format, rejected before any request is sent.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] texpress_core::EmailError),

    /// Password too weak, rejected before any request is sent.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Nobody is signed in.
    #[error("not signed in")]
    NotAuthenticated,

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Whether the API rejected the credentials or the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}
