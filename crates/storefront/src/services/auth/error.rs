//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] larkspur_core::EmailError),

    /// Invalid credentials (empty or rejected password).
    #[error("invalid credentials")]
    InvalidCredentials,
}
