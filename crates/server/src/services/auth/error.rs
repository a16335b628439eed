//! Authentication error types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::store::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required fields were absent or blank, keyed by field name.
    #[error("missing required fields")]
    MissingFields(BTreeMap<String, String>),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] backlink_vista_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token unknown, expired or revoked.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
