//! Error types for the `bv` client.

use std::collections::BTreeMap;

use thiserror::Error;

use backlink_vista_core::CartError;

/// Errors returned by the REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The token is missing, expired or revoked, or the credentials are wrong.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server refused the request rate.
    #[error("rate limited, try again shortly")]
    RateLimited,

    /// The resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Any other error envelope returned by the server.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Top-level message.
        message: String,
        /// Per-field details.
        errors: BTreeMap<String, String>,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors reading or writing the local state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of a `bv` command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Cart(#[from] CartError),

    /// A command that needs a session was run without one.
    #[error("not logged in; run `bv login` first")]
    NotLoggedIn,

    #[error("your cart is empty")]
    EmptyCart,

    #[error("no cart item with id {0}")]
    UnknownCartItem(String),
}

impl CliError {
    /// Whether the server rejected the stored token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized(_)))
    }

    /// Per-field details of a validation error, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Api(ApiError::Api { errors, .. }) if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }
}
