//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as the JSON
//! envelope `{"message": ..., "errors": {field: message}}`, where `errors` is
//! present only for validation failures that concern specific fields.
//! Server errors are captured to Sentry and never described to the client.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use backlink_vista_core::api::ErrorBody;

use crate::services::auth::AuthError;
use crate::store::RepositoryError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed validation.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, String>,
    },

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl AppError {
    /// A validation error about a single field.
    pub fn invalid_field(
        message: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            errors: BTreeMap::from([(field.into(), detail.into())]),
        }
    }

    /// Status code and client-facing envelope.
    fn parts(&self) -> (StatusCode, ErrorBody) {
        match self {
            Self::Validation { message, errors } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: message.clone(),
                    errors: errors.clone(),
                },
            ),
            Self::Repository(err) => repository_parts(err),
            Self::Auth(err) => auth_parts(err),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::new(message.clone())),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, ErrorBody::new("Unauthorized")),
        }
    }
}

fn internal() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new("Internal Server Error"),
    )
}

fn field_error(message: &str, field: &str, detail: String) -> (StatusCode, ErrorBody) {
    (
        StatusCode::BAD_REQUEST,
        ErrorBody {
            message: message.to_string(),
            errors: BTreeMap::from([(field.to_string(), detail)]),
        },
    )
}

fn repository_parts(err: &RepositoryError) -> (StatusCode, ErrorBody) {
    match err {
        RepositoryError::NotFound(_) => {
            (StatusCode::NOT_FOUND, ErrorBody::new("Resource not found"))
        }
        RepositoryError::Conflict(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("Resource already exists"),
        ),
        RepositoryError::InsufficientFunds { balance, required } => field_error(
            "Insufficient balance",
            "paymentMethod",
            format!("Balance of {balance} does not cover {required}"),
        ),
        RepositoryError::DataCorruption(_) | RepositoryError::Price(_) | RepositoryError::Io(_) => {
            internal()
        }
    }
}

fn auth_parts(err: &AuthError) -> (StatusCode, ErrorBody) {
    match err {
        AuthError::MissingFields(fields) => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                message: "Missing required fields".to_string(),
                errors: fields.clone(),
            },
        ),
        AuthError::InvalidEmail(e) => field_error("Invalid email address", "email", e.to_string()),
        AuthError::WeakPassword(msg) => field_error(msg, "password", msg.clone()),
        AuthError::UserAlreadyExists => field_error(
            "User already exists",
            "email",
            "An account with this email already exists".to_string(),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::new("Invalid credentials"),
        ),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, ErrorBody::new("Unauthorized")),
        AuthError::Repository(err) => repository_parts(err),
        AuthError::PasswordHash => internal(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_field("Invalid JSON", "body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_field("Invalid query parameters", "query", rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user
/// actions leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String(value.clone()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
