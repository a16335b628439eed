//! Bearer token authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use secrecy::SecretString;
use tracing::Span;

use backlink_vista_core::UserProfile;

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug)]
pub struct CurrentUser {
    pub profile: UserProfile,
    /// The bearer token the request presented.
    pub token: SecretString,
}

/// Extractor that requires a valid `Authorization: Bearer <token>` header.
///
/// Rejects with `401 {"message":"Unauthorized"}` when the header is absent,
/// malformed, or names an unknown, expired or revoked token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.profile.first_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let profile = state
            .auth()
            .authenticate(token)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        Span::current().record("user_id", tracing::field::display(profile.id));
        set_sentry_user(&profile.id, Some(profile.email.as_str()));

        Ok(Self(CurrentUser {
            profile,
            token: SecretString::from(token.to_owned()),
        }))
    }
}

/// The token of a well-formed `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
