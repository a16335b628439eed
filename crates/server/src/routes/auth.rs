//! Authentication and profile route handlers.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::instrument;

use backlink_vista_core::UserProfile;
use backlink_vista_core::api::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{ApiJson, RequireAuth};
use crate::services::auth::AuthSession;
use crate::state::AppState;

fn auth_response(session: AuthSession) -> AuthResponse {
    AuthResponse {
        token: session.token.expose_secret().to_owned(),
        user: session.user,
    }
}

/// Create an account and sign it in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let session = state.auth().register(&request).await?;
    set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
    add_breadcrumb("auth", "Registered", &[("user_id", session.user.id.to_string())]);

    Ok((StatusCode::CREATED, Json(auth_response(session))))
}

/// Sign in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let session = state.auth().login(&request).await?;
    set_sentry_user(&session.user.id, Some(session.user.email.as_str()));

    Ok(Json(auth_response(session)))
}

/// Revoke the presented token.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> StatusCode {
    state.auth().logout(&user.token).await;
    tracing::info!(user_id = %user.profile.id, "User logged out");
    clear_sentry_user();

    StatusCode::NO_CONTENT
}

/// The current user's profile.
pub async fn profile(RequireAuth(user): RequireAuth) -> Json<UserProfile> {
    Json(user.profile)
}

/// Update the current user's profile. Absent and blank fields are kept.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(update): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .store()
        .users()
        .update_profile(user.profile.id, &update, Utc::now())
        .await?;

    Ok(Json(profile))
}
