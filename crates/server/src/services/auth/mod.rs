//! Authentication service.
//!
//! Password registration and login with Argon2id hashes, and opaque bearer
//! tokens for subsequent requests.

mod error;
mod tokens;

pub use error::AuthError;
pub use tokens::TokenStore;

use std::collections::BTreeMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::SecretString;
use tracing::instrument;

use backlink_vista_core::api::{LoginRequest, RegisterRequest};
use backlink_vista_core::{Email, UserProfile};

use crate::store::{MemoryStore, NewUser, RepositoryError, UserRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (prevent DoS via very long passwords).
const MAX_PASSWORD_LENGTH: usize = 128;

/// A signed-in user and their freshly issued token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: SecretString,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a MemoryStore, tokens: &'a TokenStore) -> Self {
        Self {
            users: store.users(),
            tokens,
        }
    }

    /// Register a new user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is absent or blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, AuthError> {
        let fields = required_fields([
            ("email", request.email.as_deref()),
            ("password", request.password.as_deref()),
            ("firstName", request.first_name.as_deref()),
            ("lastName", request.last_name.as_deref()),
        ])?;
        let [email, password, first_name, last_name] = fields;

        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(
                NewUser {
                    email,
                    first_name: first_name.trim().to_string(),
                    last_name: last_name.trim().to_string(),
                    password_hash,
                },
                Utc::now(),
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        let token = self.tokens.issue(user.id).await;
        Ok(AuthSession { user, token })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if email or password is absent.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, AuthError> {
        let [email, password] = required_fields([
            ("email", request.email.as_deref()),
            ("password", request.password.as_deref()),
        ])?;

        // A malformed email cannot belong to any account.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .password_hash(&email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        let token = self.tokens.issue(user.id).await;
        Ok(AuthSession { user, token })
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown, expired or
    /// revoked, or its user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<UserProfile, AuthError> {
        let user_id = self
            .tokens
            .resolve(token)
            .await
            .ok_or(AuthError::InvalidToken)?;

        self.users
            .get_by_id(user_id)
            .await
            .ok_or(AuthError::InvalidToken)
    }

    /// Revoke a token (logout).
    pub async fn logout(&self, token: &SecretString) {
        self.tokens.revoke(token).await;
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Require every field to be present and non-blank.
fn required_fields<'r, const N: usize>(
    fields: [(&str, Option<&'r str>); N],
) -> Result<[&'r str; N], AuthError> {
    let mut missing = BTreeMap::new();
    let values = fields.map(|(name, value)| match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.insert(name.to_string(), format!("{name} is required"));
            ""
        }
    });

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(AuthError::MissingFields(missing))
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::ExposeSecret;

    use super::*;

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_password_too_long() {
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("validpassword123").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).is_ok());
        assert!(matches!(
            verify_password("wrong_password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_required_fields_reports_each_missing_field() {
        let err = required_fields([
            ("email", Some("a@b.c")),
            ("password", None),
            ("firstName", Some("   ")),
        ])
        .unwrap_err();

        let AuthError::MissingFields(missing) = err else {
            panic!("expected MissingFields");
        };
        assert_eq!(
            missing.keys().collect::<Vec<_>>(),
            vec!["firstName", "password"]
        );
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&store, &tokens);

        let registered = auth
            .register(&register_request("john@example.com", "password123"))
            .await
            .unwrap();
        let me = auth
            .authenticate(registered.token.expose_secret())
            .await
            .unwrap();
        assert_eq!(me.id, registered.user.id);

        let session = auth
            .login(&login_request("john@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(session.user.id, registered.user.id);
        assert_ne!(
            session.token.expose_secret(),
            registered.token.expose_secret()
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = MemoryStore::new();
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&store, &tokens);

        auth.register(&register_request("john@example.com", "password123"))
            .await
            .unwrap();
        let err = auth
            .register(&register_request("john@example.com", "another-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email() {
        let store = MemoryStore::new();
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&store, &tokens);
        auth.register(&register_request("john@example.com", "password123"))
            .await
            .unwrap();

        let wrong = auth
            .login(&login_request("john@example.com", "password124"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = auth
            .login(&login_request("jane@example.com", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let store = MemoryStore::new();
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&store, &tokens);
        let session = auth
            .register(&register_request("john@example.com", "password123"))
            .await
            .unwrap();

        auth.logout(&session.token).await;
        let err = auth
            .authenticate(session.token.expose_secret())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
