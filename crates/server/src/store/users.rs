//! User repository.
//!
//! Emails are unique as typed, after trimming. Password hashes never leave
//! this module except through [`UserRepository::password_hash`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use backlink_vista_core::api::UpdateProfileRequest;
use backlink_vista_core::{Email, UserId, UserProfile};

use super::RepositoryError;

/// Data needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone)]
struct StoredUser {
    profile: UserProfile,
    password_hash: String,
}

/// Users by id, with an exact-match email index.
#[derive(Debug, Default)]
pub(crate) struct UserTable {
    by_id: HashMap<UserId, StoredUser>,
    by_email: HashMap<String, UserId>,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    table: &'a RwLock<UserTable>,
}

impl<'a> UserRepository<'a> {
    pub(crate) const fn new(table: &'a RwLock<UserTable>) -> Self {
        Self { table }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        user: NewUser,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, RepositoryError> {
        let key = user.email.as_str().to_owned();
        let mut table = self.table.write().await;
        if table.by_email.contains_key(&key) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let profile = UserProfile {
            id: UserId::generate(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: None,
            company: None,
            country: None,
            address: None,
            created_at: now,
            updated_at: now,
        };

        table.by_email.insert(key, profile.id);
        table.by_id.insert(
            profile.id,
            StoredUser {
                profile: profile.clone(),
                password_hash: user.password_hash,
            },
        );

        Ok(profile)
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<UserProfile> {
        let table = self.table.read().await;
        table.by_id.get(&id).map(|u| u.profile.clone())
    }

    /// Get a user together with their password hash, for login.
    pub async fn password_hash(&self, email: &Email) -> Option<(UserProfile, String)> {
        let table = self.table.read().await;
        table
            .by_email
            .get(email.as_str())
            .and_then(|id| table.by_id.get(id))
            .map(|u| (u.profile.clone(), u.password_hash.clone()))
    }

    /// Apply a profile update. Absent and blank fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        update: &UpdateProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, RepositoryError> {
        let mut table = self.table.write().await;
        let user = table
            .by_id
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;
        let profile = &mut user.profile;

        if let Some(value) = non_blank(update.first_name.as_deref()) {
            profile.first_name = value;
        }
        if let Some(value) = non_blank(update.last_name.as_deref()) {
            profile.last_name = value;
        }
        for (field, value) in [
            (&mut profile.phone, &update.phone),
            (&mut profile.company, &update.company),
            (&mut profile.country, &update.country),
            (&mut profile.address, &update.address),
        ] {
            if let Some(value) = non_blank(value.as_deref()) {
                *field = Some(value);
            }
        }
        profile.updated_at = now;

        Ok(profile.clone())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
