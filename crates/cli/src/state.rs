//! Client state persisted between invocations.
//!
//! The cart, the session token, the last fetched profile and the theme
//! preference live in one JSON file (`BV_STATE_FILE`, default
//! `~/.backlink-vista/state.json`).

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use backlink_vista_core::{Cart, UserProfile};

use crate::error::StateError;

const STATE_DIR: &str = ".backlink-vista";
const STATE_FILE: &str = "state.json";

/// Preferred colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

/// Everything `bv` remembers locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub theme: Theme,
}

impl ClientState {
    /// Read the state file. A missing file yields the empty state.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, StateError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No state file, starting fresh");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the state file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// The stored token as a secret.
    #[must_use]
    pub fn session_token(&self) -> Option<SecretString> {
        self.token.clone().map(SecretString::from)
    }

    /// Store a new session.
    pub fn sign_in(&mut self, token: String, profile: UserProfile) {
        self.token = Some(token);
        self.profile = Some(profile);
    }

    /// Forget the session. The cart and theme are kept.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.profile = None;
    }
}

/// Default state file location under the home directory.
#[must_use]
pub fn default_state_path() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(STATE_DIR)
        .join(STATE_FILE)
}
