//! Session and profile commands.
//!
//! # Usage
//!
//! ```bash
//! bv register -e ada@example.com -p 'correct horse' --first-name Ada --last-name Lovelace
//! bv login -e ada@example.com -p 'correct horse'
//! bv whoami
//! bv profile update --company "Analytical Engines"
//! bv logout
//! ```

use clap::Args;

use backlink_vista_core::api::{LoginRequest, RegisterRequest, UpdateProfileRequest};

use crate::client::ApiClient;
use crate::error::{ApiError, CliError};
use crate::output;
use crate::state::ClientState;

/// Fail early when no session token is stored.
pub fn require_session(client: &ApiClient) -> Result<(), CliError> {
    if client.has_token() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub email: String,

    /// Account password (at least 8 characters)
    #[arg(short, long, env = "BV_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long, env = "BV_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl From<ProfileUpdateArgs> for UpdateProfileRequest {
    fn from(args: ProfileUpdateArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            phone: args.phone,
            company: args.company,
            country: args.country,
            address: args.address,
        }
    }
}

pub async fn register(
    client: &ApiClient,
    state: &mut ClientState,
    args: RegisterArgs,
) -> Result<(), CliError> {
    let request = RegisterRequest {
        email: Some(args.email),
        password: Some(args.password),
        first_name: Some(args.first_name),
        last_name: Some(args.last_name),
    };

    let response = client.register(&request).await?;
    output::emit(&format!("Welcome, {}!", response.user.display_name()));
    state.sign_in(response.token, response.user);
    Ok(())
}

pub async fn login(
    client: &ApiClient,
    state: &mut ClientState,
    args: LoginArgs,
) -> Result<(), CliError> {
    let request = LoginRequest {
        email: Some(args.email),
        password: Some(args.password),
    };

    let response = client.login(&request).await?;
    output::emit(&format!("Logged in as {}", response.user.email));
    state.sign_in(response.token, response.user);
    Ok(())
}

/// Revoke the token on the server and forget it locally.
///
/// The local session is cleared even if the server already forgot the token.
pub async fn logout(client: &ApiClient, state: &mut ClientState) -> Result<(), CliError> {
    require_session(client)?;

    match client.logout().await {
        Ok(()) | Err(ApiError::Unauthorized(_)) => {}
        Err(e) => return Err(e.into()),
    }
    state.sign_out();
    output::emit("Logged out");
    Ok(())
}

/// Fetch and show the current profile.
pub async fn whoami(client: &ApiClient, state: &mut ClientState) -> Result<(), CliError> {
    require_session(client)?;

    let profile = client.profile().await?;
    output::emit(&output::profile(&profile));
    state.profile = Some(profile);
    Ok(())
}

pub async fn update_profile(
    client: &ApiClient,
    state: &mut ClientState,
    args: ProfileUpdateArgs,
) -> Result<(), CliError> {
    require_session(client)?;

    let profile = client.update_profile(&args.into()).await?;
    output::emit(&output::profile(&profile));
    state.profile = Some(profile);
    Ok(())
}
