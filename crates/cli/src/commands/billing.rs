//! Wallet commands.

use rust_decimal::Decimal;

use crate::client::ApiClient;
use crate::commands::account::require_session;
use crate::error::CliError;
use crate::output;

pub async fn show(client: &ApiClient) -> Result<(), CliError> {
    require_session(client)?;

    let wallet = client.wallet().await?;
    output::emit(&output::wallet(&wallet));
    Ok(())
}

pub async fn offers(client: &ApiClient) -> Result<(), CliError> {
    require_session(client)?;

    let offers = client.offers().await?;
    output::emit(&output::offers(&offers));
    Ok(())
}

pub async fn add_funds(client: &ApiClient, amount: Decimal) -> Result<(), CliError> {
    require_session(client)?;

    let wallet = client.add_funds(amount).await?;
    output::emit(&format!("Added ${amount}. New balance: {}", wallet.balance));
    Ok(())
}
