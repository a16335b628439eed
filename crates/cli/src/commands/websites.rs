//! Marketplace browsing commands.

use clap::Args;
use rust_decimal::Decimal;

use backlink_vista_core::ListingId;
use backlink_vista_core::api::ListingQuery;

use crate::client::ApiClient;
use crate::commands::account::require_session;
use crate::error::CliError;
use crate::output;

/// Listing filters. List options take comma-separated values.
#[derive(Debug, Default, Args)]
pub struct ListingFilterArgs {
    /// Minimum domain rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_dr: Option<u8>,

    /// Maximum domain rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub max_dr: Option<u8>,

    /// Languages, e.g. `English,German`
    #[arg(long)]
    pub language: Option<String>,

    /// Countries of the main traffic source
    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub min_price: Option<Decimal>,

    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Substring of the website URL
    #[arg(long)]
    pub search: Option<String>,
}

impl From<ListingFilterArgs> for ListingQuery {
    fn from(args: ListingFilterArgs) -> Self {
        Self {
            min_dr: args.min_dr,
            max_dr: args.max_dr,
            language: args.language,
            country: args.country,
            category: args.category,
            min_price: args.min_price,
            max_price: args.max_price,
            search: args.search,
        }
    }
}

pub async fn list(client: &ApiClient, filters: ListingFilterArgs) -> Result<(), CliError> {
    require_session(client)?;

    let listings = client.websites(&filters.into()).await?;
    output::emit(&output::listings(&listings));
    Ok(())
}

pub async fn show(client: &ApiClient, id: ListingId) -> Result<(), CliError> {
    require_session(client)?;

    let listing = client.website(id).await?;
    output::emit(&output::listing(&listing));
    Ok(())
}

pub async fn facets(client: &ApiClient) -> Result<(), CliError> {
    require_session(client)?;

    let facets = client.facets().await?;
    output::emit(&output::facets(&facets));
    Ok(())
}
