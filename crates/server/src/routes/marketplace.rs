//! Marketplace route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use backlink_vista_core::api::ListingQuery;
use backlink_vista_core::{Facets, Listing, ListingFilter, ListingId};

use crate::error::{AppError, Result};
use crate::middleware::{ApiQuery, RequireAuth};
use crate::state::AppState;

const WEBSITE_NOT_FOUND: &str = "Website not found";

/// Listings matching the query, in catalog order.
#[instrument(skip_all)]
pub async fn list_websites(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<Json<Vec<Listing>>> {
    if let (Some(min), Some(max)) = (query.min_dr, query.max_dr)
        && min > max
    {
        return Err(AppError::invalid_field(
            "Invalid query parameters",
            "minDR",
            "minDR must not exceed maxDR",
        ));
    }

    let filter = ListingFilter::from(query);
    let listings: Vec<Listing> = state
        .catalog()
        .search(&filter)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(count = listings.len(), "Listings filtered");

    Ok(Json(listings))
}

/// One listing by id.
#[instrument(skip_all)]
pub async fn get_website(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Listing>> {
    let id: ListingId = id
        .parse()
        .map_err(|_| AppError::NotFound(WEBSITE_NOT_FOUND.to_string()))?;

    state
        .catalog()
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(WEBSITE_NOT_FOUND.to_string()))
}

/// Distinct languages, countries and categories of the catalog.
#[instrument(skip_all)]
pub async fn facets(State(state): State<AppState>, RequireAuth(_user): RequireAuth) -> Json<Facets> {
    Json(state.catalog().facets().clone())
}
