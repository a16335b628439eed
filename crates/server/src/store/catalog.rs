//! Marketplace catalog.
//!
//! Loaded once at startup and read-only afterwards, so it needs no lock.

use std::collections::HashSet;
use std::path::Path;

use backlink_vista_core::catalog::MAX_DOMAIN_RATING;
use backlink_vista_core::{Facets, Listing, ListingFilter, ListingId};

use super::RepositoryError;

/// Listings shipped with the server.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// The set of listings offered for sale.
#[derive(Debug, Clone)]
pub struct Catalog {
    listings: Vec<Listing>,
    facets: Facets,
}

impl Catalog {
    /// Validate and index a list of listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` on duplicate ids, an
    /// out-of-range domain rating, or a negative price.
    pub fn from_listings(listings: Vec<Listing>) -> Result<Self, RepositoryError> {
        let mut seen = HashSet::new();
        for listing in &listings {
            if !seen.insert(listing.id) {
                return Err(RepositoryError::DataCorruption(format!(
                    "duplicate listing id {}",
                    listing.id
                )));
            }
            if listing.metrics.domain_rating > MAX_DOMAIN_RATING {
                return Err(RepositoryError::DataCorruption(format!(
                    "listing {} has domain rating {} above {MAX_DOMAIN_RATING}",
                    listing.id, listing.metrics.domain_rating
                )));
            }
            if listing.price.is_negative() {
                return Err(RepositoryError::DataCorruption(format!(
                    "listing {} has a negative price",
                    listing.id
                )));
            }
        }

        let facets = Facets::from_listings(&listings);
        Ok(Self { listings, facets })
    }

    /// Parse a JSON array of listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the JSON is malformed or
    /// the listings are invalid.
    pub fn from_json(json: &str) -> Result<Self, RepositoryError> {
        let listings: Vec<Listing> = serde_json::from_str(json)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid catalog JSON: {e}")))?;
        Self::from_listings(listings)
    }

    /// The built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the embedded data is invalid.
    pub fn builtin() -> Result<Self, RepositoryError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load the catalog from `path`, or the built-in one when `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read, or
    /// `RepositoryError::DataCorruption` if its contents are invalid.
    pub async fn load(path: Option<&Path>) -> Result<Self, RepositoryError> {
        match path {
            Some(path) => {
                let json = tokio::fs::read_to_string(path).await?;
                let catalog = Self::from_json(&json)?;
                tracing::info!(
                    path = %path.display(),
                    listings = catalog.listings.len(),
                    "Catalog loaded from file"
                );
                Ok(catalog)
            }
            None => Self::builtin(),
        }
    }

    /// Every listing, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    /// A listing by id.
    #[must_use]
    pub fn get(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings passing `filter`, in catalog order.
    #[must_use]
    pub fn search(&self, filter: &ListingFilter) -> Vec<&Listing> {
        filter.apply(&self.listings)
    }

    /// Distinct languages, countries and categories.
    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.all().len(), 15);
        let first = catalog.get(ListingId::new(1)).unwrap();
        assert_eq!(first.url, "example.com");
        assert_eq!(first.metrics.domain_rating, 50);
        assert!(catalog.get(ListingId::new(99)).is_none());
    }

    #[test]
    fn test_builtin_facets() {
        let catalog = Catalog::builtin().unwrap();
        let facets = catalog.facets();
        assert_eq!(facets.languages, vec!["English"]);
        assert!(facets.countries.contains(&"Japan".to_string()));
        assert!(facets.categories.contains(&"Real Estate".to_string()));
    }

    #[test]
    fn test_search_min_dr_and_country() {
        let catalog = Catalog::builtin().unwrap();
        let filter = ListingFilter {
            min_dr: Some(70),
            countries: vec!["USA".to_string()],
            ..Default::default()
        };
        let urls: Vec<&str> = catalog.search(&filter).iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["businessinsider.net"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = format!(
            "[{0},{0}]",
            serde_json::to_string(Catalog::builtin().unwrap().all().first().unwrap()).unwrap()
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Catalog::from_json("{not json").is_err());
    }
}
