//! Marketplace listings and catalog filtering.
//!
//! A listing is a website that sells backlink placements. Its SEO metrics are
//! display strings as supplied by the data vendor ("5.3K", "4%"), except the
//! domain rating, which filters operate on.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ListingId, Price};

/// Highest possible domain rating.
pub const MAX_DOMAIN_RATING: u8 = 100;

/// SEO metrics of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMetrics {
    pub domain_rating: u8,
    pub referring_domains: String,
    pub total_backlinks: String,
    pub total_keywords: String,
    pub spam_score: String,
    pub language: String,
    pub link_validity: String,
    pub traffic_by_country: String,
}

/// A website available for backlink placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub url: String,
    pub metrics: ListingMetrics,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Predicate over listings.
///
/// Every unset field, and every empty list, places no constraint. Text
/// comparisons ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub min_dr: Option<u8>,
    pub max_dr: Option<u8>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Substring of the listing url.
    pub search: Option<String>,
}

impl ListingFilter {
    /// Whether the filter places no constraint at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `listing` passes every constraint.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let dr = listing.metrics.domain_rating;
        if self.min_dr.is_some_and(|min| dr < min) || self.max_dr.is_some_and(|max| dr > max) {
            return false;
        }

        let price = listing.price.amount;
        if self.min_price.is_some_and(|min| price < min)
            || self.max_price.is_some_and(|max| price > max)
        {
            return false;
        }

        if !one_of(&self.languages, &listing.metrics.language)
            || !one_of(&self.countries, &listing.metrics.traffic_by_country)
        {
            return false;
        }

        if !self.categories.is_empty() {
            let Some(category) = &listing.category else {
                return false;
            };
            if !one_of(&self.categories, category) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => listing
                .url
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            _ => true,
        }
    }

    /// Listings that pass the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

fn one_of(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}

/// Distinct values available to the filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
}

impl Facets {
    /// Collect sorted, de-duplicated facet values from a catalog.
    #[must_use]
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut languages = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for listing in listings {
            languages.insert(listing.metrics.language.clone());
            countries.insert(listing.metrics.traffic_by_country.clone());
            if let Some(category) = &listing.category {
                categories.insert(category.clone());
            }
        }

        Self {
            languages: languages.into_iter().collect(),
            countries: countries.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }
}

/// Split a comma-separated query value into trimmed, non-empty parts.
#[must_use]
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    fn ids(listings: &[&Listing]) -> Vec<i32> {
        listings.iter().map(|l| l.id.into_inner()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let catalog = catalog();
        let filter = ListingFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_min_dr_is_inclusive_lower_bound() {
        let catalog = catalog();
        let filter = ListingFilter {
            min_dr: Some(65),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![2, 3]);
    }

    #[test]
    fn test_language_and_country_match_exact_values() {
        let catalog = catalog();
        let filter = ListingFilter {
            languages: vec!["english".to_string()],
            countries: vec!["USA".to_string(), "India".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 2]);

        let partial = ListingFilter {
            countries: vec!["United".to_string()],
            ..Default::default()
        };
        assert!(partial.apply(&catalog).is_empty());
    }

    #[test]
    fn test_category_excludes_uncategorised() {
        let catalog = catalog();
        let filter = ListingFilter {
            categories: vec!["Health".to_string(), "Technology".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![2, 3]);
    }

    #[test]
    fn test_price_range() {
        let catalog = catalog();
        let filter = ListingFilter {
            min_price: Some(Decimal::from(75)),
            max_price: Some(Decimal::from(100)),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![2, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = catalog();
        let filter = ListingFilter {
            search: Some(" TECH ".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec![2]);
    }

    #[test]
    fn test_facets_are_sorted_and_distinct() {
        let facets = Facets::from_listings(&catalog());
        assert_eq!(facets.languages, vec!["English", "German"]);
        assert_eq!(
            facets.countries,
            vec!["Germany", "India", "USA", "United Kingdom"]
        );
        assert_eq!(facets.categories, vec!["Health", "Technology"]);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("English, German,,")), vec!["English", "German"]);
        assert!(split_list(None).is_empty());
    }
}
