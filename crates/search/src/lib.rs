//! Typo-tolerant listing search for HostelBazaar.
//!
//! This crate provides:
//! - Query interpretation (condition keywords, price phrases like "under 500")
//! - Dictionary and edit-distance typo correction
//! - Weighted title/description/tag relevance scoring
//! - A `tracing`-backed observer hook for search decisions
//! - WASM bindings for the web client (feature `wasm`)
//!
//! # Example
//!
//! ```
//! use hostelbazaar_search::{search, CatalogItem};
//!
//! let items = vec![
//!     CatalogItem::new("Redmi mobile 4GB").with_price(5000.0),
//!     CatalogItem::new("Study lamp").with_price(300.0),
//! ];
//!
//! let found = search(&items, "moble");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].title, "Redmi mobile 4GB");
//! ```

mod amount;
mod catalog;
pub mod config;
mod correction;
mod distance;
mod error;
mod matcher;
pub mod observer;
mod query;
mod relevance;

#[cfg(feature = "wasm")]
mod wasm;

use once_cell::sync::Lazy;

pub use amount::parse_amount;
pub use catalog::{CatalogItem, Condition, Listing};
pub use config::MatcherConfig;
pub use correction::{Correction, CorrectionRule};
pub use distance::{distance_within, levenshtein_distance};
pub use error::{Result, SearchError, SearchErrorCode};
pub use matcher::{FuzzyMatcher, SearchHit};
pub use observer::{SearchEvent, SearchObserver, SearchPath};
pub use query::{normalize, PriceParse, PriceQuery, QueryIntent};
pub use relevance::FieldScores;

/// Matcher with the built-in configuration, built on first use.
static DEFAULT_MATCHER: Lazy<FuzzyMatcher> = Lazy::new(FuzzyMatcher::with_defaults);

/// Shared matcher with the built-in configuration.
pub fn default_matcher() -> &'static FuzzyMatcher {
    &DEFAULT_MATCHER
}

/// Search `items` with the built-in configuration.
///
/// See [`FuzzyMatcher::search`].
pub fn search<'a, T: Listing + Sync>(items: &'a [T], query: &str) -> Vec<&'a T> {
    DEFAULT_MATCHER.search(items, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matcher_is_shared() {
        assert!(std::ptr::eq(default_matcher(), default_matcher()));
    }

    #[test]
    fn test_free_search_function() {
        let items = vec![
            CatalogItem::new("Hero cycle").with_condition(Condition::Good),
            CatalogItem::new("Calculator"),
        ];
        let found = search(&items, "calci");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Calculator");
    }

    #[test]
    fn test_matcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FuzzyMatcher>();
    }
}
