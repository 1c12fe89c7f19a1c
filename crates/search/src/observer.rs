//! Hooks for tracing search decisions.
//!
//! The matcher reports what it understood and decided through a
//! [`SearchObserver`]. Observers see events only; they cannot change results.

use crate::catalog::Condition;
use crate::correction::Correction;
use crate::query::PriceQuery;
use crate::relevance::FieldScores;
use serde::Serialize;

/// Route a query took through the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
    /// Blank query, items returned unchanged
    Identity,
    /// Comparator phrase present, boolean price/text filter
    Price,
    /// Only a condition keyword, condition filter in input order
    ConditionOnly,
    /// Relevance-scored and sorted
    Ranked,
}

/// Something the matcher decided while handling a query.
#[derive(Debug, Clone, Copy)]
pub enum SearchEvent<'e> {
    /// Query after lower-casing and whitespace cleanup
    QueryNormalized { raw: &'e str, normalized: &'e str },
    /// A condition keyword became a filter
    ConditionDetected { condition: Condition },
    /// A word was rewritten by typo correction
    TermCorrected { correction: &'e Correction },
    /// The query was routed to the price path
    PriceQuery { price: &'e PriceQuery, terms: &'e [String] },
    /// One listing was scored (ranked path only)
    ItemScored { index: usize, scores: &'e FieldScores },
    /// The search finished
    Completed { path: SearchPath, total: usize, matched: usize },
}

/// Receives [`SearchEvent`]s. Must be cheap: it runs inside the search.
pub trait SearchObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &SearchEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&self, _event: &SearchEvent<'_>) {}
}

/// Emits events through `tracing` under the `hostelbazaar_search` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_event(&self, event: &SearchEvent<'_>) {
        match *event {
            SearchEvent::QueryNormalized { raw, normalized } => {
                tracing::debug!(target: "hostelbazaar_search", raw, normalized, "Query normalized");
            }
            SearchEvent::ConditionDetected { condition } => {
                tracing::debug!(target: "hostelbazaar_search", %condition, "Condition filter detected");
            }
            SearchEvent::TermCorrected { correction } => {
                tracing::debug!(
                    target: "hostelbazaar_search",
                    from = %correction.original,
                    to = %correction.term,
                    rule = ?correction.rule,
                    "Term corrected"
                );
            }
            SearchEvent::PriceQuery { price, terms } => {
                tracing::debug!(
                    target: "hostelbazaar_search",
                    min_price = ?price.min_price,
                    max_price = ?price.max_price,
                    parse = ?price.parse,
                    terms = ?terms,
                    "Price query"
                );
            }
            SearchEvent::ItemScored { index, scores } => {
                tracing::trace!(
                    target: "hostelbazaar_search",
                    index,
                    title = scores.title,
                    description = scores.description,
                    tags = scores.tags,
                    relevance = scores.relevance,
                    "Item scored"
                );
            }
            SearchEvent::Completed { path, total, matched } => {
                tracing::debug!(target: "hostelbazaar_search", ?path, total, matched, "Search completed");
            }
        }
    }
}
