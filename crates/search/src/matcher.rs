//! The fuzzy listing matcher.

use crate::catalog::Listing;
use crate::config::MatcherConfig;
use crate::correction::{Correction, TermCorrector};
use crate::error::Result;
use crate::observer::{SearchEvent, SearchObserver, SearchPath, TracingObserver};
use crate::query::{normalize, PriceQuery, QueryIntent, QueryParser};
use crate::relevance::{FieldScorer, FieldScores};
use std::fmt;
use std::sync::Arc;

/// A listing selected by a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a, T> {
    /// Position in the input slice
    pub index: usize,
    /// The matched listing
    pub item: &'a T,
    /// Field scores; `None` when the listing was selected without ranking
    pub scores: Option<FieldScores>,
}

/// Typo-tolerant listing search.
///
/// Immutable after construction and safe to share between threads.
///
/// # Example
///
/// ```
/// use hostelbazaar_search::{CatalogItem, Condition, FuzzyMatcher};
///
/// let items = vec![
///     CatalogItem::new("iPhone 12 Used").with_price(300.0).with_condition(Condition::Used),
///     CatalogItem::new("Laptop Dell New").with_price(600.0).with_condition(Condition::New),
///     CatalogItem::new("Laptop HP Used").with_price(450.0).with_condition(Condition::Used),
/// ];
///
/// let matcher = FuzzyMatcher::with_defaults();
/// let found = matcher.search(&items, "used laptop under 500");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].title, "Laptop HP Used");
/// ```
pub struct FuzzyMatcher {
    config: MatcherConfig,
    corrector: TermCorrector,
    parser: QueryParser,
    observer: Arc<dyn SearchObserver>,
}

impl fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FuzzyMatcher {
    /// Validate `config` and build a matcher that logs through `tracing`.
    pub fn new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        let corrector = TermCorrector::new(&config);
        let parser = QueryParser::new(&config)?;

        Ok(Self {
            config,
            corrector,
            parser,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Matcher with the built-in dictionary and scoring constants.
    pub fn with_defaults() -> Self {
        Self::new(MatcherConfig::default()).expect("built-in matcher config is valid")
    }

    /// Replace the observer that receives search events.
    pub fn with_observer(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Correct a single word the way query words are corrected.
    pub fn correct(&self, word: &str) -> Correction {
        self.corrector.correct(&normalize(word))
    }

    /// Interpret a query without searching.
    pub fn interpret(&self, query: &str) -> QueryIntent {
        self.parser.interpret(query, &self.corrector)
    }

    /// Matching listings, most relevant first.
    ///
    /// A blank query returns every listing in input order. Price queries
    /// ("laptop under 500") return matches in input order.
    pub fn search<'a, T: Listing + Sync>(&self, items: &'a [T], query: &str) -> Vec<&'a T> {
        self.rank(items, query).into_iter().map(|hit| hit.item).collect()
    }

    /// Input positions of matching listings, in result order.
    pub fn search_indices<T: Listing + Sync>(&self, items: &[T], query: &str) -> Vec<usize> {
        self.rank(items, query).into_iter().map(|hit| hit.index).collect()
    }

    /// Matching listings with their scores, in result order.
    pub fn rank<'a, T: Listing + Sync>(&self, items: &'a [T], query: &str) -> Vec<SearchHit<'a, T>> {
        if query.trim().is_empty() {
            let hits = unscored(items.iter().enumerate());
            self.complete(SearchPath::Identity, items.len(), hits.len());
            return hits;
        }

        let intent = self.interpret(query);
        self.report_intent(query, &intent);

        if let Some(price) = &intent.price {
            let hits = unscored(
                items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| self.passes_price_filter(*item, &intent, price)),
            );
            self.complete(SearchPath::Price, items.len(), hits.len());
            return hits;
        }

        if intent.terms.is_empty() {
            // Only punctuation or symbols left and no condition: nothing to match
            if intent.condition.is_none() {
                self.complete(SearchPath::Ranked, items.len(), 0);
                return Vec::new();
            }

            let hits = unscored(
                items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| condition_matches(*item, &intent)),
            );
            self.complete(SearchPath::ConditionOnly, items.len(), hits.len());
            return hits;
        }

        let phrase = intent.phrase();
        let scorer = FieldScorer::new(&self.config, &phrase, &intent.terms);
        let mut scored = self.score_all(items, &intent, &scorer);

        // Stable: equal relevance keeps input order
        scored.sort_by(|a, b| b.1.relevance.total_cmp(&a.1.relevance));

        let hits: Vec<SearchHit<'a, T>> = scored
            .into_iter()
            .map(|(index, scores)| SearchHit {
                index,
                item: &items[index],
                scores: Some(scores),
            })
            .collect();

        self.complete(SearchPath::Ranked, items.len(), hits.len());
        hits
    }

    fn score_all<T: Listing + Sync>(
        &self,
        items: &[T],
        intent: &QueryIntent,
        scorer: &FieldScorer<'_>,
    ) -> Vec<(usize, FieldScores)> {
        let score_one = |(index, item): (usize, &T)| {
            if !condition_matches(item, intent) {
                return None;
            }
            let scores = scorer.score(item);
            self.observer.on_event(&SearchEvent::ItemScored { index, scores: &scores });
            (scores.relevance > self.config.min_relevance).then_some((index, scores))
        };

        #[cfg(feature = "parallel")]
        {
            if items.len() >= self.config.parallel_threshold {
                use rayon::prelude::*;
                return items.par_iter().enumerate().filter_map(score_one).collect();
            }
        }

        items.iter().enumerate().filter_map(score_one).collect()
    }

    fn passes_price_filter<T: Listing>(&self, item: &T, intent: &QueryIntent, price: &PriceQuery) -> bool {
        if !condition_matches(item, intent) || !price.admits(listing_price(item)) {
            return false;
        }

        let title = item.title().to_lowercase();
        let description = item.description().to_lowercase();
        intent
            .terms
            .iter()
            .all(|term| title.contains(term.as_str()) || description.contains(term.as_str()))
    }

    fn report_intent(&self, raw: &str, intent: &QueryIntent) {
        self.observer.on_event(&SearchEvent::QueryNormalized {
            raw,
            normalized: &intent.normalized,
        });

        if let Some(condition) = intent.condition {
            self.observer.on_event(&SearchEvent::ConditionDetected { condition });
        }

        for correction in intent.corrections.iter().filter(|c| c.changed()) {
            self.observer.on_event(&SearchEvent::TermCorrected { correction });
        }

        if let Some(price) = &intent.price {
            self.observer.on_event(&SearchEvent::PriceQuery {
                price,
                terms: &intent.terms,
            });
        }
    }

    fn complete(&self, path: SearchPath, total: usize, matched: usize) {
        self.observer.on_event(&SearchEvent::Completed { path, total, matched });
    }
}

fn unscored<'a, T: 'a>(items: impl Iterator<Item = (usize, &'a T)>) -> Vec<SearchHit<'a, T>> {
    items
        .map(|(index, item)| SearchHit { index, item, scores: None })
        .collect()
}

fn condition_matches<T: Listing + ?Sized>(item: &T, intent: &QueryIntent) -> bool {
    intent.condition.is_none_or(|wanted| item.condition() == Some(wanted))
}

fn listing_price<T: Listing + ?Sized>(item: &T) -> f64 {
    let price = item.price();
    if price.is_finite() { price } else { 0.0 }
}
