//! Per-field relevance scoring.
//!
//! Each field (title, description, joined tags) scores in `[0, 1]`:
//!
//! - `1.0` when the field contains the whole corrected query
//! - otherwise the mean over query words of `1.0` for a word the field
//!   contains, else `partial_weight` times the best partial match
//!
//! Field scores are then weighted and the best weighted field wins.

use crate::catalog::Listing;
use crate::config::MatcherConfig;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Weighted field scores for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldScores {
    /// Title score times `title_weight`
    pub title: f64,
    /// Description score times `description_weight`
    pub description: f64,
    /// Tag score times `tag_weight`
    pub tags: f64,
    /// Best of the three
    pub relevance: f64,
}

/// Scores listings against one query.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldScorer<'a> {
    config: &'a MatcherConfig,
    phrase: &'a str,
    terms: &'a [String],
}

impl<'a> FieldScorer<'a> {
    /// `phrase` is `terms` joined by single spaces.
    pub(crate) fn new(config: &'a MatcherConfig, phrase: &'a str, terms: &'a [String]) -> Self {
        Self { config, phrase, terms }
    }

    pub(crate) fn score<L: Listing + ?Sized>(&self, item: &L) -> FieldScores {
        let title = self.score_field(&item.title().to_lowercase()) * self.config.title_weight;
        let description =
            self.score_field(&item.description().to_lowercase()) * self.config.description_weight;
        let tags = self.score_field(&item.tags().join(" ").to_lowercase()) * self.config.tag_weight;

        FieldScores {
            title,
            description,
            tags,
            relevance: title.max(description).max(tags),
        }
    }

    /// Unweighted score of a lower-cased field.
    pub(crate) fn score_field(&self, field: &str) -> f64 {
        if self.terms.is_empty() || field.is_empty() {
            return 0.0;
        }

        if field.contains(self.phrase) {
            return 1.0;
        }

        let field_words: Vec<&str> = field.unicode_words().collect();
        let total: f64 = self
            .terms
            .iter()
            .map(|term| {
                if field.contains(term.as_str()) {
                    1.0
                } else {
                    self.config.partial_weight * self.partial_match(term, &field_words)
                }
            })
            .sum();

        total / self.terms.len() as f64
    }

    /// Best partial score of `term` against any field word.
    fn partial_match(&self, term: &str, field_words: &[&str]) -> f64 {
        if term.chars().count() < self.config.min_partial_word_len {
            return 0.0;
        }

        let prefix_len = self.config.prefix_len;
        let term_prefix: String = term.chars().take(prefix_len).collect();

        field_words
            .iter()
            .filter(|word| word.chars().count() >= self.config.min_field_word_len)
            .map(|word| {
                let word_prefix: String = word.chars().take(prefix_len).collect();
                if word_prefix == term_prefix {
                    self.config.prefix_match_score
                } else if term.contains(word) {
                    self.config.containment_score
                } else {
                    0.0
                }
            })
            .fold(0.0, f64::max)
    }
}
