//! Query interpretation: normalization, condition keywords and price intent.

use crate::amount::{is_currency_marker, parse_amount};
use crate::catalog::Condition;
use crate::config::MatcherConfig;
use crate::correction::{Correction, TermCorrector};
use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Amount as written in a query: optional currency, digits, optional `k`
/// and an optional trailing currency word.
const AMOUNT_PATTERN: &str =
    r"(?:₹|\$|rs\.?|inr)?\s*\d[\d,]*(?:\.\d+)?\s*k?(?:\s*(?:/-|rupees|rs|inr))?";

/// Which parsing stage understood a price query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceParse {
    /// `<product> <comparator> <amount>`
    Pattern,
    /// Comparator located by token position
    Tokens,
    /// Comparators stripped, no usable amount
    Stripped,
}

/// Price constraints read from a query. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuery {
    /// Lowest acceptable price
    pub min_price: Option<f64>,
    /// Highest acceptable price
    pub max_price: Option<f64>,
    /// Stage that produced the outermost bound
    pub parse: PriceParse,
}

impl PriceQuery {
    /// True if `price` satisfies both bounds.
    pub fn admits(&self, price: f64) -> bool {
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }

    /// True if neither bound could be read.
    pub fn is_unbounded(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none()
    }
}

/// Everything the matcher understood from a query string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryIntent {
    /// Lower-cased, trimmed, whitespace-collapsed query
    pub normalized: String,
    /// Condition filter from a condition keyword
    pub condition: Option<Condition>,
    /// Corrected words to match (product words for price queries)
    pub terms: Vec<String>,
    /// Per-word corrections, in query order
    pub corrections: Vec<Correction>,
    /// Set when a comparator phrase routed the query to the price path
    pub price: Option<PriceQuery>,
}

impl QueryIntent {
    /// Corrected terms joined the way field matching expects.
    pub fn phrase(&self) -> String {
        self.terms.join(" ")
    }

    /// Lower price bound, if any.
    pub fn min_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(|p| p.min_price)
    }

    /// Upper price bound, if any.
    pub fn max_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(|p| p.max_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    AtMost,
    AtLeast,
}

#[derive(Debug, Clone)]
struct ConditionPattern {
    pattern: Regex,
    condition: Condition,
}

#[derive(Debug, Clone)]
struct Comparator {
    tokens: Vec<String>,
    bound: Bound,
}

/// Compiled keyword patterns for one configuration.
#[derive(Debug, Clone)]
pub(crate) struct QueryParser {
    /// Longest keyword first
    conditions: Vec<ConditionPattern>,
    /// Longest phrase first
    comparators: Vec<Comparator>,
    comparator_any: Regex,
    price_pattern: Regex,
}

/// Lower-case, trim and collapse whitespace.
pub fn normalize(query: &str) -> String {
    query.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into words on Unicode word boundaries.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_string).collect()
}

/// Regex source matching `phrase` as whole words with flexible spacing.
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Alternatives as whole words; punctuation counts as a boundary.
fn word_bounded(alternatives: &str) -> String {
    format!(r"\b(?:{alternatives})\b")
}

/// Token with surrounding punctuation removed ("(under" -> "under").
fn trim_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

impl QueryParser {
    pub(crate) fn new(config: &MatcherConfig) -> Result<Self> {
        let mut keywords: Vec<_> = config
            .conditions
            .iter()
            .map(|c| (normalize(&c.keyword), c.condition))
            .collect();
        keywords.sort_by_key(|(k, _)| std::cmp::Reverse(k.chars().count()));

        let conditions = keywords
            .iter()
            .map(|(keyword, condition)| {
                Ok(ConditionPattern {
                    pattern: Regex::new(&word_bounded(&phrase_pattern(keyword)))?,
                    condition: *condition,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut comparators: Vec<Comparator> = config
            .price
            .upper_bound
            .iter()
            .map(|p| (p, Bound::AtMost))
            .chain(config.price.lower_bound.iter().map(|p| (p, Bound::AtLeast)))
            .map(|(phrase, bound)| Comparator {
                tokens: normalize(phrase).split(' ').map(str::to_string).collect(),
                bound,
            })
            .collect();
        comparators.sort_by_key(|c| std::cmp::Reverse(c.tokens.join(" ").chars().count()));

        let alternatives = comparators
            .iter()
            .map(|c| phrase_pattern(&c.tokens.join(" ")))
            .collect::<Vec<_>>()
            .join("|");

        let comparator_any = Regex::new(&word_bounded(&alternatives))?;
        let price_pattern = Regex::new(&format!(
            r"^(?P<product>.+?)\s+(?P<op>{alternatives})\s+(?P<amount>{AMOUNT_PATTERN})$"
        ))?;

        Ok(Self {
            conditions,
            comparators,
            comparator_any,
            price_pattern,
        })
    }

    /// Interpret a raw query. Never fails; unparseable price text degrades
    /// to a text-only filter.
    pub(crate) fn interpret(&self, query: &str, corrector: &TermCorrector) -> QueryIntent {
        let normalized = normalize(query);
        let (condition, remaining) = self.extract_condition(&normalized);

        let (words, price) = if self.has_price_intent(&remaining) {
            let (product, price) = self.parse_price(&remaining);
            (tokenize(&product), Some(price))
        } else {
            (tokenize(&remaining), None)
        };

        let corrections: Vec<Correction> = words.iter().map(|w| corrector.correct(w)).collect();
        let terms = corrections.iter().map(|c| c.term.clone()).collect();

        QueryIntent {
            normalized,
            condition,
            terms,
            corrections,
            price,
        }
    }

    /// Leftmost condition keyword (longest wins on ties), with every
    /// occurrence of that keyword removed from the text.
    fn extract_condition(&self, text: &str) -> (Option<Condition>, String) {
        let found = self
            .conditions
            .iter()
            .filter_map(|c| c.pattern.find(text).map(|m| (m.start(), c)))
            .min_by_key(|(start, _)| *start);

        match found {
            Some((_, keyword)) => {
                let stripped = strip_all(&keyword.pattern, text);
                (Some(keyword.condition), stripped)
            }
            None => (None, text.to_string()),
        }
    }

    fn has_price_intent(&self, text: &str) -> bool {
        self.comparator_any.is_match(text)
    }

    /// Product text and bounds of a price query.
    ///
    /// A product that still holds a comparator ("above 200 under 500") is
    /// parsed again so both bounds are kept.
    fn parse_price(&self, text: &str) -> (String, PriceQuery) {
        let (product, bound, parse) = self
            .parse_with_pattern(text)
            .or_else(|| self.parse_with_tokens(text))
            .unwrap_or_else(|| (self.strip_comparators(text), None, PriceParse::Stripped));

        let mut query = PriceQuery {
            min_price: None,
            max_price: None,
            parse,
        };
        if let Some((kind, amount)) = bound {
            match kind {
                Bound::AtMost => query.max_price = Some(amount),
                Bound::AtLeast => query.min_price = Some(amount),
            }
        }

        if parse != PriceParse::Stripped && self.has_price_intent(&product) {
            let (inner_product, inner) = self.parse_price(&product);
            query.min_price = query.min_price.or(inner.min_price);
            query.max_price = query.max_price.or(inner.max_price);
            return (inner_product, query);
        }

        (product, query)
    }

    fn parse_with_pattern(&self, text: &str) -> Option<(String, Option<(Bound, f64)>, PriceParse)> {
        let caps = self.price_pattern.captures(text)?;
        let product = caps.name("product")?.as_str().trim();
        let op = normalize(caps.name("op")?.as_str());
        let amount = parse_amount(caps.name("amount")?.as_str())?;
        let bound = self.comparators.iter().find(|c| c.tokens.join(" ") == op)?.bound;

        Some((product.to_string(), Some((bound, amount)), PriceParse::Pattern))
    }

    fn parse_with_tokens(&self, text: &str) -> Option<(String, Option<(Bound, f64)>, PriceParse)> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(trim_punctuation)
            .filter(|t| !t.is_empty())
            .collect();

        let (position, comparator) = (0..tokens.len()).find_map(|i| {
            self.comparators
                .iter()
                .find(|c| {
                    tokens.len() >= i + c.tokens.len()
                        && c.tokens.iter().zip(&tokens[i..]).all(|(a, b)| a == b)
                })
                .map(|c| (i, c))
        })?;

        let after = &tokens[position + comparator.tokens.len()..];
        let amount_at = after.iter().position(|t| parse_amount(t).is_some())?;
        let amount = parse_amount(after[amount_at])?;

        let product: Vec<&str> = tokens[..position]
            .iter()
            .copied()
            .chain(
                after
                    .iter()
                    .enumerate()
                    .filter(|(i, t)| *i != amount_at && !is_currency_marker(t))
                    .map(|(_, t)| *t),
            )
            .collect();

        Some((product.join(" "), Some((comparator.bound, amount)), PriceParse::Tokens))
    }

    fn strip_comparators(&self, text: &str) -> String {
        strip_all(&self.comparator_any, text)
    }
}

/// Remove every match of a word-bounded pattern.
fn strip_all(pattern: &Regex, text: &str) -> String {
    normalize(&pattern.replace_all(text, " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(query: &str) -> QueryIntent {
        let config = MatcherConfig::default();
        let parser = QueryParser::new(&config).unwrap();
        parser.interpret(query, &TermCorrector::new(&config))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Used   LAPTOP\t"), "used laptop");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_tokenize_drops_punctuation() {
        assert_eq!(tokenize("laptop, hp!"), vec!["laptop", "hp"]);
    }

    #[test]
    fn test_plain_query() {
        let intent = interpret("Dell Laptop");
        assert_eq!(intent.normalized, "dell laptop");
        assert_eq!(intent.terms, vec!["dell", "laptop"]);
        assert_eq!(intent.condition, None);
        assert!(intent.price.is_none());
    }

    #[test]
    fn test_condition_extracted_and_stripped() {
        let intent = interpret("used laptop");
        assert_eq!(intent.condition, Some(Condition::Used));
        assert_eq!(intent.terms, vec!["laptop"]);
    }

    #[test]
    fn test_condition_phrase_beats_shorter_keyword() {
        let intent = interpret("kettle like new");
        assert_eq!(intent.condition, Some(Condition::LikeNew));
        assert_eq!(intent.terms, vec!["kettle"]);
    }

    #[test]
    fn test_condition_needs_whole_word() {
        let intent = interpret("newspaper stand");
        assert_eq!(intent.condition, None);
        assert_eq!(intent.terms, vec!["newspaper", "stand"]);
    }

    #[test]
    fn test_price_pattern() {
        let intent = interpret("used laptop under 500");
        assert_eq!(intent.condition, Some(Condition::Used));
        assert_eq!(intent.terms, vec!["laptop"]);
        let price = intent.price.unwrap();
        assert_eq!(price.max_price, Some(500.0));
        assert_eq!(price.min_price, None);
        assert_eq!(price.parse, PriceParse::Pattern);
    }

    #[test]
    fn test_price_lower_bound_with_currency() {
        let intent = interpret("cooler more than ₹1,000");
        assert_eq!(intent.min_price(), Some(1000.0));
        assert_eq!(intent.terms, vec!["cooler"]);
    }

    #[test]
    fn test_price_token_fallback() {
        let intent = interpret("under 2k moble");
        let price = intent.price.as_ref().unwrap();
        assert_eq!(price.parse, PriceParse::Tokens);
        assert_eq!(price.max_price, Some(2000.0));
        assert_eq!(intent.terms, vec!["mobile"]);
    }

    #[test]
    fn test_price_token_fallback_skips_currency_words() {
        let intent = interpret("chair below rs 300 wooden");
        assert_eq!(intent.max_price(), Some(300.0));
        assert_eq!(intent.terms, vec!["chair", "wooden"]);
    }

    #[test]
    fn test_price_strip_fallback() {
        let intent = interpret("laptop under warranty");
        let price = intent.price.as_ref().unwrap();
        assert_eq!(price.parse, PriceParse::Stripped);
        assert!(price.is_unbounded());
        assert_eq!(intent.terms, vec!["laptop", "warranty"]);
    }

    #[test]
    fn test_price_range() {
        let intent = interpret("guitar above 1000 under 5000");
        assert_eq!(intent.min_price(), Some(1000.0));
        assert_eq!(intent.max_price(), Some(5000.0));
        assert_eq!(intent.terms, vec!["guitar"]);
    }

    #[test]
    fn test_comparator_inside_word_is_not_price_intent() {
        let intent = interpret("phone cover");
        assert!(intent.price.is_none());
        assert_eq!(intent.terms, vec!["mobile", "cover"]);
    }

    #[test]
    fn test_condition_next_to_punctuation() {
        for query in ["used, laptop", "laptop (used)", "laptop,used"] {
            let intent = interpret(query);
            assert_eq!(intent.condition, Some(Condition::Used), "query {query:?}");
            assert_eq!(intent.terms, vec!["laptop"]);
        }

        let intent = interpret("kettle (like new)");
        assert_eq!(intent.condition, Some(Condition::LikeNew));
        assert_eq!(intent.terms, vec!["kettle"]);
    }

    #[test]
    fn test_comparator_next_to_punctuation() {
        let intent = interpret("laptop, under 500");
        assert_eq!(intent.max_price(), Some(500.0));
        assert_eq!(intent.terms, vec!["laptop"]);

        let intent = interpret("laptop (under 500)");
        let price = intent.price.as_ref().unwrap();
        assert_eq!(price.parse, PriceParse::Tokens);
        assert_eq!(price.max_price, Some(500.0));
        assert_eq!(intent.terms, vec!["laptop"]);
    }

    #[test]
    fn test_default_comparators_only() {
        for query in ["calculator within hostel", "calculator upto hostel"] {
            let intent = interpret(query);
            assert!(intent.price.is_none(), "query {query:?}");
            assert_eq!(intent.terms.len(), 3);
        }
    }

    #[test]
    fn test_symbols_leave_no_terms() {
        let intent = interpret("!!!");
        assert!(intent.terms.is_empty());
        assert_eq!(intent.condition, None);
    }

    #[test]
    fn test_price_query_admits_inclusive() {
        let q = PriceQuery { min_price: Some(100.0), max_price: Some(500.0), parse: PriceParse::Pattern };
        assert!(q.admits(100.0));
        assert!(q.admits(500.0));
        assert!(!q.admits(500.01));
        assert!(!q.admits(99.0));
    }

    #[test]
    fn test_strip_all_adjacent_matches() {
        let re = Regex::new(&word_bounded("new")).unwrap();
        assert_eq!(strip_all(&re, "new new fan"), "fan");
    }
}
