//! Typo correction against the configured dictionary.

use crate::config::MatcherConfig;
use crate::distance::distance_within;
use serde::Serialize;
use std::collections::HashMap;

/// Which rule rewrote (or kept) a query word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CorrectionRule {
    /// Shorter than `min_correctable_len`, left alone
    TooShort,
    /// Found in the misspelling map
    Misspelling,
    /// Already a canonical term
    Canonical,
    /// A listed variant of a canonical term
    Variant,
    /// Within `max_canonical_distance` edits of a canonical term
    CanonicalDistance { distance: usize },
    /// Within `max_variant_distance` edits of a variant
    VariantDistance { variant: String, distance: usize },
    /// No rule applied
    Unchanged,
}

/// Outcome of correcting a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    /// Word as typed (lower-cased)
    pub original: String,
    /// Word used for matching
    pub term: String,
    /// Rule that produced `term`
    #[serde(flatten)]
    pub rule: CorrectionRule,
}

impl Correction {
    fn keep(word: &str, rule: CorrectionRule) -> Self {
        Self {
            original: word.to_string(),
            term: word.to_string(),
            rule,
        }
    }

    fn rewrite(word: &str, term: &str, rule: CorrectionRule) -> Self {
        Self {
            original: word.to_string(),
            term: term.to_string(),
            rule,
        }
    }

    /// True if the word was rewritten.
    pub fn changed(&self) -> bool {
        self.original != self.term
    }
}

/// Lookup tables built once from a [`MatcherConfig`].
#[derive(Debug, Clone)]
pub(crate) struct TermCorrector {
    misspellings: HashMap<String, String>,
    /// Canonical terms in dictionary order
    canonicals: Vec<String>,
    /// Index into `canonicals` for every canonical term and variant
    lookup: HashMap<String, usize>,
    /// (variant, owning canonical index) in dictionary order
    variants: Vec<(String, usize)>,
    min_correctable_len: usize,
    canonical_distance_min_len: usize,
    max_canonical_distance: usize,
    max_variant_distance: usize,
}

impl TermCorrector {
    pub(crate) fn new(config: &MatcherConfig) -> Self {
        let misspellings = config
            .dictionary
            .misspellings
            .iter()
            .map(|(from, to)| (from.trim().to_lowercase(), to.trim().to_lowercase()))
            .collect();

        let mut canonicals = Vec::with_capacity(config.dictionary.terms.len());
        let mut lookup = HashMap::new();
        let mut variants = Vec::new();

        for (idx, term) in config.dictionary.terms.iter().enumerate() {
            let canonical = term.canonical.trim().to_lowercase();
            lookup.insert(canonical.clone(), idx);
            canonicals.push(canonical);

            for variant in &term.variants {
                let variant = variant.trim().to_lowercase();
                if variant.is_empty() {
                    continue;
                }
                // Earlier terms win when two terms list the same variant
                lookup.entry(variant.clone()).or_insert(idx);
                variants.push((variant, idx));
            }
        }

        Self {
            misspellings,
            canonicals,
            lookup,
            variants,
            min_correctable_len: config.min_correctable_len,
            canonical_distance_min_len: config.canonical_distance_min_len,
            max_canonical_distance: config.max_canonical_distance,
            max_variant_distance: config.max_variant_distance,
        }
    }

    /// Correct one lower-cased word.
    pub(crate) fn correct(&self, word: &str) -> Correction {
        let len = word.chars().count();
        if len < self.min_correctable_len {
            return Correction::keep(word, CorrectionRule::TooShort);
        }

        if let Some(fixed) = self.misspellings.get(word) {
            return Correction::rewrite(word, fixed, CorrectionRule::Misspelling);
        }

        if let Some(&idx) = self.lookup.get(word) {
            let canonical = &self.canonicals[idx];
            return if canonical == word {
                Correction::keep(word, CorrectionRule::Canonical)
            } else {
                Correction::rewrite(word, canonical, CorrectionRule::Variant)
            };
        }

        if len >= self.canonical_distance_min_len {
            if let Some((idx, distance)) = self.closest_canonical(word) {
                return Correction::rewrite(
                    word,
                    &self.canonicals[idx],
                    CorrectionRule::CanonicalDistance { distance },
                );
            }
        }

        if let Some((variant, idx, distance)) = self.closest_variant(word) {
            return Correction::rewrite(
                word,
                &self.canonicals[idx],
                CorrectionRule::VariantDistance {
                    variant: variant.to_string(),
                    distance,
                },
            );
        }

        Correction::keep(word, CorrectionRule::Unchanged)
    }

    fn closest_canonical(&self, word: &str) -> Option<(usize, usize)> {
        self.canonicals
            .iter()
            .enumerate()
            .filter_map(|(idx, canonical)| {
                distance_within(word, canonical, self.max_canonical_distance).map(|d| (idx, d))
            })
            .min_by_key(|&(_, d)| d)
    }

    fn closest_variant(&self, word: &str) -> Option<(&str, usize, usize)> {
        self.variants
            .iter()
            .filter_map(|(variant, idx)| {
                distance_within(word, variant, self.max_variant_distance)
                    .map(|d| (variant.as_str(), *idx, d))
            })
            .min_by_key(|&(_, _, d)| d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DictionaryTerm;

    fn corrector() -> TermCorrector {
        TermCorrector::new(&MatcherConfig::default())
    }

    #[test]
    fn test_short_words_untouched() {
        let c = corrector();
        let result = c.correct("hp");
        assert_eq!(result.term, "hp");
        assert_eq!(result.rule, CorrectionRule::TooShort);
    }

    #[test]
    fn test_misspelling_map() {
        let result = corrector().correct("samsng");
        assert_eq!(result.term, "samsung");
        assert_eq!(result.rule, CorrectionRule::Misspelling);
        assert!(result.changed());
    }

    #[test]
    fn test_canonical_and_variant() {
        let c = corrector();
        assert_eq!(c.correct("mobile").rule, CorrectionRule::Canonical);

        let moble = c.correct("moble");
        assert_eq!(moble.term, "mobile");
        assert_eq!(moble.rule, CorrectionRule::Variant);

        assert_eq!(c.correct("phone").term, "mobile");
        assert_eq!(c.correct("mbl").term, "mobile");
    }

    #[test]
    fn test_canonical_distance() {
        let result = corrector().correct("laptops");
        assert_eq!(result.term, "laptop");
        assert_eq!(result.rule, CorrectionRule::CanonicalDistance { distance: 1 });

        let result = corrector().correct("mattrass");
        assert_eq!(result.term, "mattress");
    }

    #[test]
    fn test_canonical_distance_needs_four_chars() {
        // Two edits from "chair", but three letters is too short to compare against canonicals
        let result = corrector().correct("chr");
        assert_eq!(result.term, "chr");
        assert_eq!(result.rule, CorrectionRule::Unchanged);
    }

    #[test]
    fn test_variant_distance() {
        let result = corrector().correct("bikes");
        assert_eq!(result.term, "bicycle");
        assert_eq!(
            result.rule,
            CorrectionRule::VariantDistance { variant: "bike".into(), distance: 1 }
        );

        // Three letters: rule (c) is skipped but rule (d) still applies
        assert_eq!(corrector().correct("bef").term, "mattress");
    }

    #[test]
    fn test_brand_names_stay_put() {
        let c = corrector();
        assert_eq!(c.correct("iphone").term, "iphone");
        assert_eq!(c.correct("dell").term, "dell");
        assert_eq!(c.correct("cover").term, "cover");
    }

    #[test]
    fn test_unknown_word_unchanged() {
        let result = corrector().correct("yamaha");
        assert_eq!(result.term, "yamaha");
        assert!(!result.changed());
    }

    #[test]
    fn test_ties_prefer_dictionary_order() {
        let mut config = MatcherConfig::default();
        config.dictionary.terms = vec![
            DictionaryTerm::new("lamp", &[]),
            DictionaryTerm::new("camp", &[]),
        ];
        let c = TermCorrector::new(&config);
        // "damp" is one edit from both
        assert_eq!(c.correct("damp").term, "lamp");
    }

    #[test]
    fn test_dictionary_is_case_insensitive() {
        let mut config = MatcherConfig::default();
        config.dictionary.terms = vec![DictionaryTerm::new("Scooter", &["Scooty"])];
        let c = TermCorrector::new(&config);
        assert_eq!(c.correct("scooty").term, "scooter");
    }
}
