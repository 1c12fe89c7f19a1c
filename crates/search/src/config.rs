//! Matcher configuration: scoring constants, typo dictionary and keyword maps.
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes. Supplying `[[dictionary.terms]]`, `[[conditions]]` or a `[price]`
//! list replaces the built-in list rather than extending it.

use crate::catalog::Condition;
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Config file names looked up, in order, when no path is given.
pub const CONFIG_CANDIDATES: &[&str] = &[
    ".hostelbazaar.toml",
    "hostelbazaar.toml",
    ".config/hostelbazaar.toml",
];

/// Tunable behaviour of a [`FuzzyMatcher`](crate::FuzzyMatcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Items with relevance at or below this are dropped
    pub min_relevance: f64,
    /// Multiplier for the title score
    pub title_weight: f64,
    /// Multiplier for the description score
    pub description_weight: f64,
    /// Multiplier for the joined-tags score
    pub tag_weight: f64,
    /// Multiplier applied to a partial word match
    pub partial_weight: f64,
    /// Partial score when a field word shares the query word's prefix
    pub prefix_match_score: f64,
    /// Partial score when the query word contains a field word
    pub containment_score: f64,
    /// Prefix length compared by the partial matcher
    pub prefix_len: usize,
    /// Query words shorter than this never partially match
    pub min_partial_word_len: usize,
    /// Field words shorter than this are ignored by the partial matcher
    pub min_field_word_len: usize,
    /// Query words shorter than this are never typo-corrected
    pub min_correctable_len: usize,
    /// Words shorter than this skip edit-distance matching against canonical terms
    pub canonical_distance_min_len: usize,
    /// Max edit distance to a canonical term
    pub max_canonical_distance: usize,
    /// Max edit distance to a listed variant
    pub max_variant_distance: usize,
    /// Item count at which scoring switches to rayon (with the `parallel` feature)
    pub parallel_threshold: usize,
    /// Typo and synonym dictionary
    pub dictionary: Dictionary,
    /// Query keywords that imply a condition filter
    pub conditions: Vec<ConditionKeyword>,
    /// Comparator phrases that trigger the price-query path
    pub price: PriceKeywords,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_relevance: 0.05,
            title_weight: 1.0,
            description_weight: 0.7,
            tag_weight: 0.8,
            partial_weight: 0.7,
            prefix_match_score: 0.5,
            containment_score: 0.3,
            prefix_len: 3,
            min_partial_word_len: 4,
            min_field_word_len: 3,
            min_correctable_len: 3,
            canonical_distance_min_len: 4,
            max_canonical_distance: 2,
            max_variant_distance: 1,
            parallel_threshold: 512,
            dictionary: Dictionary::default(),
            conditions: default_conditions(),
            price: PriceKeywords::default(),
        }
    }
}

/// Canonical terms with their known variants, plus one-off misspellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dictionary {
    /// Misspelling to correct spelling, checked before anything else
    pub misspellings: BTreeMap<String, String>,
    /// Canonical terms; order breaks edit-distance ties
    pub terms: Vec<DictionaryTerm>,
}

/// A canonical search term and the spellings users type for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryTerm {
    /// Term the query is rewritten to
    pub canonical: String,
    /// Typos, abbreviations and synonyms
    #[serde(default)]
    pub variants: Vec<String>,
}

impl DictionaryTerm {
    /// Create a term from its canonical form and variants.
    pub fn new(canonical: &str, variants: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        let terms = vec![
            DictionaryTerm::new("mobile", &["moble", "mobil", "mbl", "phone", "phon", "mobail", "fone", "smartphone"]),
            DictionaryTerm::new("iphone", &["iphon", "ipone", "aiphone"]),
            DictionaryTerm::new("laptop", &["laptp", "lapto", "labtop", "lappy", "notebook"]),
            DictionaryTerm::new("bicycle", &["cycle", "bicycl", "bycycle", "bike", "cyle", "saikal"]),
            DictionaryTerm::new("mattress", &["matress", "mattres", "gadda", "bed"]),
            DictionaryTerm::new("calculator", &["calc", "calci", "calculater", "calcu"]),
            DictionaryTerm::new("headphones", &["headphone", "earphones", "earphone", "headset", "hedphones", "earbuds"]),
            DictionaryTerm::new("charger", &["chargr", "charjer", "adapter", "adaptor"]),
            DictionaryTerm::new("book", &["books", "textbook", "txtbook", "novel", "buk"]),
            DictionaryTerm::new("cooler", &["coolr", "kooler"]),
            DictionaryTerm::new("cover", &["covr", "pouch"]),
            DictionaryTerm::new("kettle", &["ketle", "ketli", "kettel"]),
            DictionaryTerm::new("table", &["tabel", "tble", "desk"]),
            DictionaryTerm::new("chair", &["chiar", "chare"]),
            DictionaryTerm::new("keyboard", &["keybord", "kebord", "keybaord"]),
            DictionaryTerm::new("monitor", &["moniter", "monitr"]),
            DictionaryTerm::new("guitar", &["guiter", "gitar", "gutar"]),
            DictionaryTerm::new("bucket", &["bukket", "balti"]),
            DictionaryTerm::new("printer", &["printr", "priter"]),
        ];

        let misspellings = [
            ("samsng", "samsung"),
            ("samsang", "samsung"),
            ("scientfic", "scientific"),
            ("frige", "fridge"),
            ("inducton", "induction"),
            ("blutooth", "bluetooth"),
            ("bluetoth", "bluetooth"),
            ("speeker", "speaker"),
            ("spekar", "speaker"),
            ("drafer", "drafter"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self { misspellings, terms }
    }
}

/// Maps a query keyword to the condition it filters on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionKeyword {
    /// Word or phrase as typed in a query
    pub keyword: String,
    /// Condition items must have
    pub condition: Condition,
}

impl ConditionKeyword {
    /// Create a keyword mapping.
    pub fn new(keyword: &str, condition: Condition) -> Self {
        Self {
            keyword: keyword.to_string(),
            condition,
        }
    }
}

fn default_conditions() -> Vec<ConditionKeyword> {
    vec![
        ConditionKeyword::new("like new", Condition::LikeNew),
        ConditionKeyword::new("brand new", Condition::New),
        ConditionKeyword::new("new", Condition::New),
        ConditionKeyword::new("used", Condition::Used),
        ConditionKeyword::new("second hand", Condition::Used),
    ]
}

/// Comparator phrases for price queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceKeywords {
    /// Phrases meaning "price at most N"
    pub upper_bound: Vec<String>,
    /// Phrases meaning "price at least N"
    pub lower_bound: Vec<String>,
}

impl Default for PriceKeywords {
    fn default() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            upper_bound: owned(&["under", "below", "less than"]),
            lower_bound: owned(&["above", "over", "more than"]),
        }
    }
}

impl MatcherConfig {
    /// Load from an explicit path, else the first config file found in the
    /// current directory, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let found = path
            .map(Path::to_path_buf)
            .or_else(|| find_config_file_in(Path::new(".")));

        match found {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SearchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| SearchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| SearchError::ConfigParse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges and keyword lists.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("title_weight", self.title_weight),
            ("description_weight", self.description_weight),
            ("tag_weight", self.tag_weight),
            ("partial_weight", self.partial_weight),
            ("prefix_match_score", self.prefix_match_score),
            ("containment_score", self.containment_score),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        if !(0.0..1.0).contains(&self.min_relevance) {
            return Err(invalid(format!(
                "min_relevance must be within [0, 1), got {}",
                self.min_relevance
            )));
        }

        if self.prefix_len == 0 {
            return Err(invalid("prefix_len must be at least 1".to_string()));
        }

        let mut seen = HashSet::new();
        for term in &self.dictionary.terms {
            let canonical = term.canonical.trim().to_lowercase();
            if canonical.is_empty() {
                return Err(invalid("dictionary term with empty canonical form".to_string()));
            }
            if !seen.insert(canonical) {
                return Err(invalid(format!("duplicate dictionary term: {}", term.canonical)));
            }
        }

        if self.conditions.iter().any(|c| c.keyword.trim().is_empty()) {
            return Err(invalid("condition keyword must not be empty".to_string()));
        }

        let comparators = self.price.upper_bound.iter().chain(&self.price.lower_bound);
        if comparators.clone().any(|p| p.trim().is_empty()) {
            return Err(invalid("price comparator must not be empty".to_string()));
        }
        if comparators.count() == 0 {
            return Err(invalid("at least one price comparator is required".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> SearchError {
    SearchError::InvalidConfig(message)
}

/// First existing config file under `base`, in [`CONFIG_CANDIDATES`] order.
pub fn find_config_file_in(base: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchErrorCode;

    #[test]
    fn test_defaults_are_valid() {
        let config = MatcherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_relevance, 0.05);
        assert_eq!(config.description_weight, 0.7);
        assert_eq!(config.tag_weight, 0.8);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = MatcherConfig::from_toml_str("min_relevance = 0.2\ntag_weight = 0.5\n").unwrap();
        assert_eq!(config.min_relevance, 0.2);
        assert_eq!(config.tag_weight, 0.5);
        assert_eq!(config.title_weight, 1.0);
        assert_eq!(config.dictionary, Dictionary::default());
    }

    #[test]
    fn test_dictionary_terms_replace_builtin() {
        let toml = r#"
[[dictionary.terms]]
canonical = "scooter"
variants = ["scooty", "skooter"]
"#;
        let config = MatcherConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.dictionary.terms.len(), 1);
        assert_eq!(config.dictionary.terms[0].canonical, "scooter");
        // Misspellings were not given, so the built-in map stays
        assert!(config.dictionary.misspellings.contains_key("samsng"));
    }

    #[test]
    fn test_condition_keywords_from_toml() {
        let toml = r#"
[[conditions]]
keyword = "sealed"
condition = "New"

[[conditions]]
keyword = "old"
condition = "used"
"#;
        let config = MatcherConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.conditions.len(), 2);
        assert_eq!(config.conditions[1].condition, Condition::Used);
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let config = MatcherConfig { tag_weight: 1.5, ..MatcherConfig::default() };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::InvalidConfig);
        assert!(err.to_string().contains("tag_weight"));
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let config = MatcherConfig { min_relevance: f64::NAN, ..MatcherConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_terms() {
        let mut config = MatcherConfig::default();
        config.dictionary.terms.push(DictionaryTerm::new("Laptop", &[]));
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_missing_comparators() {
        let mut config = MatcherConfig::default();
        config.price.upper_bound.clear();
        config.price.lower_bound.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_has_code() {
        let err = MatcherConfig::from_toml_str("min_relevance = \"high\"").unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::ConfigParse);
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let config = MatcherConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("min_relevance"));
        assert_eq!(MatcherConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_load_from_file_and_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file_in(dir.path()).is_none());

        let path = dir.path().join("hostelbazaar.toml");
        std::fs::write(&path, "min_relevance = 0.1\n").unwrap();

        assert_eq!(find_config_file_in(dir.path()), Some(path.clone()));
        let config = MatcherConfig::load(Some(&path)).unwrap();
        assert_eq!(config.min_relevance, 0.1);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = MatcherConfig::load(Some(Path::new("/nonexistent/hostelbazaar.toml"))).unwrap_err();
        assert_eq!(err.code(), SearchErrorCode::ConfigRead);
    }
}
