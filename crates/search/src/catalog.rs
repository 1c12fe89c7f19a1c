//! Listing data as the matcher sees it.
//!
//! Listings arrive from the marketplace backend as loosely typed JSON, so
//! deserialization here never rejects a record: missing text becomes empty,
//! an unreadable price becomes `0` and an unknown condition becomes `None`.

use crate::amount::parse_amount;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Condition a seller lists an item in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    /// Never used
    New,
    /// Used but indistinguishable from new
    LikeNew,
    /// Light wear
    Good,
    /// Visible wear, fully working
    Fair,
    /// Second hand
    Used,
}

impl Condition {
    /// All conditions in display order.
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Used,
    ];

    /// Human-readable label as shown on listings.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Used => "Used",
        }
    }

    /// Parse a condition label leniently (`"like_new"`, `"Like New"`, `"LIKENEW"`).
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "new" => Some(Condition::New),
            "like new" | "likenew" => Some(Condition::LikeNew),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "used" => Some(Condition::Used),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Condition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Condition::parse(&value).ok_or_else(|| format!("unknown condition: {value}"))
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.label().to_string()
    }
}

/// Anything the matcher can search.
///
/// Implement this for your own listing type to search it without copying
/// into [`CatalogItem`].
pub trait Listing {
    /// Listing title
    fn title(&self) -> &str;

    /// Free-text description
    fn description(&self) -> &str {
        ""
    }

    /// Seller-supplied tags
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Asking price. Non-finite values are treated as `0`.
    fn price(&self) -> f64 {
        0.0
    }

    /// Listed condition, if known
    fn condition(&self) -> Option<Condition> {
        None
    }
}

/// A marketplace listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Listing title
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    /// Free-text description
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// Seller-supplied tags
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    /// Asking price (0 when the source value is not numeric)
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    /// Listed condition
    #[serde(default, deserialize_with = "lenient_condition")]
    pub condition: Option<Condition>,
}

impl CatalogItem {
    /// Create a listing with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Build a listing from an arbitrary JSON value, ignoring unknown fields.
    ///
    /// Never fails: a non-object value yields an empty listing.
    pub fn from_value(value: &Value) -> Self {
        CatalogItem::deserialize(value).unwrap_or_default()
    }
}

impl Listing for CatalogItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn condition(&self) -> Option<Condition> {
        self.condition
    }
}

impl<L: Listing + ?Sized> Listing for &L {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }

    fn price(&self) -> f64 {
        (**self).price()
    }

    fn condition(&self) -> Option<Condition> {
        (**self).condition()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(&s),
        _ => None,
    };
    Ok(price.filter(|p| p.is_finite()).unwrap_or(0.0))
}

fn lenient_condition<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Condition>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(Condition::parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_parse_variants() {
        assert_eq!(Condition::parse("Like New"), Some(Condition::LikeNew));
        assert_eq!(Condition::parse("like_new"), Some(Condition::LikeNew));
        assert_eq!(Condition::parse("LIKENEW"), Some(Condition::LikeNew));
        assert_eq!(Condition::parse(" used "), Some(Condition::Used));
        assert_eq!(Condition::parse("mint"), None);
    }

    #[test]
    fn test_condition_serde_uses_labels() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"Like New\"");
        let parsed: Condition = serde_json::from_str("\"fair\"").unwrap();
        assert_eq!(parsed, Condition::Fair);
        assert!(serde_json::from_str::<Condition>("\"mint\"").is_err());
    }

    #[test]
    fn test_full_listing_deserializes() {
        let item: CatalogItem = serde_json::from_value(json!({
            "id": "abc-123",
            "title": "Laptop HP Used",
            "description": "8GB RAM",
            "tags": ["electronics", "laptop"],
            "price": 450,
            "condition": "Used"
        }))
        .unwrap();

        assert_eq!(item.title, "Laptop HP Used");
        assert_eq!(item.tags, vec!["electronics", "laptop"]);
        assert_eq!(item.price, 450.0);
        assert_eq!(item.condition, Some(Condition::Used));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let item: CatalogItem = serde_json::from_value(json!({ "title": "Kettle" })).unwrap();
        assert_eq!(item.description, "");
        assert!(item.tags.is_empty());
        assert_eq!(item.price, 0.0);
        assert_eq!(item.condition, None);
    }

    #[test]
    fn test_null_and_odd_values_degrade() {
        let item: CatalogItem = serde_json::from_value(json!({
            "title": null,
            "description": 42,
            "tags": "books, notes ,,",
            "price": "not a price",
            "condition": 7
        }))
        .unwrap();

        assert_eq!(item.title, "");
        assert_eq!(item.description, "42");
        assert_eq!(item.tags, vec!["books", "notes"]);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.condition, None);
    }

    #[test]
    fn test_string_price_is_parsed() {
        let item: CatalogItem =
            serde_json::from_value(json!({ "title": "Cooler", "price": "₹1,500" })).unwrap();
        assert_eq!(item.price, 1500.0);
    }

    #[test]
    fn test_from_value_never_fails() {
        assert_eq!(CatalogItem::from_value(&json!("just a string")), CatalogItem::default());
        assert_eq!(CatalogItem::from_value(&json!({"title": "Fan"})).title, "Fan");
    }

    #[test]
    fn test_builder() {
        let item = CatalogItem::new("Study Table")
            .with_description("wooden")
            .with_tags(["furniture"])
            .with_price(800.0)
            .with_condition(Condition::Good);

        assert_eq!(Listing::title(&item), "Study Table");
        assert_eq!(Listing::tags(&item), ["furniture".to_string()]);
        assert_eq!(Listing::condition(&item), Some(Condition::Good));
    }
}
