//! WASM bindings for listing search.
//!
//! These let the web client run the same matcher in the browser against
//! listings it already fetched.

use crate::{default_matcher, levenshtein_distance, CatalogItem};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Search listings and return the matching ones as JSON.
///
/// # Arguments
/// * `query` - Search query as typed
/// * `items_json` - JSON array of listing objects (`title`, `description`,
///   `tags`, `price`, `condition`; other fields are kept as-is)
///
/// # Returns
/// JSON array of the matching input objects, unchanged, in result order.
/// `"[]"` if `items_json` is not a JSON array.
#[wasm_bindgen]
pub fn search_listings(query: &str, items_json: &str) -> String {
    let raw: Vec<Value> = match serde_json::from_str(items_json) {
        Ok(items) => items,
        Err(_) => return "[]".to_string(),
    };

    let items: Vec<CatalogItem> = raw.iter().map(CatalogItem::from_value).collect();
    let matched: Vec<&Value> = default_matcher()
        .search_indices(&items, query)
        .into_iter()
        .map(|index| &raw[index])
        .collect();

    serde_json::to_string(&matched).unwrap_or_else(|_| "[]".to_string())
}

/// Describe how a query is interpreted, as JSON.
#[wasm_bindgen]
pub fn interpret_query(query: &str) -> String {
    serde_json::to_string(&default_matcher().interpret(query)).unwrap_or_else(|_| "null".to_string())
}

/// Correct a single word with the built-in dictionary.
#[wasm_bindgen]
pub fn correct_term(word: &str) -> String {
    default_matcher().correct(word).term
}

/// Calculate Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    levenshtein_distance(a, b)
}
