//! Normalization of the lists API response.
//!
//! The endpoint has been observed to wrap its lists in several different
//! envelopes. Known shapes are tried first, in a fixed order:
//!
//! 1. `{ "data": { "lists": [...] } }`
//! 2. `{ "lists": [...] }`
//! 3. `{ "payload": { "lists": [...] } }`
//!
//! When none of them match, [`find_lists_in_value`] walks the document and
//! collects array values under any key whose name contains `list`. That last
//! step is a heuristic: it can pick up unrelated arrays (`wishlistIds`,
//! `listingBanners`, ...), so it only runs after every known shape missed.

use serde_json::{Map, Value};

use super::types::{value_to_text, ListItem, ShoppingList};
use crate::page::PageContext;

const UNKNOWN_LIST_ID: &str = "unknown-id";
const UNNAMED_LIST: &str = "Unnamed List";

/// Which envelope the lists were found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    DataLists,
    TopLevelLists,
    PayloadLists,
    KeyScan,
}

/// Normalize a lists API response into shopping lists.
///
/// Returns an empty vector when nothing list-like was found.
pub fn normalize_lists(data: &Value) -> Vec<ShoppingList> {
    let (shape, raw) = locate_raw_lists(data);

    if shape == ResponseShape::KeyScan {
        tracing::warn!("Unexpected lists response structure, scanned for list-like keys");
    }
    tracing::debug!("Lists response shape: {:?} ({} raw lists)", shape, raw.len());

    raw.iter().filter_map(to_shopping_list).collect()
}

/// Find the raw list values and report which strategy matched
pub fn locate_raw_lists(data: &Value) -> (ResponseShape, Vec<Value>) {
    if let Some(lists) = data.pointer("/data/lists").and_then(Value::as_array) {
        return (ResponseShape::DataLists, lists.clone());
    }

    if let Some(lists) = data.get("lists").and_then(Value::as_array) {
        return (ResponseShape::TopLevelLists, lists.clone());
    }

    if let Some(lists) = data.pointer("/payload/lists").and_then(Value::as_array) {
        return (ResponseShape::PayloadLists, lists.clone());
    }

    (ResponseShape::KeyScan, find_lists_in_value(data))
}

/// Recursively collect array elements stored under keys containing `list`
/// (case-insensitive). Only matching keys are descended into.
pub fn find_lists_in_value(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(find_lists_in_value).collect(),
        Value::Object(map) => scan_object(map),
        _ => Vec::new(),
    }
}

fn scan_object(map: &Map<String, Value>) -> Vec<Value> {
    let mut found = Vec::new();

    for (key, value) in map {
        if !key.to_lowercase().contains("list") {
            continue;
        }

        match value {
            Value::Array(items) => found.extend(items.iter().cloned()),
            Value::Object(_) => found.extend(find_lists_in_value(value)),
            _ => {}
        }
    }

    found
}

fn to_shopping_list(raw: &Value) -> Option<ShoppingList> {
    let Some(obj) = raw.as_object() else {
        tracing::debug!("Skipping non-object list entry: {}", raw);
        return None;
    };

    let list_id = text_or(obj.get("id"), UNKNOWN_LIST_ID);
    let list_name = text_or(obj.get("name"), UNNAMED_LIST);

    let items = match obj.get("items").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|item| match serde_json::from_value::<ListItem>(item.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping unreadable item in list {}: {}", list_id, e);
                    None
                }
            })
            .collect(),
        None => Vec::new(),
    };

    Some(ShoppingList {
        list_id,
        list_name,
        items,
    })
}

fn text_or(value: Option<&Value>, fallback: &str) -> String {
    let text = value.map(value_to_text).unwrap_or_default();
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Narrow the fetched lists down to the page's own list on a single-list page.
///
/// The result may be empty when the page and the API disagree; callers report
/// that separately from "no lists at all".
pub fn filter_for_context(
    lists: Vec<ShoppingList>,
    context: Option<&PageContext>,
) -> Vec<ShoppingList> {
    let Some(list_id) = context.and_then(PageContext::single_list_id) else {
        return lists;
    };

    let filtered: Vec<_> = lists
        .into_iter()
        .filter(|list| list.list_id == list_id)
        .collect();

    tracing::info!(
        "Single-list page: kept {} list(s) matching {}",
        filtered.len(),
        list_id
    );

    filtered
}
