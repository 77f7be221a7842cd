//! Normalization of caller-supplied filter expressions
//!
//! Two input shapes are accepted and mapped onto [`FilterNode`]:
//!
//! - canonical: `{"type": "group", "join", "negate", "children"}` and
//!   `{"type": "leaf", "termId", "kind", "negate", "values", "ranges"}`
//! - legacy: `{"type": "tvslst", "join", "in", "lst"}` and
//!   `{"type": "tvs", "tvs": {"term": {"id", "type"}, "values", "ranges", "isnot"}}`
//!
//! Malformed leaves never fail; they become leaves that match nothing.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

use super::types::{Criteria, FilterNode, Join, LeafFilter, NumericInterval};

/// Normalize a raw filter expression.
///
/// Returns `None` (no restriction) for `null`, an empty array, or a group
/// whose child list is empty. A group whose children were all dropped during
/// normalization is kept as a childless group, which matches nothing.
pub fn normalize(raw: &Value) -> Option<FilterNode> {
    match raw {
        Value::Null => None,
        Value::Array(items) => normalize_group_items(Join::And, false, items),
        Value::Object(map) => normalize_object(map),
        other => {
            debug!(filter = %other, "unrecognized filter value");
            Some(FilterNode::Leaf(LeafFilter::always_empty()))
        }
    }
}

/// Parse JSON text and normalize it
pub fn normalize_str(raw: &str) -> Result<Option<FilterNode>, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(normalize(&value))
}

fn normalize_object(map: &Map<String, Value>) -> Option<FilterNode> {
    let node_type = map.get("type").and_then(Value::as_str).unwrap_or("");

    match node_type {
        "group" | "tvslst" => normalize_group(map),
        "leaf" | "tvs" => Some(normalize_leaf(map)),
        _ if map.contains_key("lst") || map.contains_key("children") => normalize_group(map),
        _ => Some(normalize_leaf(map)),
    }
}

fn normalize_group(map: &Map<String, Value>) -> Option<FilterNode> {
    let join = match map.get("join").and_then(Value::as_str) {
        Some(j) if j.eq_ignore_ascii_case("or") => Join::Or,
        _ => Join::And,
    };

    // legacy groups express negation as `in: false`
    let negate = flag(map, "negate").unwrap_or(false)
        || map.get("in").and_then(Value::as_bool) == Some(false);

    let items = map
        .get("children")
        .or_else(|| map.get("lst"))
        .and_then(Value::as_array);

    match items {
        Some(items) => normalize_group_items(join, negate, items),
        None => None,
    }
}

fn normalize_group_items(join: Join, negate: bool, items: &[Value]) -> Option<FilterNode> {
    if items.is_empty() {
        return None;
    }
    let children = items.iter().filter_map(normalize).collect();
    Some(FilterNode::Group {
        join,
        negate,
        children,
    })
}

fn normalize_leaf(map: &Map<String, Value>) -> FilterNode {
    // legacy leaves nest everything under `tvs`
    let body = map.get("tvs").and_then(Value::as_object).unwrap_or(map);

    let negate = flag(body, "negate")
        .or_else(|| flag(body, "isNot"))
        .or_else(|| flag(body, "isnot"))
        .or_else(|| flag(map, "negate"))
        .unwrap_or(false);

    let term = body.get("term").and_then(Value::as_object);
    let term_id = body
        .get("termId")
        .and_then(Value::as_str)
        .or_else(|| term.and_then(|t| t.get("id")).and_then(Value::as_str))
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let Some(term_id) = term_id else {
        debug!("filter leaf without a term reference");
        let mut leaf = LeafFilter::always_empty();
        leaf.negate = negate;
        return FilterNode::Leaf(leaf);
    };

    let kind = body
        .get("kind")
        .and_then(Value::as_str)
        .or_else(|| term.and_then(|t| t.get("type")).and_then(Value::as_str));
    let numeric = match kind {
        Some("numeric" | "integer" | "float") => true,
        Some(_) => false,
        None => body.contains_key("ranges"),
    };

    let criteria = if numeric {
        Criteria::Ranges(normalize_ranges(body.get("ranges")))
    } else {
        Criteria::Values(normalize_values(body.get("values")))
    };

    FilterNode::Leaf(LeafFilter {
        term_id: term_id.to_string(),
        criteria,
        negate,
    })
}

/// Selected category keys; accepts `"M"` and `{"key": "M"}` entries
fn normalize_values(raw: Option<&Value>) -> BTreeSet<String> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return BTreeSet::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => obj.get("key").and_then(scalar_to_string),
            other => scalar_to_string(other),
        })
        .collect()
}

fn normalize_ranges(raw: Option<&Value>) -> Vec<NumericInterval> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(normalize_range)
        .collect()
}

/// One interval; absent or unbounded ends become ±∞ and inclusivity
/// defaults to inclusive
fn normalize_range(range: &Map<String, Value>) -> NumericInterval {
    let min_unbounded = flag(range, "startunbounded").unwrap_or(false);
    let max_unbounded = flag(range, "stopunbounded").unwrap_or(false);

    let min = if min_unbounded {
        None
    } else {
        number(range, "min").or_else(|| number(range, "start"))
    };
    let max = if max_unbounded {
        None
    } else {
        number(range, "max").or_else(|| number(range, "stop"))
    };

    NumericInterval {
        min: min.unwrap_or(f64::NEG_INFINITY),
        max: max.unwrap_or(f64::INFINITY),
        include_min: flag(range, "includeMin")
            .or_else(|| flag(range, "startinclusive"))
            .unwrap_or(true),
        include_max: flag(range, "includeMax")
            .or_else(|| flag(range, "stopinclusive"))
            .unwrap_or(true),
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| !n.is_nan())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
