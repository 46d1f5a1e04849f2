//! # Filter Micro-Syntax
//!
//! Validation for the `column=operator.value` convention used by filterable
//! query parameters, e.g. `name=eq.John` or `age=gt.18`. The validator is
//! advisory: the request builder re-derives correctness on its own, so an
//! invalid filter is still sent, just as a raw query parameter.

/// The closed set of recognized filter operators.
pub const FILTER_OPERATORS: [&str; 16] = [
    "eq", "neq", "gt", "gte", "lt", "lte", "like", "ilike", "match", "imatch", "in", "is", "fts",
    "plfts", "phfts", "wfts",
];

/// Validate a filter value against the `column=operator.value` grammar.
///
/// An empty value is valid (the filter is simply not provided).
pub fn validate_filter(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }

    if let Some((column, rest)) = value.split_once('=') {
        if is_identifier(column) && operator_prefix(rest).is_some() {
            return Ok(());
        }
    }

    Err(
        "Filter must be `column=operator.value`, e.g. `name=eq.John` or `age=gt.18`"
            .to_string(),
    )
}

/// If `value` starts with `<operator>.` for a recognized operator, return the
/// operator and the remainder after the dot.
pub fn operator_prefix(value: &str) -> Option<(&str, &str)> {
    let (op, rest) = value.split_once('.')?;
    if FILTER_OPERATORS.contains(&op) {
        Some((op, rest))
    } else {
        None
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
