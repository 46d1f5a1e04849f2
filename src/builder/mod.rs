//! # Request Builder
//!
//! Turns an endpoint descriptor plus user-supplied parameter values into the
//! final request URL: path-template substitution, then a method-gated query
//! string assembled from classified parameters.
//!
//! Classification is an ordered chain of pure rules over `(name, value)`;
//! the first rule that matches decides the query pair, so precedence lives in
//! the rule list rather than nested conditionals. The rules support the three
//! overlapping conventions of filterable data APIs without the caller picking
//! a mode: an explicit `filter=` field, column-named parameters holding
//! `operator.value`, and plain passthrough parameters.

use indexmap::IndexMap;

use crate::catalog::EndpointDescriptor;
use crate::filter::operator_prefix;

/// Parameters recognized as top-level query controls, appended as-is.
pub const CONTROL_PARAMS: [&str; 6] = ["select", "order", "limit", "offset", "range", "prefer"];

type ClassifyRule = fn(&str, &str) -> Option<(String, String)>;

/// Priority order of the classification rules. First match wins.
const CLASSIFY_RULES: [ClassifyRule; 5] = [
    explicit_filter,
    control_param,
    column_filter,
    embedded_filter,
    passthrough,
];

/// Decide the query pair for one non-path parameter.
pub fn classify(name: &str, value: &str) -> (String, String) {
    CLASSIFY_RULES
        .iter()
        .find_map(|rule| rule(name, value))
        .unwrap_or_else(|| (name.to_string(), value.to_string()))
}

/// A parameter literally named `filter` holds `column=operator.value`; the
/// column becomes the query key. Only the first `=` separates column from
/// value, so values that themselves contain `=` (base64, for example) stay
/// intact.
fn explicit_filter(name: &str, value: &str) -> Option<(String, String)> {
    if name != "filter" {
        return None;
    }
    let (column, rest) = value.split_once('=')?;
    Some((column.to_string(), rest.to_string()))
}

fn control_param(name: &str, value: &str) -> Option<(String, String)> {
    if CONTROL_PARAMS.contains(&name) {
        Some((name.to_string(), value.to_string()))
    } else {
        None
    }
}

/// A value starting with `<operator>.` makes the parameter a column filter
/// under its own name, so parameters can be named directly after table
/// columns (`age=gt.18`). This matches on the value alone regardless of the
/// name; a parameter whose value legitimately starts with e.g. `is.` is
/// classified as a filter too. Long-standing behavior, kept for
/// compatibility.
fn column_filter(name: &str, value: &str) -> Option<(String, String)> {
    operator_prefix(value)?;
    Some((name.to_string(), value.to_string()))
}

/// A full `column=operator.value` expression supplied as the value of an
/// arbitrarily named parameter.
fn embedded_filter(_name: &str, value: &str) -> Option<(String, String)> {
    let (column, rest) = value.split_once('=')?;
    operator_prefix(rest)?;
    Some((column.to_string(), rest.to_string()))
}

fn passthrough(name: &str, value: &str) -> Option<(String, String)> {
    Some((name.to_string(), value.to_string()))
}

/// Build the final request URL.
///
/// Path placeholders are substituted with URL-encoded values and those
/// parameters never reach the query string. The query string is only built
/// for methods that carry one (GET, PATCH, DELETE); POST and PUT move all
/// non-path data into the body. Empty values are skipped in every category.
pub fn build_url(
    endpoint: &EndpointDescriptor,
    params: &IndexMap<String, String>,
    base_url: &str,
) -> String {
    let base = base_url.trim_end_matches('/');
    let mut url = format!("{}{}", base, endpoint.path);

    let mut query: Vec<(String, String)> = Vec::new();
    for (name, value) in params {
        if value.is_empty() {
            continue;
        }
        let placeholder = format!("{{{name}}}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, &urlencoding::encode(value));
            continue;
        }
        if endpoint.method.carries_query() {
            query.push(classify(name, value));
        }
    }

    if query.is_empty() {
        return url;
    }

    match reqwest::Url::parse(&url) {
        Ok(mut parsed) => {
            {
                let mut pairs = parsed.query_pairs_mut();
                for (key, value) in &query {
                    pairs.append_pair(key, value);
                }
            }
            parsed.to_string()
        }
        // An unparseable base is the user's problem; send it as typed.
        Err(_) => url,
    }
}
