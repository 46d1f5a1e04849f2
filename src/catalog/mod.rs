//! # Endpoint Catalog
//!
//! Read-only descriptions of the callable API surface: categories of
//! endpoints, each with a method, a path template and its documented
//! parameters. Loaded once at startup from a static JSON dataset and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::http::method::HttpMethod;

/// One documented parameter of an endpoint.
///
/// `param_type` is informational only; every value travels as a string and
/// the backend does its own coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// One callable API operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub id: String,
    pub method: HttpMethod,
    /// Path template, possibly containing `{name}` placeholders.
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Example request body used to seed the body editor on selection.
    #[serde(default)]
    pub example_body: Option<String>,
}

/// A named group of endpoints, in documentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    pub name: String,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// The full endpoint catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<ApiCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<ApiCategory>) -> Self {
        Self { categories }
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse endpoint catalog: {e}"))
    }

    pub fn categories(&self) -> &[ApiCategory] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&ApiCategory> {
        self.categories.get(index)
    }

    pub fn endpoint(&self, category: usize, endpoint: usize) -> Option<&EndpointDescriptor> {
        self.categories.get(category)?.endpoints.get(endpoint)
    }

    /// Look up an endpoint by its catalog-wide identifier.
    pub fn find_endpoint(&self, id: &str) -> Option<(usize, &EndpointDescriptor)> {
        self.categories.iter().enumerate().find_map(|(index, category)| {
            category
                .endpoints
                .iter()
                .find(|endpoint| endpoint.id == id)
                .map(|endpoint| (index, endpoint))
        })
    }
}
