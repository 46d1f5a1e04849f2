use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::EndpointDescriptor;

/// The mutable working request bound to one selected endpoint.
///
/// Parameter values keep their insertion order so the built query string is
/// deterministic. The body is raw editor text and may be invalid JSON right
/// up until execution, where it is parsed for body-bearing methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub endpoint: EndpointDescriptor,
    #[serde(default)]
    pub params: IndexMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl TestRequest {
    /// Fresh request for a newly selected endpoint: empty parameters, body
    /// seeded from the endpoint's example, headers seeded with a JSON
    /// content-type and the current credential.
    pub fn new(endpoint: &EndpointDescriptor, api_key: &str) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("apikey".to_string(), api_key.to_string());

        Self {
            endpoint: endpoint.clone(),
            params: IndexMap::new(),
            body: endpoint.example_body.clone().unwrap_or_default(),
            headers,
        }
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Names of required parameters whose value is missing or blank.
    pub fn missing_required_params(&self) -> Vec<&str> {
        self.endpoint
            .parameters
            .iter()
            .filter(|descriptor| descriptor.required)
            .filter(|descriptor| {
                self.params
                    .get(&descriptor.name)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|descriptor| descriptor.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterDescriptor;
    use crate::http::method::HttpMethod;

    fn endpoint() -> EndpointDescriptor {
        EndpointDescriptor {
            id: "insert-row".into(),
            method: HttpMethod::Post,
            path: "/rest/v1/{table}".into(),
            name: "Insert row".into(),
            description: String::new(),
            parameters: vec![
                ParameterDescriptor {
                    name: "table".into(),
                    param_type: "string".into(),
                    required: true,
                    description: String::new(),
                    example: None,
                },
                ParameterDescriptor {
                    name: "select".into(),
                    param_type: "string".into(),
                    required: false,
                    description: String::new(),
                    example: None,
                },
            ],
            example_body: Some("{ \"name\": \"Ada\" }".into()),
        }
    }

    #[test]
    fn new_request_seeds_body_and_headers() {
        let request = TestRequest::new(&endpoint(), "secret");
        assert_eq!(request.body, "{ \"name\": \"Ada\" }");
        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(request.headers.get("apikey").unwrap(), "secret");
        assert!(request.params.is_empty());
    }

    #[test]
    fn reports_missing_required_params() {
        let mut request = TestRequest::new(&endpoint(), "secret");
        assert_eq!(request.missing_required_params(), vec!["table"]);

        request.set_param("table", "   ");
        assert_eq!(request.missing_required_params(), vec!["table"]);

        request.set_param("table", "users");
        assert!(request.missing_required_params().is_empty());
    }

    #[test]
    fn params_keep_insertion_order() {
        let mut request = TestRequest::new(&endpoint(), "secret");
        request.set_param("b", "2");
        request.set_param("a", "1");
        let keys: Vec<&String> = request.params.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
