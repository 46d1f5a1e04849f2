use std::time::{Duration, Instant};

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use crate::config::Config;

use super::method::HttpMethod;
use super::response::TestResponse;

/// Upper bound on one request, dispatch to completion.
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Issue exactly one request and normalize the outcome.
///
/// Never returns an error: transport failures, timeouts, and locally invalid
/// headers all become a `TestResponse` with status 0 and `error` set, so the
/// caller records every outcome the same way.
pub async fn execute(
    config: &Config,
    method: HttpMethod,
    url: &str,
    headers: &IndexMap<String, String>,
    body: Option<&Value>,
) -> TestResponse {
    execute_with_timeout(config, method, url, headers, body, REQUEST_TIMEOUT_MS).await
}

pub async fn execute_with_timeout(
    config: &Config,
    method: HttpMethod,
    url: &str,
    headers: &IndexMap<String, String>,
    body: Option<&Value>,
    timeout_ms: u64,
) -> TestResponse {
    let started = Instant::now();

    let header_map = match build_headers(config, headers) {
        Ok(header_map) => header_map,
        Err(message) => return TestResponse::transport_error(message, elapsed_ms(started)),
    };

    let client = reqwest::Client::new();
    let mut builder = client
        .request(method.into(), url)
        .headers(header_map)
        .timeout(Duration::from_millis(timeout_ms));

    if let Some(body) = body {
        builder = builder.body(body.to_string());
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(err) => {
            return TestResponse::transport_error(format!("Request failed: {err}"), elapsed_ms(started));
        }
    };

    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();

    let mut response_headers = IndexMap::new();
    for (name, value) in response.headers() {
        response_headers.insert(
            name.to_string(),
            value.to_str().unwrap_or_default().to_string(),
        );
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            return TestResponse::transport_error(
                format!("Failed to read response: {err}"),
                elapsed_ms(started),
            );
        }
    };
    let duration_ms = elapsed_ms(started);

    TestResponse {
        status: status.as_u16(),
        status_text,
        body: parse_body(&bytes),
        headers: response_headers,
        duration_ms,
        error: None,
    }
}

/// Merge caller headers with the credential headers derived from config.
///
/// `apikey` and `Authorization` always come from the current config so stale
/// values cached on a request from a previous selection cannot leak through.
fn build_headers(config: &Config, headers: &IndexMap<String, String>) -> Result<HeaderMap, String> {
    let mut header_map = HeaderMap::new();

    for (name, value) in headers {
        if name.is_empty() {
            continue;
        }
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| format!("Invalid header name `{name}`: {err}"))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| format!("Invalid header value for `{name}`: {err}"))?;
        header_map.insert(header_name, header_value);
    }

    let api_key = HeaderValue::from_str(&config.api_key)
        .map_err(|err| format!("Invalid API key: {err}"))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|err| format!("Invalid API key: {err}"))?;
    header_map.insert(HeaderName::from_static("apikey"), api_key);
    header_map.insert(AUTHORIZATION, bearer);

    Ok(header_map)
}

/// Response bodies are JSON when the server says so and plain text otherwise;
/// keep both as a JSON value, Null when empty.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
