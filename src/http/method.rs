use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// HTTP method of a catalogued endpoint.
///
/// `WebSocket` appears in the catalog for realtime endpoints; when one is
/// executed over plain HTTP it is dispatched as a GET (the upgrade handshake
/// starts as one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    #[serde(rename = "WebSocket", alias = "WEBSOCKET", alias = "WS")]
    WebSocket,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::WebSocket,
    ];

    /// Whether non-path parameters travel in the query string.
    ///
    /// POST and PUT carry all non-path data in the body instead.
    pub fn carries_query(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Patch | HttpMethod::Delete)
    }

    /// Whether the raw body text is sent with the request.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::WebSocket => "WebSocket",
        };
        write!(f, "{label}")
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::WebSocket => reqwest::Method::GET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_gating_by_method() {
        assert!(HttpMethod::Get.carries_query());
        assert!(HttpMethod::Patch.carries_query());
        assert!(HttpMethod::Delete.carries_query());
        assert!(!HttpMethod::Post.carries_query());
        assert!(!HttpMethod::Put.carries_query());
        assert!(!HttpMethod::WebSocket.carries_query());
    }

    #[test]
    fn body_gating_by_method() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(HttpMethod::Patch.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
    }

    #[test]
    fn round_trips_wire_names() {
        let raw = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(raw, "\"PATCH\"");
        let ws: HttpMethod = serde_json::from_str("\"WebSocket\"").unwrap();
        assert_eq!(ws, HttpMethod::WebSocket);
    }
}
