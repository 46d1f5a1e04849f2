//! # Client Configuration
//!
//! The base URL and credential every request is authenticated with. Loaded
//! from persisted state at startup when present; an incomplete config blocks
//! execution until the user fills it in.

use serde::{Deserialize, Serialize};

/// Connection settings for the target project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub supabase_url: String,
    pub api_key: String,
}

impl Config {
    pub fn new(supabase_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Both fields must be non-blank before any request may be dispatched.
    pub fn is_complete(&self) -> bool {
        !self.supabase_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_incomplete() {
        assert!(!Config::default().is_complete());
    }

    #[test]
    fn blank_fields_are_incomplete() {
        assert!(!Config::new("https://x.test", "   ").is_complete());
        assert!(!Config::new("", "key").is_complete());
        assert!(Config::new("https://x.test", "key").is_complete());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let raw = serde_json::to_string(&Config::new("https://x.test", "secret")).unwrap();
        assert!(raw.contains("\"supabaseUrl\""));
        assert!(raw.contains("\"apiKey\""));

        let parsed: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, Config::new("https://x.test", "secret"));
    }
}
