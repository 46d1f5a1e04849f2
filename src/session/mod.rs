//! # Test Session Controller
//!
//! Orchestrates one interactive testing session: the selected endpoint, the
//! request being edited, execution, and the persisted history. The UI layer
//! drives this type and renders its state; nothing here touches a screen.

use crate::builder::build_url;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::filter::validate_filter;
use crate::history::{History, HistoryEntry};
use crate::http::client;
use crate::http::request::TestRequest;
use crate::http::response::TestResponse;
use crate::storage::{ConfigStore, HistoryStore};

/// Lifecycle of a session.
///
/// `Configured` is reachable again from `Completed` and `Failed` through
/// re-selection or any parameter edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Configured,
    Executing,
    Completed,
    Failed,
}

pub struct Session<C: ConfigStore, H: HistoryStore> {
    catalog: Catalog,
    config: Config,
    state: SessionState,
    selected_category: Option<usize>,
    request: Option<TestRequest>,
    last_response: Option<TestResponse>,
    history: History,
    storage_error: Option<String>,
    config_store: C,
    history_store: H,
}

impl<C: ConfigStore, H: HistoryStore> Session<C, H> {
    /// Start a session, loading config and history from the injected stores.
    /// An absent config starts empty and blocks execution until set.
    pub fn new(catalog: Catalog, config_store: C, history_store: H) -> Result<Self, String> {
        let config = config_store.load()?.unwrap_or_default();
        let history = history_store.load()?;

        Ok(Self {
            catalog,
            config,
            state: SessionState::Idle,
            selected_category: None,
            request: None,
            last_response: None,
            history,
            storage_error: None,
            config_store,
            history_store,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn request(&self) -> Option<&TestRequest> {
        self.request.as_ref()
    }

    pub fn last_response(&self) -> Option<&TestResponse> {
        self.last_response.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected_category(&self) -> Option<usize> {
        self.selected_category
    }

    /// Error from the most recent persistence write, if it failed. Execution
    /// results are kept even when writing them to storage does not succeed.
    pub fn storage_error(&self) -> Option<&str> {
        self.storage_error.as_deref()
    }

    pub fn set_config(&mut self, config: Config) -> Result<(), String> {
        self.config_store.save(&config)?;
        self.config = config;
        Ok(())
    }

    /// Select a category, dropping any endpoint selection and the last
    /// response.
    pub fn select_category(&mut self, index: usize) -> Result<(), String> {
        if self.catalog.category(index).is_none() {
            return Err(format!("No such category: {index}"));
        }
        self.selected_category = Some(index);
        self.request = None;
        self.last_response = None;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Select an endpoint within the current category. Parameter values are
    /// reset, the body is seeded from the endpoint's example, and headers are
    /// seeded with a JSON content-type plus the current credential.
    pub fn select_endpoint(&mut self, index: usize) -> Result<(), String> {
        let category = self
            .selected_category
            .ok_or_else(|| "Select a category first".to_string())?;
        let endpoint = self
            .catalog
            .endpoint(category, index)
            .ok_or_else(|| format!("No such endpoint: {index}"))?;

        self.request = Some(TestRequest::new(endpoint, &self.config.api_key));
        self.last_response = None;
        self.state = SessionState::Configured;
        Ok(())
    }

    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), String> {
        let request = self.editable_request()?;
        request.set_param(name, value);
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<(), String> {
        let request = self.editable_request()?;
        request.body = body.into();
        Ok(())
    }

    pub fn set_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), String> {
        let request = self.editable_request()?;
        request.set_header(name, value);
        Ok(())
    }

    /// All local validation problems at once: config completeness, missing
    /// required parameters, and filter grammar violations. Empty when the
    /// request is ready to dispatch.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.config.is_complete() {
            errors.push("Configuration is incomplete: set the project URL and API key".to_string());
        }

        let Some(request) = &self.request else {
            errors.push("No endpoint selected".to_string());
            return errors;
        };

        for name in request.missing_required_params() {
            errors.push(format!("Missing required parameter `{name}`"));
        }

        if let Some(value) = request.param("filter") {
            if let Err(err) = validate_filter(value) {
                errors.push(err);
            }
        }

        errors
    }

    /// Build, dispatch, and record one request.
    ///
    /// Refuses locally (never reaching the network) on validation errors or
    /// an unparseable body for a body-bearing method. Every dispatched
    /// request ends up in history, transport failures included.
    pub async fn execute(&mut self) -> Result<TestResponse, String> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors.join("\n"));
        }

        // validate() guarantees a request is present.
        let request = self
            .request
            .clone()
            .ok_or_else(|| "No endpoint selected".to_string())?;

        let body = self.parse_body(&request)?;

        self.state = SessionState::Executing;

        let url = build_url(&request.endpoint, &request.params, &self.config.supabase_url);
        let response = client::execute(
            &self.config,
            request.endpoint.method,
            &url,
            &request.headers,
            body.as_ref(),
        )
        .await;

        self.history
            .push(HistoryEntry::new(request, response.clone()));
        self.storage_error = self.history_store.save(&self.history).err();

        self.state = if response.error.is_some() {
            SessionState::Failed
        } else {
            SessionState::Completed
        };
        self.last_response = Some(response.clone());

        Ok(response)
    }

    /// Restore a past request for re-editing. Callers re-select the entry's
    /// category first; this is the explicit second step and completes
    /// synchronously.
    pub fn apply_history_entry(&mut self, id: &str) -> Result<(), String> {
        let entry = self
            .history
            .find(id)
            .ok_or_else(|| format!("No history entry with id `{id}`"))?;

        if let Some((category, _)) = self.catalog.find_endpoint(&entry.request.endpoint.id) {
            self.selected_category = Some(category);
        }
        self.request = Some(entry.request.clone());
        self.last_response = None;
        self.state = SessionState::Configured;
        Ok(())
    }

    pub fn remove_history_entry(&mut self, id: &str) -> Result<(), String> {
        self.history.remove(id);
        self.history_store.save(&self.history)
    }

    pub fn clear_history(&mut self) -> Result<(), String> {
        self.history.clear();
        self.history_store.save(&self.history)
    }

    fn editable_request(&mut self) -> Result<&mut TestRequest, String> {
        // Any edit makes a completed session configurable again.
        if matches!(self.state, SessionState::Completed | SessionState::Failed) {
            self.state = SessionState::Configured;
        }
        self.request
            .as_mut()
            .ok_or_else(|| "Select an endpoint first".to_string())
    }

    fn parse_body(&self, request: &TestRequest) -> Result<Option<serde_json::Value>, String> {
        if !request.endpoint.method.carries_body() {
            return Ok(None);
        }
        let body = request.body.trim();
        if body.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| format!("Request body is not valid JSON: {e}"))
    }
}

/// Convenience alias for sessions backed by on-disk storage.
pub type FileSession = Session<crate::storage::FileStorage, crate::storage::FileStorage>;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{ApiCategory, EndpointDescriptor, ParameterDescriptor};
    use crate::http::method::HttpMethod;
    use crate::storage::MemoryStorage;

    fn parameter(name: &str, required: bool) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.into(),
            param_type: "string".into(),
            required,
            description: String::new(),
            example: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![ApiCategory {
            name: "Tables".into(),
            endpoints: vec![
                EndpointDescriptor {
                    id: "read-rows".into(),
                    method: HttpMethod::Get,
                    path: "/rest/v1/{table}".into(),
                    name: "Read rows".into(),
                    description: String::new(),
                    parameters: vec![
                        parameter("table", true),
                        parameter("select", false),
                        parameter("filter", false),
                    ],
                    example_body: None,
                },
                EndpointDescriptor {
                    id: "insert-row".into(),
                    method: HttpMethod::Post,
                    path: "/rest/v1/{table}".into(),
                    name: "Insert row".into(),
                    description: String::new(),
                    parameters: vec![parameter("table", true)],
                    example_body: Some("{ \"name\": \"Ada\" }".into()),
                },
            ],
        }])
    }

    fn configured_storage() -> Arc<MemoryStorage> {
        // Unreachable host: connection is refused before any data moves.
        Arc::new(MemoryStorage::with_config(Config::new(
            "http://127.0.0.1:1",
            "secret",
        )))
    }

    fn session(storage: &Arc<MemoryStorage>) -> Session<Arc<MemoryStorage>, Arc<MemoryStorage>> {
        Session::new(catalog(), Arc::clone(storage), Arc::clone(storage)).unwrap()
    }

    #[test]
    fn new_session_loads_persisted_config() {
        let storage = configured_storage();
        let session = session(&storage);
        assert!(session.config().is_complete());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.history().is_empty());
    }

    #[test]
    fn endpoint_selection_seeds_request() {
        let storage = configured_storage();
        let mut session = session(&storage);

        session.select_category(0).unwrap();
        session.select_endpoint(1).unwrap();

        assert_eq!(session.state(), SessionState::Configured);
        let request = session.request().unwrap();
        assert_eq!(request.body, "{ \"name\": \"Ada\" }");
        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(request.headers.get("apikey").unwrap(), "secret");
    }

    #[test]
    fn category_selection_resets_endpoint_and_response() {
        let storage = configured_storage();
        let mut session = session(&storage);

        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.select_category(0).unwrap();

        assert!(session.request().is_none());
        assert!(session.last_response().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn selecting_out_of_range_is_an_error() {
        let storage = configured_storage();
        let mut session = session(&storage);
        assert!(session.select_category(7).is_err());
        assert!(session.select_endpoint(0).is_err());
    }

    #[tokio::test]
    async fn execute_refused_while_unconfigured() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("table", "users").unwrap();

        let err = session.execute().await.unwrap_err();
        assert!(err.contains("Configuration is incomplete"));
        assert!(session.history().is_empty());
        assert_eq!(storage.history_len(), 0);
        assert_eq!(session.state(), SessionState::Configured);
    }

    #[tokio::test]
    async fn validation_errors_are_collected_together() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("filter", "name=John").unwrap();

        let errors = session.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("Missing required parameter `table`"));
        assert!(errors[1].contains("column=operator.value"));

        let err = session.execute().await.unwrap_err();
        assert!(err.contains("table"));
        assert!(err.contains("column=operator.value"));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn invalid_body_never_reaches_the_network() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(1).unwrap();
        session.set_parameter("table", "users").unwrap();
        session.set_body("{invalid").unwrap();

        let err = session.execute().await.unwrap_err();
        assert!(err.contains("not valid JSON"));
        assert!(session.history().is_empty());
        assert_eq!(storage.history_len(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_recorded_and_persisted() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("table", "users").unwrap();

        let response = session.execute().await.unwrap();
        assert_eq!(response.status, 0);
        assert!(response.error.is_some());
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.history().len(), 1);
        assert_eq!(storage.history_len(), 1);
        assert!(session.storage_error().is_none());
    }

    #[tokio::test]
    async fn edits_after_completion_return_to_configured() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("table", "users").unwrap();
        session.execute().await.unwrap();
        assert_eq!(session.state(), SessionState::Failed);

        session.set_parameter("select", "id").unwrap();
        assert_eq!(session.state(), SessionState::Configured);
    }

    #[tokio::test]
    async fn history_entry_can_be_reapplied() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("table", "users").unwrap();
        session.set_parameter("select", "id,name").unwrap();
        session.execute().await.unwrap();

        let id = session.history().entries()[0].id.clone();
        session.select_category(0).unwrap();
        assert!(session.request().is_none());

        session.apply_history_entry(&id).unwrap();
        assert_eq!(session.state(), SessionState::Configured);
        let request = session.request().unwrap();
        assert_eq!(request.param("table"), Some("users"));
        assert_eq!(request.param("select"), Some("id,name"));
        assert!(session.last_response().is_none());
    }

    #[tokio::test]
    async fn history_removal_and_clearing_persist() {
        let storage = configured_storage();
        let mut session = session(&storage);
        session.select_category(0).unwrap();
        session.select_endpoint(0).unwrap();
        session.set_parameter("table", "users").unwrap();
        session.execute().await.unwrap();
        session.execute().await.unwrap();
        assert_eq!(storage.history_len(), 2);

        let id = session.history().entries()[0].id.clone();
        session.remove_history_entry(&id).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(storage.history_len(), 1);

        // Idempotent on an absent id.
        session.remove_history_entry(&id).unwrap();
        assert_eq!(session.history().len(), 1);

        session.clear_history().unwrap();
        assert!(session.history().is_empty());
        assert_eq!(storage.history_len(), 0);

        // Clearing an empty store stays empty.
        session.clear_history().unwrap();
        assert!(session.history().is_empty());
    }

    #[test]
    fn set_config_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut session = session(&storage);
        assert!(!session.config().is_complete());

        session
            .set_config(Config::new("https://x.test", "secret"))
            .unwrap();
        assert!(session.config().is_complete());

        // A fresh session sees the saved config.
        let reloaded = Session::new(catalog(), Arc::clone(&storage), Arc::clone(&storage)).unwrap();
        assert!(reloaded.config().is_complete());
    }
}
