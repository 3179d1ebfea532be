//! Request DTOs for the request cache
//!
//! Defines the inbound request descriptor handled by the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logical request: the remote API name plus its parameters and body.
///
/// Also the body of `POST /request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Remote API name, e.g. `getUsers`
    pub name: String,
    /// Query parameters
    #[serde(default)]
    pub params: Value,
    /// Request body
    #[serde(default)]
    pub body: Value,
}

impl ApiRequest {
    /// Creates a request with the given parameters and no body.
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        Self {
            name: name.into(),
            params,
            body: Value::Null,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Request name cannot be empty".to_string());
        }
        None
    }
}
