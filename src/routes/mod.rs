//! HTTP routes for the explorer API
//!
//! Handlers take the shared state plus the already-collected request parts
//! and return `Result<ApiResponse>`. The dispatcher in
//! [`server::http`](crate::server::http) turns an `Err` into the JSON error
//! body via [`error_response`].

pub mod celestial;
pub mod content;
pub mod health;
pub mod missions;
pub mod planets;
pub mod progress;
pub mod quiz;
pub mod users;
pub mod worksheets;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

use crate::types::{ExplorerError, Result};

pub use health::health_check;

pub type ApiResponse = Response<Full<Bytes>>;

/// A request with its body already collected
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Bytes::from(serde_json::to_vec(body).unwrap_or_default());
        self
    }

    /// Non-empty value of a query parameter. Empty values count as absent.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let params = parse_query_params(self.query.as_deref().unwrap_or(""));
        params.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// Decode a query string into a map; malformed input yields an empty map
pub fn parse_query_params(query: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

// =============================================================================
// Response Helpers
// =============================================================================

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> ApiResponse {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

pub fn ok<T: Serialize>(body: &T) -> Result<ApiResponse> {
    Ok(json_response(StatusCode::OK, body))
}

pub fn created<T: Serialize>(body: &T) -> Result<ApiResponse> {
    Ok(json_response(StatusCode::CREATED, body))
}

/// JSON error body `{"message": ...}` with the error's status code
pub fn error_response(err: ExplorerError) -> ApiResponse {
    let status = err.status_code();
    json_response(status, &serde_json::json!({ "message": err.message() }))
}

pub fn cors_preflight() -> ApiResponse {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

pub fn not_found_response() -> ApiResponse {
    json_response(StatusCode::NOT_FOUND, &serde_json::json!({ "message": "Not Found" }))
}

pub fn method_not_allowed_response() -> ApiResponse {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({ "message": "Method not allowed" }),
    )
}

// =============================================================================
// Input Helpers
// =============================================================================

/// Parse a numeric path or query parameter; `message` is the 400 text
pub fn parse_id(raw: &str, message: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| ExplorerError::BadRequest(message.to_string()))
}

pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    if body.is_empty() {
        return Err(ExplorerError::BadRequest("Request body is required".into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ExplorerError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Map an unexpected failure onto a generic 500 message.
/// The detail goes to the log only.
pub fn failed(message: &'static str) -> impl FnOnce(ExplorerError) -> ExplorerError {
    move |err| {
        error!(error = %err, "{}", message);
        ExplorerError::Internal(message.to_string())
    }
}

/// Unwrap an optional lookup into 404 with `message`
pub fn found<T>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| ExplorerError::NotFound(message.to_string()))
}
