//! Request and result types for the SERP provider.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Inbound search request. Wire names follow the HasData parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Explicit "City,Region,Country"; auto-detected from the caller IP when absent.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "gl", alias = "country_code", default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    /// Google `tbs` time filter, e.g. `qdr:w` for the past week.
    #[serde(rename = "tbs", alias = "recency_filter", default = "default_recency_filter")]
    pub recency_filter: String,
    /// Google `tbm` vertical, e.g. `lcl` for local results.
    #[serde(rename = "tbm", alias = "result_type", default = "default_result_type")]
    pub result_type: String,
    #[serde(rename = "num", alias = "result_count", default = "default_result_count")]
    pub result_count: u32,
}

fn default_country_code() -> String {
    "pk".into()
}

fn default_device_type() -> String {
    "desktop".into()
}

fn default_recency_filter() -> String {
    "qdr:w".into()
}

fn default_result_type() -> String {
    "lcl".into()
}

fn default_result_count() -> u32 {
    50
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: None,
            country_code: default_country_code(),
            device_type: default_device_type(),
            recency_filter: default_recency_filter(),
            result_type: default_result_type(),
            result_count: default_result_count(),
        }
    }

    /// The caller-supplied location, if it is non-blank.
    pub fn explicit_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Pair the request with its resolved location for the upstream call.
    pub fn to_query(&self, location: &str) -> SerpQuery {
        SerpQuery {
            query: self.query.clone(),
            location: location.to_string(),
            country_code: self.country_code.clone(),
            device_type: self.device_type.clone(),
            recency_filter: self.recency_filter.clone(),
            result_type: self.result_type.clone(),
            result_count: self.result_count,
        }
    }
}

/// Fully resolved parameters for one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerpQuery {
    pub query: String,
    pub location: String,
    pub country_code: String,
    pub device_type: String,
    pub recency_filter: String,
    pub result_type: String,
    pub result_count: u32,
}

/// Outcome of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Success(Value),
    /// 2xx with a body that is not JSON.
    RawSuccess(String),
    Failure(ProviderFailure),
}

impl ProviderResult {
    /// The payload returned to the caller, or the failure to surface.
    pub fn into_payload(self) -> Result<Value, ProviderFailure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::RawSuccess(text) => Ok(json!({ "raw": text })),
            Self::Failure(failure) => Err(failure),
        }
    }
}

/// Upstream failure. Serializes as `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip)]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ProviderFailure {
    pub fn http(status: u16, body: String) -> Self {
        Self {
            message: format!("API returned status {}", status),
            status: Some(status),
            details: Some(body),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Request failed: {}", err),
            status: None,
            details: None,
        }
    }
}
