//! HasData Google SERP client.

use super::types::{ProviderFailure, ProviderResult, SerpQuery};
use crate::config::{usable_key, Config, ConfigError};
use std::io::{self, Read};
use std::time::Duration;

pub const SERP_TIMEOUT: Duration = Duration::from_secs(10);
const SERP_PATH: &str = "/scrape/google/serp";

pub struct SerpClient {
    base_url: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl SerpClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        // No idle pool: each call's connection closes once its response is dropped.
        let agent = ureq::AgentBuilder::new()
            .timeout(SERP_TIMEOUT)
            .max_idle_connections(0)
            .build();
        Self {
            base_url: base_url.into(),
            api_key,
            agent,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.serp_base_url.clone(), config.api_key.clone())
    }

    /// Run one search. Only a missing API key is an `Err`; every upstream
    /// outcome, good or bad, is a `ProviderResult`.
    pub fn fetch(&self, query: &SerpQuery) -> Result<ProviderResult, ConfigError> {
        let api_key = usable_key(self.api_key.as_deref()).ok_or(ConfigError::MissingApiKey)?;

        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request_path(query));

        let result = self
            .agent
            .get(&url)
            .set("x-api-key", api_key)
            .set("Content-Type", "application/json")
            .call();

        let outcome = match result {
            Ok(response) if (200..300).contains(&response.status()) => match read_body(response) {
                Ok(body) => classify_body(body),
                Err(e) => ProviderResult::Failure(ProviderFailure::transport(e)),
            },
            Ok(response) => {
                let status = response.status();
                ProviderResult::Failure(http_failure(status, response))
            }
            Err(ureq::Error::Status(status, response)) => ProviderResult::Failure(http_failure(status, response)),
            Err(ureq::Error::Transport(t)) => ProviderResult::Failure(ProviderFailure::transport(t)),
        };

        if let ProviderResult::Failure(ref f) = outcome {
            tracing::warn!(status = ?f.status, error = %f.message, "SERP provider call failed");
        }

        Ok(outcome)
    }
}

/// Path and query string for the upstream call.
///
/// The location (`,`) and `tbs` (`:`) are escaped, as is `#` in the query
/// text, which would otherwise start a URL fragment. Everything else is
/// inserted as given.
pub fn request_path(q: &SerpQuery) -> String {
    format!(
        "{}?q={}&location={}&gl={}&tbs={}&tbm={}&deviceType={}&num={}",
        SERP_PATH,
        q.query.replace('#', "%23"),
        q.location.replace(',', "%2C"),
        q.country_code,
        q.recency_filter.replace(':', "%3A"),
        q.result_type,
        q.device_type,
        q.result_count,
    )
}

/// Read the whole body. Unlike `Response::into_string`, no size cap applies.
fn read_body(response: ureq::Response) -> io::Result<String> {
    let mut body = String::new();
    response.into_reader().read_to_string(&mut body)?;
    Ok(body)
}

fn http_failure(status: u16, response: ureq::Response) -> ProviderFailure {
    match read_body(response) {
        Ok(body) => ProviderFailure::http(status, body),
        Err(e) => ProviderFailure::http(status, format!("failed to read response body: {}", e)),
    }
}

fn classify_body(body: String) -> ProviderResult {
    match serde_json::from_str(&body) {
        Ok(value) => ProviderResult::Success(value),
        Err(_) => ProviderResult::RawSuccess(body),
    }
}
