//! One request, end to end: pick a location, run the search, shape the reply.

use crate::config::{Config, ConfigError};
use crate::location::{LocationResolver, ResolvedLocation};
use crate::serp::{ProviderFailure, SearchRequest, SerpClient};
use serde::Serialize;
use serde_json::Value;
use std::net::IpAddr;
use thiserror::Error;

/// The combined reply for a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub detected_location: String,
    pub results: Value,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The provider answered with an error or could not be reached.
    #[error("{}", .0.message)]
    Upstream(ProviderFailure),
}

pub struct Relay {
    resolver: LocationResolver,
    client: SerpClient,
}

impl Relay {
    pub fn new(resolver: LocationResolver, client: SerpClient) -> Self {
        Self { resolver, client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(LocationResolver::from_config(config), SerpClient::from_config(config))
    }

    /// Use the caller's location if given, otherwise detect it from `caller_ip`.
    pub fn locate(&self, request: &SearchRequest, caller_ip: IpAddr) -> ResolvedLocation {
        match request.explicit_location() {
            Some(location) => ResolvedLocation::manual(location),
            None => self.resolver.resolve(caller_ip),
        }
    }

    /// Blocking: performs up to three outbound HTTP calls.
    pub fn handle(&self, request: &SearchRequest, caller_ip: IpAddr) -> Result<ResponseEnvelope, RelayError> {
        let location = self.locate(request, caller_ip);
        tracing::debug!(%caller_ip, location = %location, source = %location.source, "location selected");

        let results = self
            .client
            .fetch(&request.to_query(location.as_str()))?
            .into_payload()
            .map_err(RelayError::Upstream)?;

        Ok(ResponseEnvelope {
            detected_location: location.name,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{GeoProvider, LocationError, LocationSource, Place};
    use crate::test_support;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingGeo(Arc<AtomicUsize>);

    impl GeoProvider for CountingGeo {
        fn source(&self) -> LocationSource {
            LocationSource::IpApi
        }

        fn lookup(&self, _ip: IpAddr) -> Result<Place, LocationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Place::from_parts(Some("Lahore".into()), Some("Punjab".into()), Some("Pakistan".into()))
        }
    }

    async fn relay_against(status: StatusCode, body: &'static str, key: Option<&str>) -> (Arc<Relay>, Arc<AtomicUsize>) {
        let router = Router::new().route("/scrape/google/serp", get(move || async move { (status, body) }));
        let base = test_support::spawn(router).await;
        let calls = Arc::new(AtomicUsize::new(0));
        let providers: Vec<Box<dyn GeoProvider>> = vec![Box::new(CountingGeo(calls.clone()))];
        let resolver = LocationResolver::new(providers, "Karachi,Sindh,Pakistan");
        let client = SerpClient::new(base, key.map(str::to_string));
        (Arc::new(Relay::new(resolver, client)), calls)
    }

    async fn handle(relay: &Arc<Relay>, request: SearchRequest) -> Result<ResponseEnvelope, RelayError> {
        let relay = relay.clone();
        let ip: IpAddr = "198.51.100.20".parse().unwrap();
        tokio::task::spawn_blocking(move || relay.handle(&request, ip))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_detected_location_in_envelope() {
        let (relay, calls) = relay_against(StatusCode::OK, r#"{"localResults":[]}"#, Some("k")).await;

        let envelope = handle(&relay, SearchRequest::new("Exhibition")).await.unwrap();
        assert_eq!(envelope.detected_location, "Lahore,Punjab,Pakistan");
        assert_eq!(envelope.results, json!({"localResults": []}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_explicit_location_skips_resolver() {
        let (relay, calls) = relay_against(StatusCode::OK, r#"{"a":1}"#, Some("k")).await;

        let mut request = SearchRequest::new("Exhibition");
        request.location = Some("Austin,Texas,United States".into());
        let envelope = handle(&relay, request).await.unwrap();

        assert_eq!(envelope.detected_location, "Austin,Texas,United States");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upstream_failure_is_surfaced() {
        let (relay, _) = relay_against(StatusCode::SERVICE_UNAVAILABLE, "down", Some("k")).await;

        let err = handle(&relay, SearchRequest::new("Exhibition")).await.unwrap_err();
        let RelayError::Upstream(failure) = err else {
            panic!("expected an upstream error");
        };
        assert_eq!(failure.status, Some(503));
        assert_eq!(failure.details.as_deref(), Some("down"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_key_is_config_error() {
        let (relay, _) = relay_against(StatusCode::OK, "{}", None).await;

        let mut request = SearchRequest::new("Exhibition");
        request.location = Some("Lahore,Punjab,Pakistan".into());
        let err = handle(&relay, request).await.unwrap_err();
        assert!(matches!(err, RelayError::Config(ConfigError::MissingApiKey)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_identical_inputs_give_identical_envelopes() {
        let (relay, _) = relay_against(StatusCode::OK, "plain text", Some("k")).await;

        let first = handle(&relay, SearchRequest::new("Exhibition")).await.unwrap();
        let second = handle(&relay, SearchRequest::new("Exhibition")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.results, json!({"raw": "plain text"}));
    }
}
