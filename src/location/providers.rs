//! IP geolocation providers: ipapi.co (primary) and ipinfo.io (fallback).

use super::types::{LocationError, LocationSource, Place};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Per-lookup timeout for geolocation services.
pub const GEO_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("SerpRelay/", env!("CARGO_PKG_VERSION"));

/// A service that maps an IP address to a place.
pub trait GeoProvider: Send + Sync {
    fn source(&self) -> LocationSource;

    fn lookup(&self, ip: IpAddr) -> Result<Place, LocationError>;
}

/// No idle pool: a lookup's connection closes once its response is dropped.
fn geo_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(GEO_TIMEOUT)
        .max_idle_connections(0)
        .build()
}

fn get_json<T: DeserializeOwned>(agent: &ureq::Agent, url: &str) -> Result<T, LocationError> {
    let response = agent
        .get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => LocationError::Status(code),
            ureq::Error::Transport(t) => LocationError::Network(t.to_string()),
        })?;

    response
        .into_json()
        .map_err(|e| LocationError::InvalidResponse(e.to_string()))
}

// ─── ipapi.co ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct IpApiResult {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
}

/// `GET {base}/{ip}/json/`, reading `city`, `region` and `country_name`.
pub struct IpApi {
    base_url: String,
    agent: ureq::Agent,
}

impl IpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: geo_agent(),
        }
    }
}

impl GeoProvider for IpApi {
    fn source(&self) -> LocationSource {
        LocationSource::IpApi
    }

    fn lookup(&self, ip: IpAddr) -> Result<Place, LocationError> {
        let url = format!("{}/{}/json/", self.base_url.trim_end_matches('/'), ip);
        let r: IpApiResult = get_json(&self.agent, &url)?;
        Place::from_parts(r.city, r.region, r.country_name)
    }
}

// ─── ipinfo.io ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct IpInfoResult {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
}

/// `GET {base}/{ip}/json`, reading `city`, `region` and `country`.
pub struct IpInfo {
    base_url: String,
    agent: ureq::Agent,
}

impl IpInfo {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            agent: geo_agent(),
        }
    }
}

impl GeoProvider for IpInfo {
    fn source(&self) -> LocationSource {
        LocationSource::IpInfo
    }

    fn lookup(&self, ip: IpAddr) -> Result<Place, LocationError> {
        let url = format!("{}/{}/json", self.base_url.trim_end_matches('/'), ip);
        let r: IpInfoResult = get_json(&self.agent, &url)?;
        Place::from_parts(r.city, r.region, r.country)
    }
}
