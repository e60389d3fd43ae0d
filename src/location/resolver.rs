//! Location resolver: orchestrates the fallback chain.
//!
//! Flow: ipapi.co → ipinfo.io → configured default. Never fails.

use super::providers::{GeoProvider, IpApi, IpInfo};
use super::types::{LocationSource, ResolvedLocation};
use crate::config::Config;
use std::net::IpAddr;

/// The location resolver with its ordered provider chain.
pub struct LocationResolver {
    providers: Vec<Box<dyn GeoProvider>>,
    default_location: String,
}

impl LocationResolver {
    pub fn new(providers: Vec<Box<dyn GeoProvider>>, default_location: impl Into<String>) -> Self {
        Self {
            providers,
            default_location: default_location.into(),
        }
    }

    /// The standard chain: primary then fallback service, from config.
    pub fn from_config(config: &Config) -> Self {
        let providers: Vec<Box<dyn GeoProvider>> = vec![
            Box::new(IpApi::new(config.primary_geo_url.clone())),
            Box::new(IpInfo::new(config.fallback_geo_url.clone())),
        ];
        Self::new(providers, config.default_location.clone())
    }

    /// Resolve an IP to "City,Region,Country". The first complete answer wins.
    pub fn resolve(&self, ip: IpAddr) -> ResolvedLocation {
        for provider in &self.providers {
            match provider.lookup(ip) {
                Ok(place) => {
                    return ResolvedLocation {
                        name: place.to_string(),
                        source: provider.source(),
                    };
                }
                Err(e) => {
                    tracing::debug!(%ip, provider = %provider.source(), error = %e, "geolocation attempt failed");
                }
            }
        }

        tracing::debug!(%ip, default = %self.default_location, "all geolocation attempts failed");
        ResolvedLocation {
            name: self.default_location.clone(),
            source: LocationSource::Fallback,
        }
    }
}
