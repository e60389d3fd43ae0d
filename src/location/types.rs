//! Core types for the location subsystem.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// How a location was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationSource {
    /// Supplied by the caller in the request body.
    Manual,
    IpApi,
    IpInfo,
    /// Every lookup failed; the configured default was used.
    Fallback,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "Manual"),
            Self::IpApi => write!(f, "ipapi.co"),
            Self::IpInfo => write!(f, "ipinfo.io"),
            Self::Fallback => write!(f, "Default"),
        }
    }
}

/// A place as reported by a geolocation provider. All three parts are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: String,
    pub region: String,
    pub country: String,
}

impl Place {
    /// Build a place from optional provider fields, rejecting blanks.
    pub fn from_parts(
        city: Option<String>,
        region: Option<String>,
        country: Option<String>,
    ) -> Result<Self, LocationError> {
        Ok(Self {
            city: required(city, "city")?,
            region: required(region, "region")?,
            country: required(country, "country")?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, LocationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(LocationError::Incomplete(field))
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.city, self.region, self.country)
    }
}

/// The location string handed to the SERP provider, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// "City,Region,Country", or the caller's text verbatim for `Manual`.
    pub name: String,
    pub source: LocationSource,
}

impl ResolvedLocation {
    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: LocationSource::Manual,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Why a single lookup attempt produced nothing usable.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Lookup returned status {0}")]
    Status(u16),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error("Response missing '{0}'")]
    Incomplete(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_place_display() {
        let place = Place::from_parts(some("Lahore"), some("Punjab"), some("Pakistan")).unwrap();
        assert_eq!(place.to_string(), "Lahore,Punjab,Pakistan");
    }

    #[test]
    fn test_place_rejects_missing_region() {
        let err = Place::from_parts(some("Lahore"), None, some("Pakistan")).unwrap_err();
        assert!(matches!(err, LocationError::Incomplete("region")));
    }

    #[test]
    fn test_place_rejects_blank_city() {
        let err = Place::from_parts(some("  "), some("Punjab"), some("Pakistan")).unwrap_err();
        assert!(matches!(err, LocationError::Incomplete("city")));
    }

    #[test]
    fn test_manual_location_is_verbatim() {
        let loc = ResolvedLocation::manual("Austin, TX");
        assert_eq!(loc.as_str(), "Austin, TX");
        assert_eq!(loc.source, LocationSource::Manual);
    }
}
