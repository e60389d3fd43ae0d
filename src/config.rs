//! Process-wide settings, read once at startup.
//!
//! Every field can come from a flag or from the environment. The API key is
//! optional here; its absence is only reported when a search is attempted.

use clap::Args;
use thiserror::Error;

pub const API_KEY_ENV: &str = "HASDATA_API_KEY";
pub const DEFAULT_SERP_BASE_URL: &str = "https://api.hasdata.com";
pub const DEFAULT_PRIMARY_GEO_URL: &str = "https://ipapi.co";
pub const DEFAULT_FALLBACK_GEO_URL: &str = "https://ipinfo.io";
pub const DEFAULT_LOCATION: &str = "Karachi,Sindh,Pakistan";

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// HasData API key, sent as the `x-api-key` header.
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the SERP provider.
    #[arg(long, global = true, env = "SERP_BASE_URL", default_value = DEFAULT_SERP_BASE_URL)]
    pub serp_base_url: String,

    /// Base URL of the primary geolocation service (ipapi.co format).
    #[arg(long, global = true, env = "PRIMARY_GEO_URL", default_value = DEFAULT_PRIMARY_GEO_URL)]
    pub primary_geo_url: String,

    /// Base URL of the fallback geolocation service (ipinfo.io format).
    #[arg(long, global = true, env = "FALLBACK_GEO_URL", default_value = DEFAULT_FALLBACK_GEO_URL)]
    pub fallback_geo_url: String,

    /// Location used when every geolocation service fails.
    #[arg(long, global = true, env = "DEFAULT_LOCATION", default_value = DEFAULT_LOCATION)]
    pub default_location: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            serp_base_url: DEFAULT_SERP_BASE_URL.into(),
            primary_geo_url: DEFAULT_PRIMARY_GEO_URL.into(),
            fallback_geo_url: DEFAULT_FALLBACK_GEO_URL.into(),
            default_location: DEFAULT_LOCATION.into(),
        }
    }
}

impl Config {
    /// Whether a usable API key is configured.
    pub fn has_api_key(&self) -> bool {
        usable_key(self.api_key.as_deref()).is_some()
    }
}

/// Returns the key only when it is present and not blank.
pub(crate) fn usable_key(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.trim().is_empty())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing HASDATA_API_KEY environment variable.")]
    MissingApiKey,
}
