use crate::config::Config;
use crate::relay::Relay;

/// Shared, read-only per-process state.
pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            relay: Relay::from_config(config),
        }
    }
}
