//! SERP relay: forwards search queries to the HasData Google SERP API,
//! detecting the caller's location from their IP address when none is given.

pub mod config;
pub mod location;
pub mod relay;
pub mod serp;
pub mod server;
pub mod telemetry;

#[cfg(test)]
mod test_support;
