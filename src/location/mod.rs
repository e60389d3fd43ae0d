//! Location detection for inbound requests.
//!
//! Maps a caller's IP address to a "City,Region,Country" string through an
//! ordered chain of geolocation services, ending in a fixed default.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{GeoProvider, IpApi, IpInfo};
pub use resolver::LocationResolver;
pub use types::{LocationError, LocationSource, Place, ResolvedLocation};
