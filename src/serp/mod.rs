//! Upstream SERP provider (HasData Google SERP API).

pub mod client;
pub mod types;

pub use client::SerpClient;
pub use types::{ProviderFailure, ProviderResult, SearchRequest, SerpQuery};
