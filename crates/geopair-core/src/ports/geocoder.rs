use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings handed to a geocoder when it is constructed.
///
/// Credentials travel here explicitly; adapters never read them from the
/// environment themselves.
#[derive(Debug, Clone, Default)]
pub struct GeocoderConfig {
    /// API key for services that need one
    pub api_key: Option<String>,

    /// Restrict matches to a region (state, country code, ...)
    pub region: Option<String>,
}

impl GeocoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// A resolved address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,

    /// Address as the geocoder knows it
    pub matched_address: String,
}

/// Port for converting postal addresses into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address. `Ok(None)` means the address is unknown.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeMatch>>;

    /// Human-readable geocoder name
    fn name(&self) -> &str;
}

/// Canonical form used to compare addresses: lowercase, punctuation dropped,
/// whitespace collapsed.
pub fn normalize_address(address: &str) -> String {
    address
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
