//! Geocoder backed by a local lookup table
//!
//! The table is a CSV with `address`, `latitude` and `longitude` columns and an
//! optional `region` column. Addresses are compared after normalization.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{GeopairError, Result};
use crate::ports::geocoder::{normalize_address, GeocodeMatch, Geocoder, GeocoderConfig};

#[derive(Debug, Deserialize)]
struct LookupRow {
    address: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Clone)]
struct LookupEntry {
    matched: GeocodeMatch,
    region: Option<String>,
}

/// Table-driven geocoder
pub struct TableGeocoder {
    config: GeocoderConfig,
    entries: HashMap<String, Vec<LookupEntry>>,
}

impl TableGeocoder {
    /// Build from any reader producing the lookup CSV
    pub fn from_reader<R: Read>(reader: R, config: GeocoderConfig) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries: HashMap<String, Vec<LookupEntry>> = HashMap::new();

        for row in rdr.deserialize() {
            let row: LookupRow = row?;
            entries.entry(normalize_address(&row.address)).or_default().push(LookupEntry {
                matched: GeocodeMatch {
                    latitude: row.latitude,
                    longitude: row.longitude,
                    matched_address: row.address,
                },
                region: row.region.filter(|r| !r.is_empty()),
            });
        }

        tracing::debug!("Loaded {} geocoder lookup addresses", entries.len());
        Ok(Self { config, entries })
    }

    /// Build from a lookup CSV file
    pub fn from_path(path: &Path, config: GeocoderConfig) -> Result<Self> {
        if !path.exists() {
            return Err(GeopairError::InputNotFound { path: path.to_path_buf() });
        }
        Self::from_reader(std::fs::File::open(path)?, config)
    }

    /// Number of distinct addresses known
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn region_matches(&self, entry: &LookupEntry) -> bool {
        match (&self.config.region, &entry.region) {
            (Some(wanted), Some(have)) => wanted.eq_ignore_ascii_case(have),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[async_trait]
impl Geocoder for TableGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeMatch>> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Err(GeopairError::Geocoding {
                address: address.to_string(),
                reason: "address is empty".to_string(),
            });
        }

        let found = self
            .entries
            .get(&key)
            .and_then(|candidates| candidates.iter().find(|e| self.region_matches(e)))
            .map(|e| e.matched.clone());

        if found.is_none() {
            tracing::debug!("No lookup entry for '{}'", address);
        }
        Ok(found)
    }

    fn name(&self) -> &str {
        "lookup-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "address,latitude,longitude,region\n\
                         \"1 Main St, Springfield\",39.80,-89.64,IL\n\
                         \"1 Main St, Springfield\",42.10,-72.59,MA\n\
                         \"350 5th Ave, New York\",40.7484,-73.9857,\n";

    #[tokio::test]
    async fn test_lookup_ignores_case_and_punctuation() {
        let geocoder = TableGeocoder::from_reader(TABLE.as_bytes(), GeocoderConfig::new()).unwrap();

        let hit = geocoder.geocode("350 5TH AVE new york").await.unwrap().unwrap();
        assert_eq!(hit.latitude, 40.7484);
        assert_eq!(hit.matched_address, "350 5th Ave, New York");
        assert_eq!(geocoder.len(), 2);
    }

    #[tokio::test]
    async fn test_region_disambiguates() {
        let config = GeocoderConfig::new().with_region("ma");
        let geocoder = TableGeocoder::from_reader(TABLE.as_bytes(), config).unwrap();

        let hit = geocoder.geocode("1 main st springfield").await.unwrap().unwrap();
        assert_eq!(hit.latitude, 42.10);

        // Entries without a region never match a region-restricted lookup
        assert!(geocoder.geocode("350 5th Ave, New York").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_and_empty_addresses() {
        let geocoder = TableGeocoder::from_reader(TABLE.as_bytes(), GeocoderConfig::new()).unwrap();

        assert!(geocoder.geocode("10 Nowhere Rd").await.unwrap().is_none());
        assert!(matches!(
            geocoder.geocode(" ,, ").await,
            Err(GeopairError::Geocoding { .. })
        ));
    }
}
