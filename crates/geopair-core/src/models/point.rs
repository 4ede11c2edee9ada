use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a point within a point set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub String);

impl PointId {
    /// Identifier derived from a zero-based row index
    pub fn from_row(index: usize) -> Self {
        Self(index.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PointId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A labelled geographic point in WGS 84 decimal degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Unique identifier within the point set
    pub id: PointId,

    /// Optional category label (store type, chain name, ...)
    pub label: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new unlabelled point
    pub fn new(id: impl Into<PointId>, latitude: f64, longitude: f64) -> Self {
        Self { id: id.into(), label: None, latitude, longitude }
    }

    /// Attach a category label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Coordinates as `[longitude, latitude]`, the GeoJSON axis order
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Format location as coordinates string
    pub fn format_coordinates(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}
