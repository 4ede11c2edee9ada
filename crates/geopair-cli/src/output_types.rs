use chrono::{DateTime, Utc};
use geopair_core::formats::{ResultRow, RowIssue};
use geopair_geo::summary::Bounds;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output for nearest command
#[derive(Debug, Serialize)]
pub struct NearestOutput {
    pub input: String,
    pub generated_at: DateTime<Utc>,
    pub point_count: usize,
    pub strategy: String,
    pub parallel: bool,
    pub unit: String,
    pub min_distance: Option<f64>,
    pub reported_count: usize,
    pub summary: PairSummaryInfo,
    /// Absent when results were written to a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ResultRow>>,
}

/// Pair statistics in the reporting unit
#[derive(Debug, Serialize)]
pub struct PairSummaryInfo {
    pub closest_id: Option<String>,
    pub closest_distance: Option<f64>,
    pub most_isolated_id: Option<String>,
    pub most_isolated_distance: Option<f64>,
    pub mean_distance: Option<f64>,
    pub median_distance: Option<f64>,
    pub mutual_count: usize,
}

/// Output for inspect points command
#[derive(Debug, Serialize)]
pub struct InspectPointsOutput {
    pub input: String,
    pub row_count: usize,
    pub valid_count: usize,
    pub bounds: Option<Bounds>,
    pub centroid: Option<CentroidInfo>,
    pub labels: BTreeMap<String, usize>,
    pub issues: Vec<IssueInfo>,
}

#[derive(Debug, Serialize)]
pub struct CentroidInfo {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct IssueInfo {
    /// Line in the file, when the problem was found while reading
    pub line: Option<usize>,
    pub point_id: String,
    pub reason: String,
}

impl From<RowIssue> for IssueInfo {
    fn from(issue: RowIssue) -> Self {
        Self { line: Some(issue.line), point_id: issue.point_id, reason: issue.reason }
    }
}

/// Output for inspect config command
#[derive(Debug, Serialize)]
pub struct InspectConfigOutput {
    pub distance_unit: ConfigValue<String>,
    pub earth_radius_m: ConfigValue<String>,
    pub strategy: ConfigValue<String>,
    pub parallel: ConfigValue<String>,
    pub geocoder_api_key: ConfigValue<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: String,
}

/// Output for geocode command
#[derive(Debug, Serialize)]
pub struct GeocodeOutput {
    pub geocoder: String,
    pub resolved: Vec<ResolvedAddress>,
    pub unresolved: Vec<UnresolvedAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolvedAddress {
    pub id: String,
    pub label: Option<String>,
    pub address: String,
    pub matched_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct UnresolvedAddress {
    pub id: String,
    pub address: String,
}
