//! Tabular input and output formats
//!
//! Points come in as CSV. Nearest-pair results go out as CSV, a JSON array,
//! or a GeoJSON FeatureCollection that a web map can draw directly.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{GeopairError, Result};
use crate::models::{DistanceUnit, NearestPairResult};

pub mod csv;
pub mod geojson;

pub use self::csv::{
    read_address_table, read_point_table, read_points, write_points, write_results_csv,
    AddressRecord, ColumnSpec, PointTable, RowIssue,
};
pub use self::geojson::{results_to_feature_collection, write_results_geojson};

/// Serialization format for nearest-pair results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResultFormat {
    #[default]
    Csv,
    Json,
    GeoJson,
}

impl ResultFormat {
    /// Get supported file extensions
    pub fn supported_extensions(&self) -> &[&str] {
        match self {
            ResultFormat::Csv => &["csv"],
            ResultFormat::Json => &["json"],
            ResultFormat::GeoJson => &["geojson"],
        }
    }

    /// Get human-readable format name
    pub fn format_name(&self) -> &str {
        match self {
            ResultFormat::Csv => "CSV",
            ResultFormat::Json => "JSON",
            ResultFormat::GeoJson => "GeoJSON",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        [ResultFormat::Csv, ResultFormat::Json, ResultFormat::GeoJson]
            .into_iter()
            .find(|format| format.supported_extensions().contains(&ext.as_str()))
    }
}

/// One output row: a point, its nearest neighbour, and the distance between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: String,
    pub label: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub nearest_id: String,
    pub nearest_latitude: f64,
    pub nearest_longitude: f64,
    pub distance: f64,
    pub unit: String,
}

impl ResultRow {
    pub fn from_result(result: &NearestPairResult, unit: DistanceUnit) -> Self {
        Self {
            id: result.source.id.to_string(),
            label: result.source.label.clone(),
            latitude: result.source.latitude,
            longitude: result.source.longitude,
            nearest_id: result.nearest_id.to_string(),
            nearest_latitude: result.nearest_latitude,
            nearest_longitude: result.nearest_longitude,
            distance: unit.from_meters(result.distance_m),
            unit: unit.symbol().to_string(),
        }
    }
}

/// Convert results into output rows expressed in `unit`
pub fn to_rows(results: &[NearestPairResult], unit: DistanceUnit) -> Vec<ResultRow> {
    results.iter().map(|r| ResultRow::from_result(r, unit)).collect()
}

/// Write results as a pretty-printed JSON array of rows
pub fn write_results_json<W: Write>(
    writer: W,
    results: &[NearestPairResult],
    unit: DistanceUnit,
) -> Result<()> {
    serde_json::to_writer_pretty(writer, &to_rows(results, unit))?;
    Ok(())
}

/// Write results to any writer in the given format
pub fn write_results<W: Write>(
    writer: W,
    results: &[NearestPairResult],
    unit: DistanceUnit,
    format: ResultFormat,
) -> Result<()> {
    match format {
        ResultFormat::Csv => write_results_csv(writer, results, unit),
        ResultFormat::Json => write_results_json(writer, results, unit),
        ResultFormat::GeoJson => write_results_geojson(writer, results, unit),
    }
}

/// Write results to a file, creating or truncating it
pub fn write_results_to_path(
    path: &Path,
    results: &[NearestPairResult],
    unit: DistanceUnit,
    format: ResultFormat,
) -> Result<()> {
    let file = File::create(path).map_err(GeopairError::Io)?;
    let mut writer = BufWriter::new(file);
    write_results(&mut writer, results, unit, format)?;
    writer.flush()?;
    tracing::debug!(
        "Wrote {} results to {} as {}",
        results.len(),
        path.display(),
        format.format_name()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn sample() -> Vec<NearestPairResult> {
        let a = GeoPoint::new("a", 40.0, -74.0).with_label("Starbucks");
        let b = GeoPoint::new("b", 40.001, -74.0);
        vec![NearestPairResult::new(&a, &b, 111.2), NearestPairResult::new(&b, &a, 111.2)]
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ResultFormat::from_path(Path::new("out.csv")), Some(ResultFormat::Csv));
        assert_eq!(ResultFormat::from_path(Path::new("out.JSON")), Some(ResultFormat::Json));
        assert_eq!(ResultFormat::from_path(Path::new("map.geojson")), Some(ResultFormat::GeoJson));
        assert_eq!(ResultFormat::from_path(Path::new("out.txt")), None);
        assert_eq!(ResultFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_row_converts_unit() {
        let rows = to_rows(&sample(), DistanceUnit::Kilometers);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].label.as_deref(), Some("Starbucks"));
        assert_eq!(rows[0].nearest_id, "b");
        assert!((rows[0].distance - 0.1112).abs() < 1e-12);
        assert_eq!(rows[0].unit, "km");
    }

    #[test]
    fn test_json_output_is_array_of_rows() {
        let mut buf = Vec::new();
        write_results(&mut buf, &sample(), DistanceUnit::Meters, ResultFormat::Json).unwrap();

        let parsed: Vec<ResultRow> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].id, "b");
        assert_eq!(parsed[1].nearest_id, "a");
    }
}
