//! CSV point tables
//!
//! Input tables need a latitude and a longitude column. An id column and a
//! category label column are optional; without an id column each point is
//! identified by its zero-based row index.

use ::csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::ResultRow;
use crate::error::{GeopairError, Result};
use crate::models::{DistanceUnit, GeoPoint, NearestPairResult, PointId};

const ID_ALIASES: &[&str] = &["id"];
const LABEL_ALIASES: &[&str] = &["type", "label", "category"];
const LATITUDE_ALIASES: &[&str] = &["latitude", "lat"];
const LONGITUDE_ALIASES: &[&str] = &["longitude", "lon", "lng", "long"];

/// Which header names hold the point fields.
///
/// `None` means "detect": the first matching alias wins (case-insensitive).
/// A name given explicitly must be present in the header.
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    pub id: Option<String>,
    pub label: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl ColumnSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, name: impl Into<String>) -> Self {
        self.id = Some(name.into());
        self
    }

    pub fn label(mut self, name: impl Into<String>) -> Self {
        self.label = Some(name.into());
        self
    }

    pub fn latitude(mut self, name: impl Into<String>) -> Self {
        self.latitude = Some(name.into());
        self
    }

    pub fn longitude(mut self, name: impl Into<String>) -> Self {
        self.longitude = Some(name.into());
        self
    }
}

/// Column positions resolved against a concrete header row
#[derive(Debug, Clone, Copy)]
struct ResolvedColumns {
    id: Option<usize>,
    label: Option<usize>,
    latitude: usize,
    longitude: usize,
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn available(headers: &StringRecord) -> String {
    headers.iter().collect::<Vec<_>>().join(", ")
}

fn resolve_optional(
    headers: &StringRecord,
    explicit: Option<&str>,
    aliases: &[&str],
) -> Result<Option<usize>> {
    match explicit {
        Some(name) => find_column(headers, name).map(Some).ok_or_else(|| {
            GeopairError::MissingColumn { column: name.to_string(), available: available(headers) }
        }),
        None => Ok(aliases.iter().find_map(|alias| find_column(headers, alias))),
    }
}

fn resolve_required(
    headers: &StringRecord,
    explicit: Option<&str>,
    aliases: &[&str],
) -> Result<usize> {
    resolve_optional(headers, explicit, aliases)?.ok_or_else(|| GeopairError::MissingColumn {
        column: aliases[0].to_string(),
        available: available(headers),
    })
}

impl ColumnSpec {
    fn resolve(&self, headers: &StringRecord) -> Result<ResolvedColumns> {
        Ok(ResolvedColumns {
            id: resolve_optional(headers, self.id.as_deref(), ID_ALIASES)?,
            label: resolve_optional(headers, self.label.as_deref(), LABEL_ALIASES)?,
            latitude: resolve_required(headers, self.latitude.as_deref(), LATITUDE_ALIASES)?,
            longitude: resolve_required(headers, self.longitude.as_deref(), LONGITUDE_ALIASES)?,
        })
    }
}

/// A row that could not be turned into a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// 1-based line number in the file (the header is line 1)
    pub line: usize,
    pub point_id: String,
    pub reason: String,
}

/// Every parseable point of a table, plus the rows that were not
#[derive(Debug, Clone, Default)]
pub struct PointTable {
    pub points: Vec<GeoPoint>,
    pub issues: Vec<RowIssue>,
}

impl PointTable {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fail with the first issue, if any
    pub fn into_points(self) -> Result<Vec<GeoPoint>> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(GeopairError::InvalidCoordinate {
                point_id: issue.point_id,
                reason: format!("line {}: {}", issue.line, issue.reason),
            }),
            None => Ok(self.points),
        }
    }
}

fn parse_coordinate(record: &StringRecord, index: usize, name: &str) -> std::result::Result<f64, String> {
    let raw = record.get(index).unwrap_or("");
    if raw.is_empty() {
        return Err(format!("{} is empty", name));
    }
    raw.parse::<f64>().map_err(|_| format!("{} '{}' is not a number", name, raw))
}

fn parse_record(
    record: &StringRecord,
    columns: ResolvedColumns,
    row_index: usize,
) -> std::result::Result<GeoPoint, (String, String)> {
    let id = columns
        .id
        .and_then(|i| record.get(i))
        .filter(|s| !s.is_empty())
        .map(PointId::from)
        .unwrap_or_else(|| PointId::from_row(row_index));

    let latitude =
        parse_coordinate(record, columns.latitude, "latitude").map_err(|r| (id.to_string(), r))?;
    let longitude = parse_coordinate(record, columns.longitude, "longitude")
        .map_err(|r| (id.to_string(), r))?;

    let label = columns
        .label
        .and_then(|i| record.get(i))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(GeoPoint { id, label, latitude, longitude })
}

/// Read a point table, collecting unparseable rows instead of failing on them.
///
/// Structural problems (unreadable file, missing columns, ragged rows) still
/// fail the whole read.
pub fn read_point_table<R: Read>(reader: R, spec: &ColumnSpec) -> Result<PointTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = spec.resolve(&headers)?;

    let mut table = PointTable::default();
    for (row_index, record) in rdr.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(row_index + 2);
        match parse_record(&record, columns, row_index) {
            Ok(point) => table.points.push(point),
            Err((point_id, reason)) => table.issues.push(RowIssue { line, point_id, reason }),
        }
    }

    tracing::debug!(
        "Read {} points ({} rejected rows)",
        table.points.len(),
        table.issues.len()
    );
    Ok(table)
}

/// Read every point of a CSV file, failing on the first bad row
pub fn read_points(path: &Path, spec: &ColumnSpec) -> Result<Vec<GeoPoint>> {
    let file = open(path)?;
    read_point_table(file, spec)?.into_points()
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(GeopairError::InputNotFound { path: path.to_path_buf() });
    }
    Ok(File::open(path)?)
}

/// Write nearest-pair results as CSV
pub fn write_results_csv<W: Write>(
    writer: W,
    results: &[NearestPairResult],
    unit: DistanceUnit,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for result in results {
        wtr.serialize(ResultRow::from_result(result, unit))?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct PointRow<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    label: Option<&'a str>,
    latitude: f64,
    longitude: f64,
}

/// Write points in the layout [`read_points`] accepts by default
pub fn write_points<W: Write>(writer: W, points: &[GeoPoint]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    for point in points {
        wtr.serialize(PointRow {
            id: point.id.as_str(),
            label: point.label.as_deref(),
            latitude: point.latitude,
            longitude: point.longitude,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// A row of an address table awaiting geocoding
#[derive(Debug, Clone, PartialEq)]
pub struct AddressRecord {
    pub id: PointId,
    pub label: Option<String>,
    pub address: String,
}

/// Read an address table. `address_column` is required; id and label are
/// detected the same way as for point tables.
pub fn read_address_table<R: Read>(
    reader: R,
    address_column: &str,
    spec: &ColumnSpec,
) -> Result<Vec<AddressRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let address_index = resolve_required(&headers, Some(address_column), &[address_column])?;
    let id_index = resolve_optional(&headers, spec.id.as_deref(), ID_ALIASES)?;
    let label_index = resolve_optional(&headers, spec.label.as_deref(), LABEL_ALIASES)?;

    rdr.records()
        .enumerate()
        .map(|(row_index, record)| {
            let record = record?;
            let field = |index: Option<usize>| {
                index.and_then(|i| record.get(i)).filter(|s| !s.is_empty()).map(str::to_string)
            };
            Ok(AddressRecord {
                id: field(id_index)
                    .map(PointId::from)
                    .unwrap_or_else(|| PointId::from_row(row_index)),
                label: field(label_index),
                address: field(Some(address_index)).unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_default_columns() {
        let data = "id,type,latitude,longitude\n\
                    s1,Starbucks,40.7128,-74.0060\n\
                    s2,Dunkin,40.7130,-74.0070\n";

        let table = read_point_table(data.as_bytes(), &ColumnSpec::new()).unwrap();

        assert!(table.is_clean());
        assert_eq!(table.points.len(), 2);
        assert_eq!(table.points[0].id.as_str(), "s1");
        assert_eq!(table.points[0].label.as_deref(), Some("Starbucks"));
        assert_eq!(table.points[1].longitude, -74.0070);
    }

    #[test]
    fn test_row_index_ids_and_aliases() {
        let data = "Name,Lat,Lng\nA,1.0,2.0\nB,3.0,4.0\n";

        let table = read_point_table(data.as_bytes(), &ColumnSpec::new()).unwrap();

        assert_eq!(table.points[0].id.as_str(), "0");
        assert_eq!(table.points[1].id.as_str(), "1");
        assert!(table.points[0].label.is_none());
        assert_eq!(table.points[1].latitude, 3.0);
    }

    #[test]
    fn test_explicit_columns() {
        let data = "store,chain,y,x\nA,Starbucks,1.5,2.5\n";
        let spec = ColumnSpec::new().id("store").label("chain").latitude("y").longitude("x");

        let points = read_point_table(data.as_bytes(), &spec).unwrap().into_points().unwrap();

        assert_eq!(points[0].id.as_str(), "A");
        assert_eq!(points[0].label.as_deref(), Some("Starbucks"));
        assert_eq!(points[0].latitude, 1.5);
        assert_eq!(points[0].longitude, 2.5);
    }

    #[test]
    fn test_missing_explicit_column_fails() {
        let data = "id,latitude,longitude\na,1,2\n";
        let spec = ColumnSpec::new().label("chain");

        let err = read_point_table(data.as_bytes(), &spec).unwrap_err();
        assert!(matches!(err, GeopairError::MissingColumn { ref column, .. } if column == "chain"));
    }

    #[test]
    fn test_missing_latitude_column_fails() {
        let data = "id,longitude\na,2\n";
        let err = read_point_table(data.as_bytes(), &ColumnSpec::new()).unwrap_err();
        assert!(matches!(err, GeopairError::MissingColumn { ref column, .. } if column == "latitude"));
    }

    #[test]
    fn test_non_numeric_rows_are_collected() {
        let data = "id,latitude,longitude\na,1,2\nb,north,2\nc,3,\n";

        let table = read_point_table(data.as_bytes(), &ColumnSpec::new()).unwrap();

        assert_eq!(table.points.len(), 1);
        assert_eq!(table.issues.len(), 2);
        assert_eq!(table.issues[0].point_id, "b");
        assert_eq!(table.issues[0].line, 3);
        assert!(table.issues[0].reason.contains("not a number"));
        assert!(table.issues[1].reason.contains("longitude is empty"));

        let err = table.into_points().unwrap_err();
        assert!(matches!(err, GeopairError::InvalidCoordinate { ref point_id, .. } if point_id == "b"));
    }

    #[test]
    fn test_read_points_missing_file() {
        let err = read_points(Path::new("/nonexistent/points.csv"), &ColumnSpec::new()).unwrap_err();
        assert!(matches!(err, GeopairError::InputNotFound { .. }));
    }

    #[test]
    fn test_write_results_csv_header() {
        let a = GeoPoint::new("a", 0.0, 0.0);
        let b = GeoPoint::new("b", 0.0, 1.0).with_label("Starbucks");
        let results = vec![NearestPairResult::new(&a, &b, 1000.0), NearestPairResult::new(&b, &a, 1000.0)];

        let mut buf = Vec::new();
        write_results_csv(&mut buf, &results, DistanceUnit::Kilometers).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,label,latitude,longitude,nearest_id,nearest_latitude,nearest_longitude,distance,unit"
        );
        assert_eq!(lines.next().unwrap(), "a,,0.0,0.0,b,0.0,1.0,1.0,km");
        assert_eq!(lines.next().unwrap(), "b,Starbucks,0.0,1.0,a,0.0,0.0,1.0,km");
    }

    #[test]
    fn test_written_points_read_back() {
        let points = vec![
            GeoPoint::new("p1", 10.5, 20.25).with_label("cafe"),
            GeoPoint::new("p2", -3.0, 7.0),
        ];

        let mut buf = Vec::new();
        write_points(&mut buf, &points).unwrap();
        let back = read_point_table(buf.as_slice(), &ColumnSpec::new()).unwrap().into_points().unwrap();

        assert_eq!(back, points);
    }

    #[test]
    fn test_read_address_table() {
        let data = "id,type,address\nx,Starbucks,\"1 Main St, Springfield\"\n,Dunkin,2 Elm St\n";

        let rows = read_address_table(data.as_bytes(), "address", &ColumnSpec::new()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id.as_str(), "x");
        assert_eq!(rows[0].address, "1 Main St, Springfield");
        assert_eq!(rows[1].id.as_str(), "1");
        assert_eq!(rows[1].label.as_deref(), Some("Dunkin"));
    }
}
