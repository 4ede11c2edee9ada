//! GeoJSON writer for nearest-pair results
//!
//! Each result becomes a LineString feature from the point to its nearest
//! neighbour, so a map layer can draw the connections directly.

use ::geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use std::io::Write;

use crate::error::Result;
use crate::models::{DistanceUnit, NearestPairResult};

fn result_to_feature(result: &NearestPairResult, unit: DistanceUnit) -> Feature {
    let [lon, lat] = result.source.lon_lat();
    let [nearest_lon, nearest_lat] = result.nearest_lon_lat();
    let geometry = Geometry::new(Value::LineString(vec![
        vec![lon, lat],
        vec![nearest_lon, nearest_lat],
    ]));

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), JsonValue::from(result.source.id.to_string()));
    if let Some(label) = &result.source.label {
        properties.insert("label".to_string(), JsonValue::from(label.clone()));
    }
    properties.insert("nearest_id".to_string(), JsonValue::from(result.nearest_id.to_string()));
    properties.insert("distance".to_string(), JsonValue::from(unit.from_meters(result.distance_m)));
    properties.insert("unit".to_string(), JsonValue::from(unit.symbol()));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(Id::String(result.source.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build a FeatureCollection with one LineString per result
pub fn results_to_feature_collection(
    results: &[NearestPairResult],
    unit: DistanceUnit,
) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: results.iter().map(|r| result_to_feature(r, unit)).collect(),
        foreign_members: None,
    }
}

/// Write results as a GeoJSON FeatureCollection
pub fn write_results_geojson<W: Write>(
    writer: W,
    results: &[NearestPairResult],
    unit: DistanceUnit,
) -> Result<()> {
    let collection = results_to_feature_collection(results, unit);
    serde_json::to_writer_pretty(writer, &collection)?;
    Ok(())
}
