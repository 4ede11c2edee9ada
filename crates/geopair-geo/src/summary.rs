//! Summaries of point sets and nearest-pair results

use geo::{BoundingRect, Centroid, MultiPoint, Point};
use geopair_core::models::{Distance, GeoPoint, NearestPairResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Bounding box in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

/// Overview of a point set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSetSummary {
    pub count: usize,
    pub bounds: Option<Bounds>,
    /// Planar centroid as `(latitude, longitude)`
    pub centroid: Option<(f64, f64)>,
    /// Number of points per category label
    pub labels: BTreeMap<String, usize>,
}

fn to_multi_point(points: &[GeoPoint]) -> MultiPoint {
    points.iter().map(|p| Point::new(p.longitude, p.latitude)).collect::<Vec<_>>().into()
}

/// Summarize a point set. Only finite coordinates contribute to the
/// bounding box and centroid.
pub fn summarize_points(points: &[GeoPoint]) -> PointSetSummary {
    let finite: Vec<GeoPoint> = points
        .iter()
        .filter(|p| p.latitude.is_finite() && p.longitude.is_finite())
        .cloned()
        .collect();
    let multi_point = to_multi_point(&finite);

    let bounds = multi_point.bounding_rect().map(|rect| Bounds {
        min_latitude: rect.min().y,
        min_longitude: rect.min().x,
        max_latitude: rect.max().y,
        max_longitude: rect.max().x,
    });
    let centroid = multi_point.centroid().map(|c| (c.y(), c.x()));

    let mut labels = BTreeMap::new();
    for point in points {
        if let Some(label) = &point.label {
            *labels.entry(label.clone()).or_insert(0) += 1;
        }
    }

    PointSetSummary { count: points.len(), bounds, centroid, labels }
}

/// Overview of nearest-pair results, distances in meters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub count: usize,
    /// Result with the smallest distance
    pub closest: Option<NearestPairResult>,
    /// Result with the largest distance: the point farthest from any other
    pub most_isolated: Option<NearestPairResult>,
    pub mean_distance_m: Option<f64>,
    pub median_distance_m: Option<f64>,
    /// Number of points whose nearest neighbour has them as nearest neighbour too
    pub mutual_count: usize,
}

/// Summarize nearest-pair results
pub fn summarize_pairs(results: &[NearestPairResult]) -> PairSummary {
    let closest = results
        .iter()
        .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
        .cloned();
    let most_isolated = results
        .iter()
        .max_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
        .cloned();

    let mut distances: Vec<f64> = results.iter().map(|r| r.distance_m).collect();
    distances.sort_by(f64::total_cmp);

    let mean_distance_m = if distances.is_empty() {
        None
    } else {
        Some(distances.iter().sum::<f64>() / distances.len() as f64)
    };

    let median_distance_m = match distances.len() {
        0 => None,
        n if n % 2 == 1 => Some(distances[n / 2]),
        n => Some((distances[n / 2 - 1] + distances[n / 2]) / 2.0),
    };

    PairSummary {
        count: results.len(),
        closest,
        most_isolated,
        mean_distance_m,
        median_distance_m,
        mutual_count: count_mutual(results),
    }
}

fn count_mutual(results: &[NearestPairResult]) -> usize {
    let nearest_of: HashMap<&str, &str> = results
        .iter()
        .map(|r| (r.source_id().as_str(), r.nearest_id.as_str()))
        .collect();

    results
        .iter()
        .filter(|r| nearest_of.get(r.nearest_id.as_str()) == Some(&r.source_id().as_str()))
        .count()
}

/// Keep only results whose distance is strictly greater than `threshold`.
///
/// A presentation filter for picking out "interesting" pairs; it plays no
/// part in the search itself.
pub fn farther_than(results: &[NearestPairResult], threshold: Distance) -> Vec<NearestPairResult> {
    let limit_m = threshold.to_meters();
    results.iter().filter(|r| r.distance_m > limit_m).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nearest::find_nearest_pairs;
    use geopair_core::models::DistanceUnit;

    fn points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("A", 0.0, 0.0).with_label("Starbucks"),
            GeoPoint::new("B", 0.0, 1.0).with_label("Starbucks"),
            GeoPoint::new("C", 0.0, 10.0).with_label("Dunkin"),
        ]
    }

    #[test]
    fn test_point_summary() {
        let summary = summarize_points(&points());

        assert_eq!(summary.count, 3);
        let bounds = summary.bounds.unwrap();
        assert_eq!(bounds.min_longitude, 0.0);
        assert_eq!(bounds.max_longitude, 10.0);
        assert_eq!(bounds.min_latitude, 0.0);

        let (lat, lon) = summary.centroid.unwrap();
        assert!(lat.abs() < 1e-12);
        assert!((lon - 11.0 / 3.0).abs() < 1e-12);

        assert_eq!(summary.labels["Starbucks"], 2);
        assert_eq!(summary.labels["Dunkin"], 1);
    }

    #[test]
    fn test_point_summary_of_empty_set() {
        let summary = summarize_points(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.bounds.is_none());
        assert!(summary.centroid.is_none());
    }

    #[test]
    fn test_pair_summary() {
        let results = find_nearest_pairs(&points()).unwrap();
        let summary = summarize_pairs(&results);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.closest.unwrap().source_id().as_str(), "A");
        assert_eq!(summary.most_isolated.unwrap().source_id().as_str(), "C");
        // A and B point at each other; C points at B, which does not point back
        assert_eq!(summary.mutual_count, 2);
        assert_eq!(summary.median_distance_m, Some(results[0].distance_m));
    }

    #[test]
    fn test_pair_summary_of_nothing() {
        let summary = summarize_pairs(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.closest.is_none());
        assert!(summary.mean_distance_m.is_none());
        assert!(summary.median_distance_m.is_none());
    }

    #[test]
    fn test_farther_than_is_strict() {
        let a = GeoPoint::new("a", 0.0, 0.0);
        let b = GeoPoint::new("b", 0.0, 0.0001);
        let results = vec![
            NearestPairResult::new(&a, &b, 60.0 * 0.3048),
            NearestPairResult::new(&b, &a, 61.0 * 0.3048),
        ];

        let kept = farther_than(&results, Distance::new(60.0, DistanceUnit::Feet));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source_id().as_str(), "b");
    }
}
