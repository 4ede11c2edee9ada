use serde::{Deserialize, Serialize};

use super::point::{GeoPoint, PointId};
use super::units::{Distance, DistanceUnit};

/// Nearest neighbour of one point, with the great-circle distance between them.
///
/// `distance_m` is always in meters. Use [`NearestPairResult::distance_in`] to
/// report it in another unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestPairResult {
    /// The point the search started from
    pub source: GeoPoint,

    /// Identifier of the closest other point
    pub nearest_id: PointId,

    /// Latitude of the closest other point
    pub nearest_latitude: f64,

    /// Longitude of the closest other point
    pub nearest_longitude: f64,

    /// Great-circle distance in meters
    pub distance_m: f64,
}

impl NearestPairResult {
    /// Pair `source` with its nearest neighbour `nearest`
    pub fn new(source: &GeoPoint, nearest: &GeoPoint, distance_m: f64) -> Self {
        Self {
            source: source.clone(),
            nearest_id: nearest.id.clone(),
            nearest_latitude: nearest.latitude,
            nearest_longitude: nearest.longitude,
            distance_m,
        }
    }

    pub fn source_id(&self) -> &PointId {
        &self.source.id
    }

    /// Distance expressed in `unit`
    pub fn distance_in(&self, unit: DistanceUnit) -> Distance {
        Distance::meters(self.distance_m).convert(unit)
    }

    /// Nearest neighbour coordinates as `[longitude, latitude]`
    pub fn nearest_lon_lat(&self) -> [f64; 2] {
        [self.nearest_longitude, self.nearest_latitude]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_in_feet() {
        let a = GeoPoint::new("a", 0.0, 0.0);
        let b = GeoPoint::new("b", 0.0, 0.001);
        let pair = NearestPairResult::new(&a, &b, 30.48);

        assert_eq!(pair.source_id().as_str(), "a");
        assert_eq!(pair.nearest_id.as_str(), "b");
        assert!((pair.distance_in(DistanceUnit::Feet).value - 100.0).abs() < 1e-9);
        assert_eq!(pair.nearest_lon_lat(), [0.001, 0.0]);
    }
}
