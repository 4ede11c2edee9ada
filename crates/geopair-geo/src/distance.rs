//! Great-circle distance on a sphere

use geopair_core::config::MEAN_EARTH_RADIUS_M;
use geopair_core::models::GeoPoint;

/// Spherical Earth model used for distance computations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius_m: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::earth()
    }
}

impl Sphere {
    /// Sphere with the given radius in meters
    pub const fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    /// Sphere with the mean Earth radius
    pub const fn earth() -> Self {
        Self::new(MEAN_EARTH_RADIUS_M)
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Haversine distance in meters between two positions given in degrees
    pub fn haversine_degrees(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let phi1 = lat1.to_radians();
        let phi2 = lat2.to_radians();
        let half_dphi = (lat2 - lat1).to_radians() / 2.0;
        let half_dlambda = (lon2 - lon1).to_radians() / 2.0;

        let a = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
        // Rounding can push `a` just past 1 for antipodal points
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        self.radius_m * c
    }

    /// Haversine distance in meters between two points
    pub fn haversine(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        self.haversine_degrees(a.latitude, a.longitude, b.latitude, b.longitude)
    }
}

/// Position of a point on the unit sphere.
///
/// Straight-line (chord) distance between these vectors grows monotonically
/// with great-circle distance, so Euclidean nearest-neighbour queries over
/// them find great-circle nearest neighbours.
pub fn unit_vector(point: &GeoPoint) -> [f64; 3] {
    let phi = point.latitude.to_radians();
    let lambda = point.longitude.to_radians();
    [phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine, Point};

    fn relative_error(a: f64, b: f64) -> f64 {
        if b == 0.0 {
            a.abs()
        } else {
            ((a - b) / b).abs()
        }
    }

    #[test]
    fn test_matches_geo_haversine() {
        let sphere = Sphere::earth();
        let cases = [
            ((48.8566, 2.3522), (51.5074, -0.1276)),
            ((-8.5069, 115.2625), (-8.5069, 115.2725)),
            ((40.7128, -74.0060), (34.0522, -118.2437)),
            ((0.0, 0.0), (0.0, 10.0)),
        ];

        for ((lat1, lon1), (lat2, lon2)) in cases {
            let ours = sphere.haversine_degrees(lat1, lon1, lat2, lon2);
            let theirs = Haversine.distance(Point::new(lon1, lat1), Point::new(lon2, lat2));
            assert!(
                relative_error(ours, theirs) < 1e-9,
                "({lat1}, {lon1}) -> ({lat2}, {lon2}): {ours} vs {theirs}"
            );
        }
    }

    #[test]
    fn test_paris_london() {
        let paris = GeoPoint::new("paris", 48.8566, 2.3522);
        let london = GeoPoint::new("london", 51.5074, -0.1276);

        let distance = Sphere::earth().haversine(&paris, &london);

        // Approximately 344km
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new("p", -8.0, 115.0);
        assert_eq!(Sphere::earth().haversine(&p, &p), 0.0);
    }

    #[test]
    fn test_one_degree_on_equator() {
        let expected = MEAN_EARTH_RADIUS_M * 1f64.to_radians();
        let d = Sphere::earth().haversine_degrees(0.0, 0.0, 0.0, 1.0);
        assert!(relative_error(d, expected) < 1e-12);
    }

    #[test]
    fn test_distance_scales_with_radius() {
        let unit = Sphere::new(1.0).haversine_degrees(0.0, 0.0, 0.0, 90.0);
        assert!((unit - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_antipodes_do_not_produce_nan() {
        let d = Sphere::earth().haversine_degrees(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!(relative_error(d, std::f64::consts::PI * MEAN_EARTH_RADIUS_M) < 1e-12);
    }

    #[test]
    fn test_unit_vector_is_normalized() {
        let v = unit_vector(&GeoPoint::new("v", 37.5, -122.3));
        let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }
}
