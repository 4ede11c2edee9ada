//! R-tree over unit-sphere positions for nearest-neighbour queries

use geopair_core::models::GeoPoint;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::distance::{unit_vector, Sphere};
use crate::nearest::Candidate;

/// Chord slack on the unit sphere (about 6 µm on Earth). Candidates whose
/// chord is within this of the closest chord are re-ranked by haversine
/// distance, which absorbs rounding differences between the two metrics.
const CHORD_SLACK: f64 = 1e-12;

/// Indexed point with its position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPoint {
    /// Position in the input slice
    pub index: usize,

    /// Position on the unit sphere
    position: [f64; 3],
}

impl IndexedPoint {
    pub fn new(index: usize, point: &GeoPoint) -> Self {
        Self { index, position: unit_vector(point) }
    }
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Spatial index over a borrowed point set
pub struct PointIndex<'a> {
    points: &'a [GeoPoint],
    tree: RTree<IndexedPoint>,
}

impl<'a> PointIndex<'a> {
    /// Bulk-load an index over `points`
    pub fn build(points: &'a [GeoPoint]) -> Self {
        let indexed: Vec<IndexedPoint> =
            points.iter().enumerate().map(|(i, p)| IndexedPoint::new(i, p)).collect();
        Self { points, tree: RTree::bulk_load(indexed) }
    }

    /// Get the total number of points in the index
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest other point to the point at `index`.
    ///
    /// Gives the same answer as a full scan, including the tie-break on the
    /// lowest input position.
    pub fn nearest_to(&self, index: usize, sphere: &Sphere) -> Option<Candidate> {
        let source = &self.points[index];
        let query = unit_vector(source);

        let mut best: Option<Candidate> = None;
        let mut chord_limit = f64::INFINITY;

        for (entry, chord_2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if entry.index == index {
                continue;
            }
            if chord_2 > chord_limit {
                break;
            }
            if best.is_none() {
                let limit = chord_2.sqrt() + CHORD_SLACK;
                chord_limit = limit * limit;
            }

            let candidate = Candidate {
                index: entry.index,
                distance_m: sphere.haversine(source, &self.points[entry.index]),
            };
            best = Some(match best {
                Some(current) if current.beats(&candidate) => current,
                _ => candidate,
            });
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_len() {
        let points = vec![GeoPoint::new("a", 0.0, 0.0), GeoPoint::new("b", 1.0, 1.0)];
        let index = PointIndex::build(&points);
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_nearest_skips_self() {
        let points = vec![
            GeoPoint::new("a", 0.0, 0.0),
            GeoPoint::new("b", 0.0, 1.0),
            GeoPoint::new("c", 0.0, 10.0),
        ];
        let index = PointIndex::build(&points);
        let sphere = Sphere::earth();

        assert_eq!(index.nearest_to(0, &sphere).unwrap().index, 1);
        assert_eq!(index.nearest_to(1, &sphere).unwrap().index, 0);
        assert_eq!(index.nearest_to(2, &sphere).unwrap().index, 1);
    }

    #[test]
    fn test_tie_goes_to_lowest_position() {
        // b and c are both exactly 1 degree of longitude from a
        let points = vec![
            GeoPoint::new("c", 0.0, -1.0),
            GeoPoint::new("a", 0.0, 0.0),
            GeoPoint::new("b", 0.0, 1.0),
        ];
        let index = PointIndex::build(&points);

        assert_eq!(index.nearest_to(1, &Sphere::earth()).unwrap().index, 0);
    }

    #[test]
    fn test_single_point_has_no_neighbour() {
        let points = vec![GeoPoint::new("a", 0.0, 0.0)];
        let index = PointIndex::build(&points);
        assert!(index.nearest_to(0, &Sphere::earth()).is_none());
    }

    #[test]
    fn test_nearest_across_antimeridian() {
        let points = vec![
            GeoPoint::new("east", 0.0, 179.9),
            GeoPoint::new("west", 0.0, -179.9),
            GeoPoint::new("middle", 0.0, 170.0),
        ];
        let index = PointIndex::build(&points);
        assert_eq!(index.nearest_to(0, &Sphere::earth()).unwrap().index, 1);
    }
}
