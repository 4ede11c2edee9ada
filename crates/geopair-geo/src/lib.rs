//! geopair Geo - Great-circle distances and nearest-neighbour search
//!
//! This crate handles coordinate validation, haversine distances, the
//! optional R-tree index and the nearest-pair search itself.

pub mod cancel;
pub mod distance;
pub mod index;
pub mod nearest;
pub mod summary;
pub mod validation;

pub use cancel::CancellationToken;
pub use distance::Sphere;
pub use index::PointIndex;
pub use nearest::{find_nearest_pairs, find_nearest_pairs_with, NearestOptions, ProgressFn};
pub use summary::{farther_than, summarize_pairs, summarize_points, PairSummary, PointSetSummary};
pub use validation::{
    count_invalid_points, ensure_searchable, validate_point, validate_points, ValidationResult,
};
