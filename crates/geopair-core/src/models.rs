pub mod pair;
pub mod point;
pub mod units;

pub use pair::NearestPairResult;
pub use point::{GeoPoint, PointId};
pub use units::{Distance, DistanceUnit, SearchStrategy};
