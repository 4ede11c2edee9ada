use geopair_core::error::{GeopairError, Result};
use geopair_core::models::GeoPoint;
use std::collections::HashSet;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub point_id: String,
    pub kind: ValidationErrorKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    InvalidCoordinate,
    DuplicateId,
}

impl ValidationError {
    fn into_error(self) -> GeopairError {
        match self.kind {
            ValidationErrorKind::InvalidCoordinate => {
                GeopairError::InvalidCoordinate { point_id: self.point_id, reason: self.reason }
            }
            ValidationErrorKind::DuplicateId => GeopairError::DuplicateId { point_id: self.point_id },
        }
    }
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, point_id: &str, kind: ValidationErrorKind, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { point_id: point_id.to_string(), kind, reason });
    }

    fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    /// Convert the first error into a `GeopairError`
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error.into_error()),
            None => Ok(()),
        }
    }
}

/// Validate the coordinates of a single point
pub fn validate_point(point: &GeoPoint) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let id = point.id.as_str();

    if !point.latitude.is_finite() {
        result.add_error(
            id,
            ValidationErrorKind::InvalidCoordinate,
            format!("latitude {} is not a finite number", point.latitude),
        );
    } else if !(-90.0..=90.0).contains(&point.latitude) {
        result.add_error(
            id,
            ValidationErrorKind::InvalidCoordinate,
            format!("latitude {} is outside [-90, 90]", point.latitude),
        );
    }

    if !point.longitude.is_finite() {
        result.add_error(
            id,
            ValidationErrorKind::InvalidCoordinate,
            format!("longitude {} is not a finite number", point.longitude),
        );
    } else if !(-180.0..=180.0).contains(&point.longitude) {
        result.add_error(
            id,
            ValidationErrorKind::InvalidCoordinate,
            format!("longitude {} is outside [-180, 180]", point.longitude),
        );
    }

    result
}

/// Validate every point and check that identifiers are unique.
///
/// Collects all problems rather than stopping at the first one.
pub fn validate_points(points: &[GeoPoint]) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let mut seen = HashSet::with_capacity(points.len());

    for point in points {
        result.merge(validate_point(point));

        if !seen.insert(point.id.as_str()) {
            result.add_error(
                point.id.as_str(),
                ValidationErrorKind::DuplicateId,
                format!("identifier '{}' appears more than once", point.id),
            );
        }
    }

    result
}

/// Check that a point set can go through a nearest-neighbour search.
///
/// Fails with `EmptyInput` for fewer than two points, then with the first
/// `InvalidCoordinate` or `DuplicateId` in input order.
pub fn ensure_searchable(points: &[GeoPoint]) -> Result<()> {
    if points.len() < 2 {
        return Err(GeopairError::EmptyInput { count: points.len() });
    }
    validate_points(points).into_result()
}

/// Count points with invalid coordinates
pub fn count_invalid_points(points: &[GeoPoint]) -> usize {
    points.iter().filter(|p| !validate_point(p).is_valid).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        assert!(validate_point(&GeoPoint::new("a", 90.0, -180.0)).is_valid);
        assert!(validate_point(&GeoPoint::new("b", -90.0, 180.0)).is_valid);
    }

    #[test]
    fn test_out_of_range_latitude() {
        let result = validate_point(&GeoPoint::new("a", 200.0, 0.0));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].reason.contains("latitude 200"));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let result = validate_point(&GeoPoint::new("a", f64::NAN, f64::INFINITY));
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(|e| e.kind == ValidationErrorKind::InvalidCoordinate));
    }

    #[test]
    fn test_duplicate_ids_are_reported() {
        let points = vec![
            GeoPoint::new("a", 0.0, 0.0),
            GeoPoint::new("b", 0.0, 1.0),
            GeoPoint::new("a", 0.0, 2.0),
        ];
        let result = validate_points(&points);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::DuplicateId);

        let err = ensure_searchable(&points).unwrap_err();
        assert!(matches!(err, GeopairError::DuplicateId { ref point_id } if point_id == "a"));
    }

    #[test]
    fn test_collects_every_problem() {
        let points = vec![
            GeoPoint::new("a", 95.0, 0.0),
            GeoPoint::new("b", 0.0, 0.0),
            GeoPoint::new("c", 0.0, -200.0),
        ];
        let result = validate_points(&points);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(count_invalid_points(&points), 2);
    }

    #[test]
    fn test_ensure_searchable_checks_count_first() {
        let err = ensure_searchable(&[GeoPoint::new("a", 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeopairError::EmptyInput { count: 1 }));

        let err = ensure_searchable(&[]).unwrap_err();
        assert!(matches!(err, GeopairError::EmptyInput { count: 0 }));
    }
}
