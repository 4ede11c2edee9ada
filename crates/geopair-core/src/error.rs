//! Error types for geopair

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeopairError {
    // Point set errors
    #[error("Invalid coordinate for point {point_id}: {reason}")]
    InvalidCoordinate { point_id: String, reason: String },

    #[error("At least 2 points are required to find a nearest neighbour, got {count}")]
    EmptyInput { count: usize },

    #[error("Duplicate point identifier: {point_id}")]
    DuplicateId { point_id: String },

    #[error("Nearest-neighbour search was cancelled after {completed} of {total} points")]
    Cancelled { completed: usize, total: usize },

    // Tabular input errors
    #[error("Input file not found at {path}")]
    InputNotFound { path: PathBuf },

    #[error("Missing required column '{column}' (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("Parse error at row {row}: {reason}")]
    Parse { row: usize, reason: String },

    // Geocoding errors
    #[error("Geocoding failed for '{address}': {reason}")]
    Geocoding { address: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<csv::Error> for GeopairError {
    fn from(err: csv::Error) -> Self {
        let row = err.position().map(|p| p.line() as usize);
        match (row, err.kind()) {
            (_, csv::ErrorKind::Io(_)) => {
                GeopairError::Io(std::io::Error::other(err.to_string()))
            }
            (Some(row), _) => GeopairError::Parse { row, reason: err.to_string() },
            (None, _) => GeopairError::Serialization(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GeopairError {
    fn from(err: serde_json::Error) -> Self {
        GeopairError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeopairError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_point() {
        let err = GeopairError::InvalidCoordinate {
            point_id: "store-7".to_string(),
            reason: "latitude 200 is outside [-90, 90]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid coordinate for point store-7: latitude 200 is outside [-90, 90]"
        );

        let err = GeopairError::EmptyInput { count: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
