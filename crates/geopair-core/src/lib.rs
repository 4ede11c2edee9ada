//! geopair Core - Domain models, configuration, and tabular formats
//!
//! This crate contains the point and result models, the layered
//! configuration, CSV/JSON/GeoJSON readers and writers, and the geocoding port.

pub mod config;
pub mod error;
pub mod formats;
pub mod geocoding;
pub mod models;
pub mod ports;

pub use error::{GeopairError, Result};
