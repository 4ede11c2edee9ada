//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod geocoder;

pub use geocoder::{GeocodeMatch, Geocoder, GeocoderConfig};
