//! Geocode command implementation

use crate::cli::GeocodeArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{GeocodeOutput, ResolvedAddress, UnresolvedAddress};
use anyhow::{Context, Result};
use geopair_core::formats::{read_address_table, write_points, ColumnSpec};
use geopair_core::geocoding::TableGeocoder;
use geopair_core::models::GeoPoint;
use geopair_core::ports::{Geocoder, GeocoderConfig};
use geopair_core::GeopairError;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tabled::Tabled;

pub async fn execute(args: GeocodeArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path)?;

    // Credentials are handed to the geocoder here and nowhere else
    let mut geocoder_config = GeocoderConfig::new();
    if let Some(key) = config.geocoder_api_key.value {
        geocoder_config = geocoder_config.with_api_key(key);
    }
    if let Some(region) = &args.region {
        geocoder_config = geocoder_config.with_region(region.clone());
    }

    let geocoder = TableGeocoder::from_path(&args.lookup, geocoder_config)
        .with_context(|| format!("Failed to load lookup table {}", args.lookup.display()))?;

    if !args.addresses.exists() {
        return Err(GeopairError::InputNotFound { path: args.addresses.clone() }.into());
    }
    let spec = ColumnSpec {
        id: args.id_column.clone(),
        label: args.label_column.clone(),
        ..ColumnSpec::default()
    };
    let file = File::open(&args.addresses)
        .with_context(|| format!("Failed to open {}", args.addresses.display()))?;
    let records = read_address_table(file, &args.address_column, &spec)
        .with_context(|| format!("Failed to read {}", args.addresses.display()))?;

    let (points, resolved, unresolved) = geocode_records(&geocoder, records).await?;
    tracing::info!(
        "Geocoded {} of {} addresses with {}",
        resolved.len(),
        resolved.len() + unresolved.len(),
        geocoder.name()
    );

    let mut geocode_output = GeocodeOutput {
        geocoder: geocoder.name().to_string(),
        resolved,
        unresolved,
        output_path: None,
    };

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_points(BufWriter::new(file), &points)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        output.success(format!("Wrote {} points to {}", points.len(), path.display()));
        geocode_output.output_path = Some(path.display().to_string());
    }

    if output.is_json() {
        output.result(geocode_output)?;
        return Ok(());
    }

    if args.output.is_none() {
        #[derive(Tabled)]
        struct ResolvedRow {
            #[tabled(rename = "Point")]
            id: String,
            #[tabled(rename = "Address")]
            address: String,
            #[tabled(rename = "Location")]
            location: String,
        }

        output.section("Resolved Addresses");
        output.table(
            geocode_output
                .resolved
                .iter()
                .map(|r| ResolvedRow {
                    id: r.id.clone(),
                    address: r.matched_address.clone(),
                    location: format!("{:.5}, {:.5}", r.latitude, r.longitude),
                })
                .collect(),
        );
    }

    for miss in &geocode_output.unresolved {
        output.warning(format!("No match for {} ({})", miss.id, miss.address));
    }

    Ok(())
}

async fn geocode_records(
    geocoder: &dyn Geocoder,
    records: Vec<geopair_core::formats::AddressRecord>,
) -> Result<(Vec<GeoPoint>, Vec<ResolvedAddress>, Vec<UnresolvedAddress>)> {
    let mut points = Vec::new();
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for record in records {
        let found = if record.address.is_empty() {
            None
        } else {
            geocoder.geocode(&record.address).await?
        };

        match found {
            Some(hit) => {
                let mut point = GeoPoint::new(record.id.clone(), hit.latitude, hit.longitude);
                point.label = record.label.clone();
                points.push(point);
                resolved.push(ResolvedAddress {
                    id: record.id.to_string(),
                    label: record.label,
                    address: record.address,
                    matched_address: hit.matched_address,
                    latitude: hit.latitude,
                    longitude: hit.longitude,
                });
            }
            None => unresolved.push(UnresolvedAddress {
                id: record.id.to_string(),
                address: record.address,
            }),
        }
    }

    Ok((points, resolved, unresolved))
}
