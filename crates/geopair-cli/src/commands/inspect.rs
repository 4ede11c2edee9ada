//! Inspect command implementation

use crate::cli::{InspectArgs, InspectPointsArgs, InspectTarget};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{
    CentroidInfo, ConfigValue, InspectConfigOutput, InspectPointsOutput, IssueInfo,
};
use anyhow::{Context, Result};
use geopair_core::config::ConfigSource;
use geopair_core::formats::read_point_table;
use geopair_core::GeopairError;
use geopair_geo::{count_invalid_points, summarize_points, validate_points};
use std::fs::File;
use std::path::Path;
use tabled::Tabled;

pub fn execute(args: InspectArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    match args.target {
        InspectTarget::Points(points_args) => inspect_points(points_args, output),
        InspectTarget::Config => inspect_config(config_path, output),
    }
}

/// Load a point file and report on it without failing at the first bad row
fn inspect_points(args: InspectPointsArgs, output: &OutputWriter) -> Result<()> {
    if !args.input.exists() {
        return Err(GeopairError::InputNotFound { path: args.input.clone() }.into());
    }
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let table = read_point_table(file, &args.columns.to_spec())
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let row_count = table.points.len() + table.issues.len();
    let validation = validate_points(&table.points);
    let summary = summarize_points(&table.points);

    let mut issues: Vec<IssueInfo> = table.issues.into_iter().map(IssueInfo::from).collect();
    issues.extend(validation.errors.into_iter().map(|e| IssueInfo {
        line: None,
        point_id: e.point_id,
        reason: e.reason,
    }));
    let valid_count = table.points.len() - count_invalid_points(&table.points);

    if output.is_json() {
        output.result(InspectPointsOutput {
            input: args.input.display().to_string(),
            row_count,
            valid_count,
            bounds: summary.bounds,
            centroid: summary
                .centroid
                .map(|(latitude, longitude)| CentroidInfo { latitude, longitude }),
            labels: summary.labels,
            issues,
        })?;
        return Ok(());
    }

    output.section("Point File");
    output.kv("Input", args.input.display());
    output.kv("Rows", row_count);
    output.kv("Valid points", valid_count);
    if let Some(bounds) = summary.bounds {
        output.kv(
            "Bounds",
            format!(
                "lat {:.5} to {:.5}, lon {:.5} to {:.5}",
                bounds.min_latitude, bounds.max_latitude, bounds.min_longitude, bounds.max_longitude
            ),
        );
    }
    if let Some((lat, lon)) = summary.centroid {
        output.kv("Centroid", format!("{:.5}, {:.5}", lat, lon));
    }

    if !summary.labels.is_empty() {
        #[derive(Tabled)]
        struct LabelRow {
            #[tabled(rename = "Type")]
            label: String,
            #[tabled(rename = "Points")]
            count: usize,
        }

        output.section("Types");
        output.table(
            summary
                .labels
                .into_iter()
                .map(|(label, count)| LabelRow { label, count })
                .collect(),
        );
    }

    if issues.is_empty() {
        output.success("No problems found");
    } else {
        #[derive(Tabled)]
        struct IssueRow {
            #[tabled(rename = "Line")]
            line: String,
            #[tabled(rename = "Point")]
            point_id: String,
            #[tabled(rename = "Problem")]
            reason: String,
        }

        output.warning(format!("{} problems found", issues.len()));
        output.section("Problems");
        output.table(
            issues
                .into_iter()
                .map(|issue| IssueRow {
                    line: issue.line.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string()),
                    point_id: issue.point_id,
                    reason: issue.reason,
                })
                .collect(),
        );
    }

    Ok(())
}

/// Inspect configuration values
fn inspect_config(config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let layered_config = load_config(config_path)?;
    let inspection_map = layered_config.to_inspection_map();

    if output.is_json() {
        let entry = |key: &str| {
            inspection_map
                .get(key)
                .map(|(value, source)| ConfigValue {
                    value: value.clone(),
                    source: format!("{:?}", source),
                })
                .unwrap_or_else(|| ConfigValue {
                    value: String::new(),
                    source: format!("{:?}", ConfigSource::Default),
                })
        };

        output.result(InspectConfigOutput {
            distance_unit: entry("distance_unit"),
            earth_radius_m: entry("earth_radius_m"),
            strategy: entry("strategy"),
            parallel: entry("parallel"),
            geocoder_api_key: entry("geocoder_api_key"),
        })?;
    } else {
        output.section("Configuration Values");

        #[derive(Tabled)]
        struct ConfigRow {
            #[tabled(rename = "Key")]
            key: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Source")]
            source: String,
        }

        let mut rows: Vec<ConfigRow> = inspection_map
            .into_iter()
            .map(|(key, (value, source))| ConfigRow {
                key,
                value,
                source: format!("{:?}", source),
            })
            .collect();

        // Sort by key for consistent output
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        output.table(rows);

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}
