//! Nearest command implementation

use crate::cli::NearestArgs;
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use crate::output_types::{NearestOutput, PairSummaryInfo};
use crate::progress;
use anyhow::{Context, Result};
use chrono::Utc;
use geopair_core::config::{validate_earth_radius, CliConfigOverrides};
use geopair_core::formats::{read_points, to_rows, write_results_to_path, ResultFormat};
use geopair_core::models::{Distance, DistanceUnit, NearestPairResult};
use geopair_geo::{
    farther_than, find_nearest_pairs_with, summarize_pairs, CancellationToken, NearestOptions,
    PairSummary, Sphere,
};
use std::sync::Arc;
use tabled::Tabled;

pub async fn execute(
    args: NearestArgs,
    config_path: Option<&std::path::Path>,
    output: &OutputWriter,
) -> Result<()> {
    let earth_radius_m = args.earth_radius.map(validate_earth_radius).transpose()?;
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides {
            distance_unit: args.unit.map(Into::into),
            earth_radius_m,
            strategy: args.strategy.map(Into::into),
            parallel: args.parallel.then_some(true),
        },
    )?;
    let unit = config.distance_unit.value;
    let strategy = config.strategy.value;
    let parallel = config.parallel.value;

    let spinner = progress::load_spinner("Loading points...", !output.is_json());
    let points = match read_points(&args.input, &args.columns.to_spec()) {
        Ok(points) => points,
        Err(error) => {
            progress::finish_error(&spinner, "Failed to load points");
            return Err(error).context(format!("Failed to load {}", args.input.display()));
        }
    };
    progress::finish_success(&spinner, &format!("Loaded {} points", points.len()));
    let point_count = points.len();

    let token = CancellationToken::new();
    let bar = progress::search_progress(point_count, !output.is_json());
    let options = {
        let bar = bar.clone();
        NearestOptions::new()
            .sphere(Sphere::new(config.earth_radius_m.value))
            .strategy(strategy)
            .parallel(parallel)
            .cancel_with(token.clone())
            .on_progress(Arc::new(move |done| bar.set_position(done as u64)))
    };

    let interrupt = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling search");
                token.cancel();
            }
        })
    };
    let search = tokio::task::spawn_blocking(move || find_nearest_pairs_with(&points, &options))
        .await
        .context("Nearest-neighbour search task failed")?;
    interrupt.abort();

    let results = match search {
        Ok(results) => {
            bar.finish_and_clear();
            results
        }
        Err(error) => {
            bar.abandon();
            return Err(error.into());
        }
    };

    let summary = summarize_pairs(&results);
    let reported = match args.min_distance {
        Some(threshold) => farther_than(&results, Distance::new(threshold, unit)),
        None => results,
    };

    let mut nearest_output = NearestOutput {
        input: args.input.display().to_string(),
        generated_at: Utc::now(),
        point_count,
        strategy: format!("{:?}", strategy),
        parallel,
        unit: unit.symbol().to_string(),
        min_distance: args.min_distance,
        reported_count: reported.len(),
        summary: summary_info(&summary, unit),
        output_path: None,
        results: None,
    };

    if let Some(path) = &args.output {
        let format = args
            .format
            .map(ResultFormat::from)
            .or_else(|| ResultFormat::from_path(path))
            .unwrap_or_default();
        write_results_to_path(path, &reported, unit, format)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        output.success(format!(
            "Wrote {} results to {} ({})",
            reported.len(),
            path.display(),
            format.format_name()
        ));
        nearest_output.output_path = Some(path.display().to_string());
    } else if !output.is_json() {
        print_results(&reported, unit, output);
    } else {
        nearest_output.results = Some(to_rows(&reported, unit));
    }

    if output.is_json() {
        output.result(nearest_output)?;
    } else {
        print_summary(&summary, point_count, unit, args.min_distance, reported.len(), output);
    }

    Ok(())
}

fn summary_info(summary: &PairSummary, unit: DistanceUnit) -> PairSummaryInfo {
    let convert = |meters: f64| unit.from_meters(meters);
    PairSummaryInfo {
        closest_id: summary.closest.as_ref().map(|r| r.source_id().to_string()),
        closest_distance: summary.closest.as_ref().map(|r| convert(r.distance_m)),
        most_isolated_id: summary.most_isolated.as_ref().map(|r| r.source_id().to_string()),
        most_isolated_distance: summary.most_isolated.as_ref().map(|r| convert(r.distance_m)),
        mean_distance: summary.mean_distance_m.map(convert),
        median_distance: summary.median_distance_m.map(convert),
        mutual_count: summary.mutual_count,
    }
}

fn print_results(results: &[NearestPairResult], unit: DistanceUnit, output: &OutputWriter) {
    #[derive(Tabled)]
    struct PairRow {
        #[tabled(rename = "Point")]
        id: String,
        #[tabled(rename = "Type")]
        label: String,
        #[tabled(rename = "Location")]
        location: String,
        #[tabled(rename = "Nearest")]
        nearest_id: String,
        #[tabled(rename = "Distance")]
        distance: String,
    }

    let rows: Vec<PairRow> = results
        .iter()
        .map(|r| PairRow {
            id: r.source.id.to_string(),
            label: r.source.label.clone().unwrap_or_default(),
            location: r.source.format_coordinates(),
            nearest_id: r.nearest_id.to_string(),
            distance: r.distance_in(unit).to_string(),
        })
        .collect();

    output.section("Nearest Neighbours");
    output.table(rows);
}

fn print_summary(
    summary: &PairSummary,
    point_count: usize,
    unit: DistanceUnit,
    min_distance: Option<f64>,
    reported: usize,
    output: &OutputWriter,
) {
    output.section("Summary");
    output.kv("Points", point_count);
    if let Some(closest) = &summary.closest {
        output.kv(
            "Closest pair",
            format!("{} → {} ({})", closest.source_id(), closest.nearest_id, closest.distance_in(unit)),
        );
    }
    if let Some(isolated) = &summary.most_isolated {
        output.kv(
            "Most isolated",
            format!("{} ({} to {})", isolated.source_id(), isolated.distance_in(unit), isolated.nearest_id),
        );
    }
    if let Some(median) = summary.median_distance_m {
        output.kv("Median distance", Distance::meters(median).convert(unit));
    }
    output.kv("Mutual pairs", format!("{} points", summary.mutual_count));
    if let Some(threshold) = min_distance {
        output.info(format!(
            "{} of {} points are more than {} from their nearest neighbour",
            reported,
            point_count,
            Distance::new(threshold, unit)
        ));
    }
}
