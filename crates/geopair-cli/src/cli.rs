use clap::{Args, Parser, Subcommand, ValueEnum};
use geopair_core::formats::{ColumnSpec, ResultFormat};
use geopair_core::models::{DistanceUnit, SearchStrategy};
use std::path::PathBuf;

/// geopair - Nearest-neighbour distances between geographic points
#[derive(Parser, Debug)]
#[command(name = "geopair")]
#[command(about = "Find the nearest neighbour of every point in a CSV file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geopair.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the nearest other point for every point in a file
    Nearest(NearestArgs),

    /// Inspect input files and configuration
    Inspect(InspectArgs),

    /// Resolve addresses to coordinates using a lookup table
    Geocode(GeocodeArgs),
}

/// Column selection shared by commands that read point tables
#[derive(Args, Debug, Clone, Default)]
pub struct ColumnArgs {
    /// Identifier column (defaults to `id`, else the row number)
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Category label column (defaults to `type`, `label` or `category`)
    #[arg(long, value_name = "NAME")]
    pub label_column: Option<String>,

    /// Latitude column (defaults to `latitude` or `lat`)
    #[arg(long, value_name = "NAME")]
    pub lat_column: Option<String>,

    /// Longitude column (defaults to `longitude`, `lon`, `lng` or `long`)
    #[arg(long, value_name = "NAME")]
    pub lon_column: Option<String>,
}

impl ColumnArgs {
    pub fn to_spec(&self) -> ColumnSpec {
        ColumnSpec {
            id: self.id_column.clone(),
            label: self.label_column.clone(),
            latitude: self.lat_column.clone(),
            longitude: self.lon_column.clone(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct NearestArgs {
    /// CSV file with one point per row
    pub input: PathBuf,

    /// Write results to this file instead of printing them
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output file format (detected from the output extension by default)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Unit for reported distances
    #[arg(long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Only report pairs farther apart than this, in the reporting unit
    #[arg(long, value_name = "DISTANCE")]
    pub min_distance: Option<f64>,

    /// Search strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Search points on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Sphere radius in meters
    #[arg(long, value_name = "METERS")]
    pub earth_radius: Option<f64>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[command(subcommand)]
    pub target: InspectTarget,
}

#[derive(Subcommand, Debug)]
pub enum InspectTarget {
    /// Load and validate a point file without searching it
    Points(InspectPointsArgs),

    /// Show configuration values and where they came from
    Config,
}

#[derive(Parser, Debug)]
pub struct InspectPointsArgs {
    /// CSV file with one point per row
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Parser, Debug)]
pub struct GeocodeArgs {
    /// CSV file with an address column
    pub addresses: PathBuf,

    /// Lookup table with address, latitude and longitude columns
    #[arg(long, value_name = "PATH")]
    pub lookup: PathBuf,

    /// Name of the address column
    #[arg(long, default_value = "address")]
    pub address_column: String,

    /// Only accept lookup entries for this region
    #[arg(long)]
    pub region: Option<String>,

    /// Write resolved points as CSV to this file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Identifier column (defaults to `id`, else the row number)
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Category label column (defaults to `type`, `label` or `category`)
    #[arg(long, value_name = "NAME")]
    pub label_column: Option<String>,
}

/// Distance unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    #[value(name = "m", alias = "meters")]
    Meters,
    #[value(name = "km", alias = "kilometers")]
    Kilometers,
    #[value(name = "mi", alias = "miles")]
    Miles,
    #[value(name = "ft", alias = "feet")]
    Feet,
}

impl From<UnitArg> for DistanceUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Meters => DistanceUnit::Meters,
            UnitArg::Kilometers => DistanceUnit::Kilometers,
            UnitArg::Miles => DistanceUnit::Miles,
            UnitArg::Feet => DistanceUnit::Feet,
        }
    }
}

/// Result file format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    #[value(name = "geojson")]
    GeoJson,
}

impl From<FormatArg> for ResultFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ResultFormat::Csv,
            FormatArg::Json => ResultFormat::Json,
            FormatArg::GeoJson => ResultFormat::GeoJson,
        }
    }
}

/// Search strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    BruteForce,
    Indexed,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::BruteForce => SearchStrategy::BruteForce,
            StrategyArg::Indexed => SearchStrategy::Indexed,
        }
    }
}
