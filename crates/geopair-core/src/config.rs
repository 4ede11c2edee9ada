use crate::error::{GeopairError, Result};
use crate::models::{DistanceUnit, SearchStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Mean Earth radius in meters (IUGG / GRS80 mean radius)
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "geopair.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for geopair
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub distance_unit: ConfigValue<DistanceUnit>,
    pub earth_radius_m: ConfigValue<f64>,
    pub strategy: ConfigValue<SearchStrategy>,
    pub parallel: ConfigValue<bool>,
    pub geocoder_api_key: ConfigValue<Option<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            distance_unit: ConfigValue::new(DistanceUnit::Meters, ConfigSource::Default),
            earth_radius_m: ConfigValue::new(MEAN_EARTH_RADIUS_M, ConfigSource::Default),
            strategy: ConfigValue::new(SearchStrategy::BruteForce, ConfigSource::Default),
            parallel: ConfigValue::new(false, ConfigSource::Default),
            geocoder_api_key: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeopairError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeopairError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(unit) = file_config.distance_unit {
            self.distance_unit.update(parse_distance_unit(&unit)?, ConfigSource::File);
        }

        if let Some(radius) = file_config.earth_radius_m {
            self.earth_radius_m.update(validate_earth_radius(radius)?, ConfigSource::File);
        }

        if let Some(strategy) = file_config.strategy {
            self.strategy.update(parse_search_strategy(&strategy)?, ConfigSource::File);
        }

        if let Some(parallel) = file_config.parallel {
            self.parallel.update(parallel, ConfigSource::File);
        }

        if let Some(key) = file_config.geocoder_api_key {
            self.geocoder_api_key.update(Some(key), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the config file only if it exists
    pub fn load_from_file_if_exists<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            tracing::debug!("No config file at {}", path.as_ref().display());
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOPAIR_DISTANCE_UNIT
        if let Ok(unit_str) = env::var("GEOPAIR_DISTANCE_UNIT") {
            match parse_distance_unit(&unit_str) {
                Ok(unit) => self.distance_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPAIR_DISTANCE_UNIT value '{}': expected meters, kilometers, miles, or feet",
                    unit_str
                ),
            }
        }

        // GEOPAIR_EARTH_RADIUS_M
        if let Ok(radius_str) = env::var("GEOPAIR_EARTH_RADIUS_M") {
            match radius_str.parse::<f64>().ok().map(validate_earth_radius) {
                Some(Ok(radius)) => self.earth_radius_m.update(radius, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid GEOPAIR_EARTH_RADIUS_M value '{}': expected a positive number of meters",
                    radius_str
                ),
            }
        }

        // GEOPAIR_STRATEGY
        if let Ok(strategy_str) = env::var("GEOPAIR_STRATEGY") {
            match parse_search_strategy(&strategy_str) {
                Ok(strategy) => self.strategy.update(strategy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPAIR_STRATEGY value '{}': expected brute-force or indexed",
                    strategy_str
                ),
            }
        }

        // GEOPAIR_PARALLEL
        if let Ok(parallel_str) = env::var("GEOPAIR_PARALLEL") {
            match parse_bool(&parallel_str) {
                Some(parallel) => self.parallel.update(parallel, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid GEOPAIR_PARALLEL value '{}': expected true or false",
                    parallel_str
                ),
            }
        }

        // GEOPAIR_GEOCODER_API_KEY
        if let Ok(key) = env::var("GEOPAIR_GEOCODER_API_KEY") {
            self.geocoder_api_key.update(Some(key), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.earth_radius_m {
            self.earth_radius_m.update(radius, ConfigSource::Cli);
        }

        if let Some(strategy) = overrides.strategy {
            self.strategy.update(strategy, ConfigSource::Cli);
        }

        if let Some(parallel) = overrides.parallel {
            self.parallel.update(parallel, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    ///
    /// The geocoder API key is masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "distance_unit".to_string(),
            (format!("{:?}", self.distance_unit.value), self.distance_unit.source),
        );

        map.insert(
            "earth_radius_m".to_string(),
            (format!("{}", self.earth_radius_m.value), self.earth_radius_m.source),
        );

        map.insert(
            "strategy".to_string(),
            (format!("{:?}", self.strategy.value), self.strategy.source),
        );

        map.insert(
            "parallel".to_string(),
            (self.parallel.value.to_string(), self.parallel.source),
        );

        let key_display = match &self.geocoder_api_key.value {
            Some(_) => "********".to_string(),
            None => "(not set)".to_string(),
        };
        map.insert(
            "geocoder_api_key".to_string(),
            (key_display, self.geocoder_api_key.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    distance_unit: Option<String>,
    earth_radius_m: Option<f64>,
    strategy: Option<String>,
    parallel: Option<bool>,
    geocoder_api_key: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub distance_unit: Option<DistanceUnit>,
    pub earth_radius_m: Option<f64>,
    pub strategy: Option<SearchStrategy>,
    pub parallel: Option<bool>,
}

/// Parse distance unit from string
pub fn parse_distance_unit(s: &str) -> Result<DistanceUnit> {
    match s.trim().to_lowercase().as_str() {
        "meters" | "metres" | "m" => Ok(DistanceUnit::Meters),
        "kilometers" | "kilometres" | "km" => Ok(DistanceUnit::Kilometers),
        "miles" | "mi" => Ok(DistanceUnit::Miles),
        "feet" | "ft" => Ok(DistanceUnit::Feet),
        _ => Err(GeopairError::ConfigInvalid {
            key: "distance_unit".to_string(),
            reason: format!("Invalid distance unit: {}. Use meters, kilometers, miles, or feet", s),
        }),
    }
}

/// Parse search strategy from string
pub fn parse_search_strategy(s: &str) -> Result<SearchStrategy> {
    match s.trim().to_lowercase().as_str() {
        "brute-force" | "bruteforce" | "brute_force" => Ok(SearchStrategy::BruteForce),
        "indexed" | "rtree" | "r-tree" => Ok(SearchStrategy::Indexed),
        _ => Err(GeopairError::ConfigInvalid {
            key: "strategy".to_string(),
            reason: format!("Invalid search strategy: {}. Use brute-force or indexed", s),
        }),
    }
}

/// Check that a sphere radius is usable for distance computations
pub fn validate_earth_radius(radius: f64) -> Result<f64> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(GeopairError::ConfigInvalid {
            key: "earth_radius_m".to_string(),
            reason: format!("Radius must be a positive number of meters, got {}", radius),
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.distance_unit.value, DistanceUnit::Meters);
        assert_eq!(config.distance_unit.source, ConfigSource::Default);
        assert_eq!(config.earth_radius_m.value, MEAN_EARTH_RADIUS_M);
        assert_eq!(config.strategy.value, SearchStrategy::BruteForce);
        assert!(!config.parallel.value);
        assert!(config.geocoder_api_key.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
distance_unit = "feet"
earth_radius_m = 6378137.0
strategy = "indexed"
parallel = true
geocoder_api_key = "file-key"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.distance_unit.value, DistanceUnit::Feet);
        assert_eq!(config.distance_unit.source, ConfigSource::File);
        assert_eq!(config.earth_radius_m.value, 6_378_137.0);
        assert_eq!(config.strategy.value, SearchStrategy::Indexed);
        assert!(config.parallel.value);
        assert_eq!(config.geocoder_api_key.value.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_file_with_bad_radius_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "earth_radius_m = -1.0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(GeopairError::ConfigInvalid { ref key, .. }) if key == "earth_radius_m"));
    }

    #[test]
    fn test_missing_optional_file_keeps_defaults() {
        let config = LayeredConfig::with_defaults()
            .load_from_file_if_exists("/nonexistent/geopair.toml")
            .unwrap();
        assert_eq!(config.distance_unit.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            distance_unit: Some(DistanceUnit::Miles),
            strategy: Some(SearchStrategy::Indexed),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.distance_unit.value, DistanceUnit::Miles);
        assert_eq!(config.distance_unit.source, ConfigSource::Cli);
        assert_eq!(config.strategy.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.earth_radius_m.source, ConfigSource::Default);
        assert_eq!(config.parallel.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_distance_unit() {
        assert_eq!(parse_distance_unit("meters").unwrap(), DistanceUnit::Meters);
        assert_eq!(parse_distance_unit("m").unwrap(), DistanceUnit::Meters);
        assert_eq!(parse_distance_unit("KILOMETERS").unwrap(), DistanceUnit::Kilometers);
        assert_eq!(parse_distance_unit("ft").unwrap(), DistanceUnit::Feet);
        assert!(parse_distance_unit("furlongs").is_err());
    }

    #[test]
    fn test_parse_search_strategy() {
        assert_eq!(parse_search_strategy("brute-force").unwrap(), SearchStrategy::BruteForce);
        assert_eq!(parse_search_strategy("Indexed").unwrap(), SearchStrategy::Indexed);
        assert!(parse_search_strategy("kd-tree").is_err());
    }

    #[test]
    fn test_inspection_map_masks_api_key() {
        let mut config = LayeredConfig::with_defaults();
        config.geocoder_api_key.update(Some("secret".to_string()), ConfigSource::Cli);
        let map = config.to_inspection_map();

        assert!(map.contains_key("distance_unit"));
        assert!(map.contains_key("earth_radius_m"));
        assert!(map.contains_key("strategy"));
        assert!(map.contains_key("parallel"));

        let (key_value, key_source) = &map["geocoder_api_key"];
        assert_eq!(key_value, "********");
        assert_eq!(*key_source, ConfigSource::Cli);
    }
}
