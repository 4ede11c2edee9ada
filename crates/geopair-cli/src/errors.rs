use console::style;
use geopair_core::GeopairError;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref context) = self.context {
            write!(f, ": {}", context)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing input file
pub fn input_not_found(path: &Path) -> CliError {
    CliError::new("Input file not found")
        .with_context(format!("The specified input file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
}

/// Create error for a CSV header without the expected column
pub fn missing_column(column: &str, available: &str) -> CliError {
    CliError::new(format!("Missing column '{}'", column))
        .with_context(format!("Columns found in the header: {}", available))
        .with_suggestion("Name the columns explicitly: --lat-column <NAME> --lon-column <NAME>")
        .with_suggestion("Or rename the header to id, type, latitude, longitude")
        .with_help("Run: geopair nearest --help")
}

/// Create error for a point with unusable coordinates
pub fn invalid_coordinate(point_id: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid coordinate for point {}", point_id))
        .with_context(format!("Reason: {}", reason))
        .with_suggestion("Latitude must be within [-90, 90] and longitude within [-180, 180]")
        .with_suggestion("Check whether the latitude and longitude columns are swapped")
        .with_help("List every bad row: geopair inspect points <INPUT>")
}

/// Create error for too few points to pair
pub fn not_enough_points(count: usize) -> CliError {
    CliError::new("Not enough points")
        .with_context(format!(
            "A nearest neighbour needs at least 2 points; the input has {}.",
            count
        ))
        .with_suggestion("Check that the file has a header row followed by data rows")
}

/// Create error for identifiers used twice
pub fn duplicate_id(point_id: &str) -> CliError {
    CliError::new(format!("Duplicate point identifier: {}", point_id))
        .with_context("Every point needs a unique identifier so results can name its neighbour.")
        .with_suggestion("Make the id column unique")
        .with_suggestion("Or drop --id-column to number points by row")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check geopair.toml for syntax errors")
        .with_suggestion("Check GEOPAIR_* environment variables")
        .with_help("Run: geopair inspect config")
}

fn from_geopair(error: &GeopairError) -> Option<CliError> {
    match error {
        GeopairError::InputNotFound { path } => Some(input_not_found(path)),
        GeopairError::MissingColumn { column, available } => Some(missing_column(column, available)),
        GeopairError::InvalidCoordinate { point_id, reason } => {
            Some(invalid_coordinate(point_id, reason))
        }
        GeopairError::EmptyInput { count } => Some(not_enough_points(*count)),
        GeopairError::DuplicateId { point_id } => Some(duplicate_id(point_id)),
        GeopairError::ConfigInvalid { key, reason } => Some(invalid_config(key, reason)),
        GeopairError::Cancelled { completed, total } => Some(
            CliError::new("Search cancelled")
                .with_context(format!("Stopped after {} of {} points.", completed, total)),
        ),
        _ => None,
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(known) = error.downcast_ref::<GeopairError>().and_then(from_geopair) {
        return known;
    }

    let message = format!("{:#}", error);
    if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_known_errors_get_suggestions() {
        let error = anyhow::Error::from(GeopairError::InvalidCoordinate {
            point_id: "s1".to_string(),
            reason: "latitude 200 is outside [-90, 90]".to_string(),
        });

        let cli_error = from_anyhow(error);
        assert_eq!(cli_error.message, "Invalid coordinate for point s1");
        assert!(!cli_error.suggestions.is_empty());
    }

    #[test]
    fn test_known_errors_survive_added_context() {
        let result: anyhow::Result<()> =
            Err(GeopairError::EmptyInput { count: 1 }).context("Failed to search points");

        let cli_error = from_anyhow(result.unwrap_err());
        assert_eq!(cli_error.message, "Not enough points");
    }

    #[test]
    fn test_unknown_errors_keep_their_message() {
        let cli_error = from_anyhow(anyhow::anyhow!("something odd"));
        assert_eq!(cli_error.message, "something odd");
        assert!(cli_error.suggestions.is_empty());
    }
}
