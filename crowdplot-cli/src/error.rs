//! Error handling for the crowdplot CLI

use thiserror::Error;
use std::path::PathBuf;

/// Fatal errors surfaced to the user
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("Required {what} not found: {path}")]
    MissingInput { what: String, path: PathBuf },

    #[error("Invalid metadata in {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    #[error("Invalid date filter '{value}': expected YYYYMMDD")]
    InvalidDate { value: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn missing_input<S: Into<String>>(what: S, path: PathBuf) -> Self {
        Self::MissingInput { what: what.into(), path }
    }

    pub fn metadata<S: Into<String>>(path: PathBuf, message: S) -> Self {
        Self::Metadata { path, message: message.into() }
    }

    pub fn invalid_date<S: Into<String>>(value: S) -> Self {
        Self::InvalidDate { value: value.into() }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::MissingInput { path, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the path is correct: {}\n\
                 • Run from the directory holding your data, or pass --data-dir / --metadata\n\
                 • Set the [paths] section in crowdplot.toml",
                path.display()
            ));
        }

        CliError::Metadata { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • The metadata file must be a JSON object of location records\n\
                 • Each record may carry postal, name, region, atm and total fields"
            );
        }

        CliError::InvalidDate { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Pass the day as eight digits, e.g. 20260203\n\
                 • Omit the date to render every day found in the data directory"
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your crowdplot.toml configuration file\n\
                 • Use 'crowdplot config --example' to generate a sample configuration"
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
