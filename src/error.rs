use std::path::PathBuf;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// None of the input patterns resolved to a file
    #[error("No input files found for: {}", .patterns.join(", "))]
    NoInputFiles { patterns: Vec<String> },

    /// Input pattern is not a valid glob
    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Required column absent from a usage export
    #[error("Column '{column}' not found in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// Usage export could not be read or parsed as CSV
    #[error("Failed to read {}: {message}", .path.display())]
    ReadError { path: PathBuf, message: String },

    /// Pricing document could not be retrieved
    #[error("Failed to fetch pricing data: {0}")]
    PricingFetch(String),

    /// Region, instance type or catalog entry not present
    #[error("Not found: {0}")]
    NotFound(String),

    /// Price fields missing, malformed or zero
    #[error("Invalid price data: {0}")]
    InvalidPriceData(String),

    /// Dimension value not in the static catalog
    #[error("Invalid {dimension} '{value}' (see `aws-cost catalog {catalog}`)")]
    InvalidDimension {
        dimension: &'static str,
        value: String,
        catalog: &'static str,
    },

    /// Aggregated cost does not fit in a decimal
    #[error("Cost total overflowed for group {0}")]
    CostOverflow(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Result could not be written
    #[error("Failed to write output: {0}")]
    OutputError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::PricingFetch(format!("HTTP {}", status)),
            None => Self::PricingFetch(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPriceData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::OutputError(err.to_string())
    }
}
