// src/error.rs

//! Error taxonomy for a simulation run.
//!
//! Configuration errors are raised before the first period is simulated.
//! Data errors are raised at the point the offending value is first needed.
//! A run that fails never returns a partial report.

use thiserror::Error;

/// Result alias used across the crate.
pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    // ===== Configuration =====
    /// A policy parameter is out of range.
    #[error("configuration error: {message}")]
    Config { message: String },

    // ===== Input data =====
    #[error("input series is empty")]
    EmptySeries,

    /// Period column does not start at 0 or has a gap.
    #[error("periods are not contiguous: row {index} has period {found}, expected {expected}")]
    NonContiguousPeriods {
        index: usize,
        expected: i64,
        found: i64,
    },

    /// Demand is absent inside the historical range.
    #[error("missing demand for period {period} inside the historical range")]
    MissingDemand { period: usize },

    #[error("missing forecast for period {period}")]
    MissingForecast { period: usize },

    /// Demand must be finite and non-negative.
    #[error("invalid demand {value} at period {period}")]
    InvalidDemand { period: usize, value: f64 },

    #[error("invalid forecast {value} at period {period}")]
    InvalidForecast { period: usize, value: f64 },

    /// The review at `period` needs forecasts up to (excluding) `required_until`.
    #[error(
        "forecast horizon of review at period {period} needs periods up to {required_until}, \
         only {available} forecast periods available"
    )]
    ForecastHorizon {
        period: usize,
        required_until: usize,
        available: usize,
    },

    // ===== I/O =====
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InventoryError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
