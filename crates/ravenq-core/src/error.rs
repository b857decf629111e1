//! Error types for ravenq

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    // Spatial query errors
    #[error("Query shape must not be empty")]
    EmptyQueryShape,

    #[error("Spatial field name must not be empty")]
    EmptySpatialFieldName,

    #[error("Invalid distance error percentage {value}: expected a finite, non-negative number")]
    InvalidDistanceErrorPercentage { value: f64 },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, QueryError>;
