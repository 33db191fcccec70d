use thiserror::Error;

#[derive(Debug, Error)]
pub enum TidewatchError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a finite number")]
    NonFiniteField(&'static str),

    #[error("Toxic threshold must be positive, got {0}")]
    InvalidThreshold(f64),

    #[error("Background range [{0}, {1}] must be non-negative and ordered")]
    InvalidBackgroundRange(f64, f64),

    #[error("Time slot '{0}' not found")]
    TimeSlotNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
