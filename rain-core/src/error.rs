/// Error types for the rain-core library
use thiserror::Error;

/// Main error type for fetching and bucketing precipitation data
#[derive(Error, Debug)]
pub enum RainError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream {url} answered with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON data
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to read or decompress data
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Upstream reported a time zone offset of a day or more
    #[error("Invalid UTC offset: {0} seconds")]
    InvalidUtcOffset(i32),

    /// Water year boundary is not a usable month/day
    #[error("Invalid water year boundary: month {month}, day {day}")]
    InvalidBoundary { month: u32, day: u32 },

    /// Nothing to rank or plot
    #[error("No water years could be built from the observations")]
    NoWaterYears,
}

/// Type alias for Results using RainError
pub type Result<T> = std::result::Result<T, RainError>;
