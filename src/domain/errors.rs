//! Domain error types
//!
//! This module defines the error hierarchy for Rollcall.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Rollcall error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Deputy API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Counter/aggregation errors
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// A fetched record was missing an expected field
    #[error("Record shape error: {0}")]
    Record(#[from] RecordError),

    /// A student's year level has no configured shift obligation.
    /// Fatal: the report cannot be produced until the configuration is fixed.
    #[error("Year level data error ({year}) for {student}. Fix the configuration before proceeding.")]
    MissingObligation { student: String, year: String },

    /// Roster CSV ingestion errors
    #[error("Roster error: {0}")]
    Roster(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Deputy API transport errors
///
/// Every failure mode of one request/response exchange gets a distinct kind.
/// All of these are fatal to the enclosing operation; the transport never
/// retries on its own.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured endpoint or the resolved request URL is malformed
    #[error("Invalid API endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// The user interrupted the program while a call was in flight
    #[error("User requested exit.")]
    UserCancelled,

    /// Connect/read timeout for a single call
    #[error("Timeout for API {path}")]
    Timeout { path: String },

    /// Socket-level fault other than a timeout
    #[error("Network error ({code:?}) for API {path}: {message}")]
    Network {
        path: String,
        /// Underlying OS error code, when one is available
        code: Option<i32>,
        message: String,
    },

    /// The server answered with a redirect. Deputy never redirects API
    /// calls, so this is treated as a protocol violation and not followed.
    #[error("Unexpected redirect ({status}) for API {path}")]
    UnexpectedRedirect { path: String, status: u16 },

    /// Any non-200 response status
    #[error("API {path} failed with {status} {reason}")]
    Http {
        path: String,
        status: u16,
        reason: String,
    },

    /// The response body was not valid JSON
    #[error("Error parsing JSON API response for {path}: {message}")]
    ResponseParse { path: String, message: String },
}

/// Aggregator errors
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A `count` call referenced a counter id that was never registered
    #[error("Unknown counter id: {0}")]
    UnknownCounter(String),
}

/// Record shape errors
///
/// Raised when a vendor record is missing an expected field or carries a
/// value of an unexpected type. Recovered locally only where documented
/// (discarded-employee email indexing); fatal everywhere else.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An expected field was absent from the record
    #[error("Record is missing field '{field}' ({context})")]
    MissingField { field: String, context: String },

    /// A field was present but had the wrong JSON type
    #[error("Field '{field}' has unexpected type, expected {expected} ({context})")]
    WrongType {
        field: String,
        expected: &'static str,
        context: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for RollcallError {
    fn from(err: std::io::Error) -> Self {
        RollcallError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RollcallError {
    fn from(err: serde_json::Error) -> Self {
        RollcallError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RollcallError {
    fn from(err: toml::de::Error) -> Self {
        RollcallError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors
impl From<csv::Error> for RollcallError {
    fn from(err: csv::Error) -> Self {
        RollcallError::Roster(err.to_string())
    }
}
