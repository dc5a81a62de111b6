//! Error types for the export pipeline.

use thiserror::Error;

/// Errors that can occur while exporting room calendars.
#[derive(Error, Debug)]
pub enum IndicoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {0} timed out after {1}s")]
    Timeout(String, u64),

    #[error("Indico rejected the API token (HTTP {status}) for {url}")]
    Unauthorized { url: String, status: u16 },

    #[error("Indico returned HTTP {status} for {url}")]
    ApiStatus { url: String, status: u16 },

    #[error("API response not parseable ({url}): {reason}")]
    ApiResponse { url: String, reason: String },

    #[error("Malformed booking for room {room_id}: {source}")]
    MalformedBooking {
        room_id: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid booking timestamp '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl IndicoError {
    /// Whether the error concerns a single room only, so that the run may
    /// continue with the remaining rooms.
    ///
    /// Configuration, authorization and filesystem errors always abort.
    pub fn is_room_local(&self) -> bool {
        matches!(
            self,
            IndicoError::Http { .. }
                | IndicoError::Timeout(..)
                | IndicoError::ApiStatus { .. }
                | IndicoError::ApiResponse { .. }
                | IndicoError::MalformedBooking { .. }
                | IndicoError::DateParse { .. }
        )
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        IndicoError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for export operations.
pub type IndicoResult<T> = Result<T, IndicoError>;
