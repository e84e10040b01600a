use reqwest::StatusCode;
use thiserror::Error;

use crate::locate::GeolocationOutcome;

/// The three ways a user-initiated action can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream API rejected the queried city or coordinates.
    NotFound,
    /// Transport, decoding or geolocation failure.
    NetworkOrParseFailure,
    /// Geocoding returned no candidates.
    EmptyResult,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{endpoint} data not found for {query} (status {status})")]
    NotFound {
        endpoint: &'static str,
        query: String,
        status: StatusCode,
    },

    #[error("location not found for {query}")]
    NoPlace { query: String },

    #[error("no locations match '{query}'")]
    EmptyResult { query: String },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to send {endpoint} request")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {endpoint} response")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} response contained no weather conditions")]
    MissingCondition { endpoint: &'static str },

    #[error("could not determine current location: {0}")]
    Geolocation(GeolocationOutcome),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::NotFound { .. } | WeatherError::NoPlace { .. } => ErrorKind::NotFound,
            WeatherError::EmptyResult { .. } => ErrorKind::EmptyResult,
            WeatherError::Status { .. }
            | WeatherError::Network { .. }
            | WeatherError::Parse { .. }
            | WeatherError::MissingCondition { .. }
            | WeatherError::Geolocation(_) => ErrorKind::NetworkOrParseFailure,
        }
    }
}
