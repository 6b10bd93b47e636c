//! Errors from the Google Maps Platform client.

use thiserror::Error;

/// Errors returned by the Google Maps Platform client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status other than `OK`.
    #[error("Maps API error {status}: {message}")]
    Api { status: String, message: String },

    /// Distance Matrix found no drivable route between the two points.
    #[error("no route to '{0}'")]
    NoRoute(String),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
