//! Errors from GoHighLevel submission.

use thiserror::Error;

/// Errors returned by the GoHighLevel integration.
#[derive(Debug, Error)]
pub enum CrmError {
    /// The credential or URL needed for this submission path is not set.
    #[error("CRM is not configured: {0} is missing")]
    NotConfigured(&'static str),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CRM answered with a non-2xx status.
    #[error("CRM returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
