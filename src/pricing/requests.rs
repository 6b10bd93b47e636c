//! Request DTOs for the quote endpoint.

use serde::Deserialize;

use super::models::QuoteConfiguration;

/// Request to price a configuration, optionally with delivery
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateQuoteRequest {
    pub configuration: QuoteConfiguration,
    #[serde(default)]
    pub delivery_address: Option<String>,
}
