//! Lead submission routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crm::{ContactDetails, QuoteSummary, SubmissionChannel};
use crate::delivery::DeliveryEstimate;
use crate::error::{AppError, Result};
use crate::pricing::{calculate_quote, QuoteConfiguration};
use crate::AppState;

use super::maps_api_key;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/submit-form", post(submit_form))
        .route("/api/submit-quote", post(submit_quote))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteRequest {
    pub contact: ContactDetails,
    pub configuration: QuoteConfiguration,
    /// Falls back to the contact address when absent
    #[serde(default)]
    pub delivery_address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub channel: SubmissionChannel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_reference: Option<Uuid>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub total_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryEstimate>,
}

/// Contact form → CRM contact
pub async fn submit_form(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactDetails>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(contact) = payload?;
    contact.validate().map_err(AppError::Validation)?;

    let submission = state.crm.create_contact(&contact, None).await?;

    Ok(Json(SubmitResponse {
        success: true,
        channel: submission.channel,
        contact_id: submission.contact_id,
        quote_reference: None,
        total_price: None,
        delivery: None,
    }))
}

/// Priced quote → CRM (webhook when configured, REST otherwise)
pub async fn submit_quote(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<SubmitQuoteRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(request) = payload?;
    request.contact.validate().map_err(AppError::Validation)?;

    let mut quote = calculate_quote(&request.configuration);

    let address = request
        .delivery_address
        .as_deref()
        .unwrap_or(&request.contact.address)
        .trim()
        .to_string();

    let delivery = if address.is_empty() {
        None
    } else {
        let api_key = maps_api_key(&state, &headers);
        let estimate = state.delivery.estimate(&address, api_key.as_deref()).await;
        quote = quote.with_delivery(&estimate);
        Some(estimate)
    };

    let summary = QuoteSummary::new(
        &request.configuration,
        &quote,
        (!address.is_empty()).then(|| address.clone()),
        delivery.clone(),
    );
    let submission = state.crm.submit_quote(&request.contact, &summary).await?;

    tracing::info!(
        reference = %summary.reference,
        channel = ?submission.channel,
        total = %summary.total_price,
        "quote submitted"
    );

    Ok(Json(SubmitResponse {
        success: true,
        channel: submission.channel,
        contact_id: submission.contact_id,
        quote_reference: Some(summary.reference),
        total_price: Some(summary.total_price),
        delivery,
    }))
}
