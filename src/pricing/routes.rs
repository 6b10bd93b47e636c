//! Quote calculation route.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::routes::maps_api_key;
use crate::AppState;

use super::calculators::calculate_quote;
use super::requests::CalculateQuoteRequest;
use super::responses::QuoteResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/quote", post(calculate))
}

/// Price a configuration. A non-empty `deliveryAddress` adds a delivery line.
pub async fn calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CalculateQuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(request) = payload?;
    let mut quote = calculate_quote(&request.configuration);

    let delivery = match request.delivery_address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => {
            let api_key = maps_api_key(&state, &headers);
            let estimate = state.delivery.estimate(address, api_key.as_deref()).await;
            quote = quote.with_delivery(&estimate);
            Some(estimate)
        }
        _ => None,
    };

    tracing::debug!(
        fence_type = request.configuration.fence_type.as_str(),
        panels = quote.materials.panels,
        total = %quote.total_price,
        "quote calculated"
    );

    Ok(Json(QuoteResponse::new(quote, delivery)))
}
