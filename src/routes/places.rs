//! Places proxy routes: autocomplete, details and delivery distance.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::cache::AppCache;
use crate::delivery::DeliveryEstimate;
use crate::error::{AppError, Result};
use crate::places::{PlaceDetails, PlacePrediction};
use crate::AppState;

use super::maps_api_key;

/// Inputs shorter than this return no suggestions without calling Google
const MIN_AUTOCOMPLETE_CHARS: usize = 3;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/places/autocomplete", get(autocomplete))
        .route("/api/places/details", get(details))
        .route("/api/places/distance", get(distance_query).post(distance))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsQuery {
    #[serde(default, alias = "place_id")]
    pub place_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteResponse {
    pub success: bool,
    pub predictions: Vec<PlacePrediction>,
}

#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub success: bool,
    pub place: PlaceDetails,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub success: bool,
    #[serde(flatten)]
    pub estimate: DeliveryEstimate,
}

fn require_key(state: &AppState, headers: &HeaderMap) -> Result<String> {
    maps_api_key(state, headers)
        .ok_or_else(|| AppError::Configuration("GOOGLE_MAPS_API_KEY is not set".to_string()))
}

/// Address suggestions
pub async fn autocomplete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<AutocompleteResponse>> {
    let input = query.input.trim();
    if input.chars().count() < MIN_AUTOCOMPLETE_CHARS {
        return Ok(Json(AutocompleteResponse {
            success: true,
            predictions: Vec::new(),
        }));
    }

    let key = AppCache::autocomplete_key(state.maps.region(), input);
    if let Some(cached) = state.cache.autocomplete.get(&key).await {
        tracing::debug!("Cache HIT for autocomplete: {}", key);
        return Ok(Json(AutocompleteResponse {
            success: true,
            predictions: (*cached).clone(),
        }));
    }
    tracing::debug!("Cache MISS for autocomplete: {}", key);

    let api_key = require_key(&state, &headers)?;
    let predictions = state.maps.autocomplete(input, &api_key).await?;
    state
        .cache
        .autocomplete
        .insert(key, Arc::new(predictions.clone()))
        .await;

    Ok(Json(AutocompleteResponse {
        success: true,
        predictions,
    }))
}

/// Resolve a selected suggestion to a full address
pub async fn details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<DetailsResponse>> {
    let place_id = query.place_id.trim();
    if place_id.is_empty() {
        return Err(AppError::Validation("placeId is required".to_string()));
    }

    if let Some(cached) = state.cache.place_details.get(place_id).await {
        tracing::debug!("Cache HIT for place details: {}", place_id);
        return Ok(Json(DetailsResponse {
            success: true,
            place: (*cached).clone(),
        }));
    }
    tracing::debug!("Cache MISS for place details: {}", place_id);

    let api_key = require_key(&state, &headers)?;
    let place = state.maps.place_details(place_id, &api_key).await?;
    state
        .cache
        .place_details
        .insert(place_id.to_string(), Arc::new(place.clone()))
        .await;

    Ok(Json(DetailsResponse {
        success: true,
        place,
    }))
}

/// Delivery distance and fee for a JSON body `{ "address": ... }`
pub async fn distance(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DistanceResponse>)> {
    let Json(request) = payload?;
    Ok(estimate_response(&state, &headers, &request.address).await)
}

/// Delivery distance and fee for `?address=`
pub async fn distance_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<DistanceRequest>,
) -> (StatusCode, Json<DistanceResponse>) {
    estimate_response(&state, &headers, &request.address).await
}

async fn estimate_response(
    state: &AppState,
    headers: &HeaderMap,
    address: &str,
) -> (StatusCode, Json<DistanceResponse>) {
    let api_key = maps_api_key(state, headers);
    let estimate = state.delivery.estimate(address, api_key.as_deref()).await;

    let status = if estimate.error.is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    let response = DistanceResponse {
        success: estimate.error.is_none(),
        estimate,
    };
    (status, Json(response))
}
