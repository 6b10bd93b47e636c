//! Liveness and integration status.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub maps_configured: bool,
    pub crm_rest_configured: bool,
    pub crm_webhook_configured: bool,
    pub distance_cache_entries: usize,
    pub cache: CacheStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        maps_configured: state.config.google_maps_api_key.is_some(),
        crm_rest_configured: state.crm.has_rest_credentials(),
        crm_webhook_configured: state.crm.has_webhook(),
        distance_cache_entries: state.delivery.cached_entries(),
        cache: state.cache.stats(),
    })
}
