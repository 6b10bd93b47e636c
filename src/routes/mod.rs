//! HTTP surface consumed by the quote wizard.

pub mod health;
pub mod places;
pub mod submit;

use axum::{
    http::{header, HeaderMap, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{pricing, AppState};

/// Cookie an embedding iframe host may set to lend its Maps key
pub const MAPS_KEY_COOKIE: &str = "maps_api_key";

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(pricing::router())
        .merge(places::router())
        .merge(submit::router())
        .route("/health", get(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(build_cors()),
        )
        .with_state(state)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Maps API key for this request: configured key first, then the cookie.
pub fn maps_api_key(state: &AppState, headers: &HeaderMap) -> Option<String> {
    state
        .config
        .google_maps_api_key
        .clone()
        .or_else(|| cookie_value(headers, MAPS_KEY_COOKIE))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
