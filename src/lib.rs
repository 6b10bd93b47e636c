//! Fence quote service: pricing, delivery estimation and CRM lead capture
//! behind a small JSON API for the quote wizard.

pub mod cache;
pub mod config;
pub mod crm;
pub mod delivery;
pub mod error;
pub mod places;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use crate::cache::AppCache;
use crate::config::AppConfig;
use crate::crm::GoHighLevelClient;
use crate::delivery::DeliveryEstimator;
use crate::error::AppError;
use crate::places::GoogleMapsClient;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: AppCache,
    pub maps: Arc<GoogleMapsClient>,
    pub delivery: Arc<DeliveryEstimator>,
    pub crm: Arc<GoHighLevelClient>,
}

impl AppState {
    /// Build clients and the delivery estimator from configuration.
    ///
    /// # Errors
    ///
    /// Fails when an HTTP client cannot be built or a base URL is invalid.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let maps = Arc::new(GoogleMapsClient::with_base_url(
            config.http_timeout_secs,
            &config.places_region,
            &config.google_maps_base_url,
        )?);

        let delivery = match &config.distance_cache_path {
            Some(path) => {
                DeliveryEstimator::with_persistence(
                    Arc::clone(&maps),
                    config.delivery_origin.clone(),
                    path.clone(),
                )
                .await
            }
            None => DeliveryEstimator::new(Arc::clone(&maps), config.delivery_origin.clone()),
        };

        let crm = GoHighLevelClient::new(
            config.http_timeout_secs,
            &config.ghl_base_url,
            config.ghl_api_key.clone(),
            config.ghl_location_id.clone(),
            config.ghl_webhook_url.clone(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            cache: AppCache::new(),
            maps,
            delivery: Arc::new(delivery),
            crm: Arc::new(crm),
        })
    }
}
