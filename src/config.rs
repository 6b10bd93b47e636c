//! Application configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub google_maps_api_key: Option<String>,
    pub google_maps_base_url: String,
    pub places_region: String,
    pub delivery_origin: String,
    pub distance_cache_path: Option<PathBuf>,
    pub ghl_api_key: Option<String>,
    pub ghl_location_id: Option<String>,
    pub ghl_base_url: String,
    pub ghl_webhook_url: Option<String>,
    pub http_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("google_maps_api_key", &redact(&self.google_maps_api_key))
            .field("google_maps_base_url", &self.google_maps_base_url)
            .field("places_region", &self.places_region)
            .field("delivery_origin", &self.delivery_origin)
            .field("distance_cache_path", &self.distance_cache_path)
            .field("ghl_api_key", &redact(&self.ghl_api_key))
            .field("ghl_location_id", &self.ghl_location_id)
            .field("ghl_base_url", &self.ghl_base_url)
            .field("ghl_webhook_url", &redact(&self.ghl_webhook_url))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

/// Load configuration, reading a `.env` file first when present.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but malformed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parse configuration through `lookup`, so tests can feed a `HashMap`.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let bind_raw = or_default("BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let timeout_raw = or_default("HTTP_TIMEOUT_SECS", "15");
    let http_timeout_secs = timeout_raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "HTTP_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let places_region = or_default("PLACES_REGION", "au").to_lowercase();
    if places_region.len() != 2 || !places_region.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACES_REGION".to_string(),
            reason: format!("expected a two-letter country code, got '{places_region}'"),
        });
    }

    Ok(AppConfig {
        bind_addr,
        log_level: or_default("LOG_LEVEL", "info"),
        google_maps_api_key: optional("GOOGLE_MAPS_API_KEY"),
        google_maps_base_url: or_default(
            "GOOGLE_MAPS_BASE_URL",
            crate::places::client::DEFAULT_BASE_URL,
        ),
        places_region,
        delivery_origin: or_default("DELIVERY_ORIGIN", "Smithfield NSW 2164, Australia"),
        distance_cache_path: optional("DISTANCE_CACHE_PATH").map(PathBuf::from),
        ghl_api_key: optional("GHL_API_KEY"),
        ghl_location_id: optional("GHL_LOCATION_ID"),
        ghl_base_url: or_default("GHL_BASE_URL", crate::crm::client::DEFAULT_BASE_URL),
        ghl_webhook_url: optional("GHL_WEBHOOK_URL"),
        http_timeout_secs,
    })
}
