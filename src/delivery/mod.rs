//! Delivery fee estimation.
//!
//! Resolves a drive distance from the depot to a free-text address and turns
//! it into a tiered fee. Lookups are cached for a day; any failure to reach the
//! maps API degrades to a suburb heuristic flagged as an estimate.

pub mod cache;
pub mod estimator;
pub mod fallback;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::pricing::round_money;

pub use cache::{cache_key, DistanceCache, DistanceCacheEntry};
pub use estimator::DeliveryEstimator;

/// Distance covered by the flat fee
pub const FLAT_FEE_RADIUS_KM: Decimal = dec!(50);
pub const FLAT_FEE: Decimal = dec!(100);
pub const PER_KM_BEYOND_RADIUS: Decimal = dec!(2);

/// Result of a delivery lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEstimate {
    pub distance_km: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub fee: Decimal,
    pub using_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryEstimate {
    pub fn resolved(distance_km: f64, using_fallback: bool) -> Self {
        Self {
            distance_km,
            fee: fee_for(distance_km),
            using_fallback,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            distance_km: 0.0,
            fee: Decimal::ZERO,
            using_fallback: false,
            error: Some(message.into()),
        }
    }
}

/// Delivery fee for a drive distance: flat within the radius, per-km beyond it.
pub fn fee_for(distance_km: f64) -> Decimal {
    let distance = Decimal::from_f64(distance_km.max(0.0)).unwrap_or(Decimal::ZERO);
    if distance <= FLAT_FEE_RADIUS_KM {
        FLAT_FEE
    } else {
        round_money(FLAT_FEE + (distance - FLAT_FEE_RADIUS_KM) * PER_KM_BEYOND_RADIUS, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fee_within_radius() {
        for distance in [0.0, 0.1, 12.3, 29.9, 49.99, 50.0] {
            assert_eq!(fee_for(distance), dec!(100), "{distance} km");
        }
    }

    #[test]
    fn test_per_km_beyond_radius() {
        assert_eq!(fee_for(50.5), dec!(101));
        assert_eq!(fee_for(72.5), dec!(145));
        assert_eq!(fee_for(60.3), dec!(120.60));
        assert_eq!(fee_for(150.0), dec!(300));
    }

    #[test]
    fn test_negative_distance_is_flat_fee() {
        assert_eq!(fee_for(-5.0), dec!(100));
    }

    #[test]
    fn test_invalid_estimate_is_zeroed() {
        let estimate = DeliveryEstimate::invalid("Address is required");
        assert_eq!(estimate.distance_km, 0.0);
        assert_eq!(estimate.fee, dec!(0));
        assert_eq!(estimate.error.as_deref(), Some("Address is required"));
    }

    #[test]
    fn test_estimate_serializes_for_the_badge() {
        let json = serde_json::to_value(DeliveryEstimate::resolved(72.5, true)).unwrap();
        assert_eq!(json["distanceKm"], 72.5);
        let fee: Decimal = json["fee"].as_str().unwrap().parse().unwrap();
        assert_eq!(fee, dec!(145));
        assert_eq!(json["usingFallback"], true);
        assert!(json.get("error").is_none());
    }
}
