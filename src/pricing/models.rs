//! Domain models for the quote calculator.
//!
//! Enum values arrive from the web wizard as plain strings. Unknown values do
//! not fail the request; they fall back to the default tier and are logged.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fence product line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum FenceType {
    #[default]
    Builders,
    Premium,
    Pool,
    Crowd,
}

impl FenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FenceType::Builders => "builders",
            FenceType::Premium => "premium",
            FenceType::Pool => "pool",
            FenceType::Crowd => "crowd",
        }
    }

    /// Customer-facing product name used on line items and in the CRM
    pub fn display_name(&self) -> &'static str {
        match self {
            FenceType::Builders => "Builders Temporary Fence Panel",
            FenceType::Premium => "Premium Temporary Fence Panel",
            FenceType::Pool => "Pool Temporary Fence Panel",
            FenceType::Crowd => "Crowd Control Barrier",
        }
    }
}

impl From<String> for FenceType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "builders" => FenceType::Builders,
            "premium" => FenceType::Premium,
            "pool" => FenceType::Pool,
            "crowd" => FenceType::Crowd,
            other => {
                tracing::warn!(fence_type = other, "unknown fence type, using default tier");
                FenceType::default()
            }
        }
    }
}

/// How the panels stand: standard feet or hook-stay feet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum FeetOption {
    #[default]
    Feet,
    HookStay,
}

impl FeetOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeetOption::Feet => "feet",
            FeetOption::HookStay => "hookStay",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FeetOption::Feet => "Fence Feet",
            FeetOption::HookStay => "Hook Stay Feet",
        }
    }
}

impl From<String> for FeetOption {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "feet" => FeetOption::Feet,
            "hookstay" | "hook_stay" | "hook-stay" => FeetOption::HookStay,
            other => {
                tracing::warn!(feet_option = other, "unknown feet option, using default");
                FeetOption::default()
            }
        }
    }
}

/// Outright purchase or hire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum PurchaseOption {
    #[default]
    Purchase,
    Hire,
}

impl PurchaseOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOption::Purchase => "purchase",
            PurchaseOption::Hire => "hire",
        }
    }
}

impl From<String> for PurchaseOption {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "purchase" => PurchaseOption::Purchase,
            "hire" => PurchaseOption::Hire,
            other => {
                tracing::warn!(option = other, "unknown purchase option, using purchase");
                PurchaseOption::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum DurationUnit {
    Days,
    #[default]
    Weeks,
    Months,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Months => "months",
        }
    }

    /// Inclusive (min, max) hire duration accepted for this unit
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            DurationUnit::Days => (7, 730),
            DurationUnit::Weeks => (1, 104),
            DurationUnit::Months => (1, 24),
        }
    }
}

impl From<String> for DurationUnit {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "days" | "day" => DurationUnit::Days,
            "weeks" | "week" => DurationUnit::Weeks,
            "months" | "month" => DurationUnit::Months,
            other => {
                tracing::warn!(duration_unit = other, "unknown duration unit, using weeks");
                DurationUnit::default()
            }
        }
    }
}

/// Everything the wizard collects before pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfiguration {
    #[serde(default)]
    pub fence_type: FenceType,
    #[serde(default)]
    pub feet_option: FeetOption,
    pub meters_required: Decimal,
    #[serde(default)]
    pub option: PurchaseOption,
    /// Any number is accepted here; [`QuoteConfiguration::clamped`] rounds it
    /// up to whole units and bounds it per unit
    #[serde(default = "default_hire_duration")]
    pub hire_duration: Decimal,
    #[serde(default)]
    pub duration_unit: DurationUnit,
}

fn default_hire_duration() -> Decimal {
    dec!(1)
}

pub const MIN_METERS: Decimal = dec!(1);
pub const MAX_METERS: Decimal = dec!(800);

impl QuoteConfiguration {
    /// Clamp metres and hire duration to the ranges the calculator accepts.
    pub fn clamped(&self) -> Self {
        Self {
            meters_required: self.meters_required.clamp(MIN_METERS, MAX_METERS),
            hire_duration: Decimal::from(self.hire_units()),
            ..self.clone()
        }
    }

    /// Hire duration as whole units: fractions round up, then the unit's
    /// bounds apply.
    pub fn hire_units(&self) -> u32 {
        let (min_duration, max_duration) = self.duration_unit.bounds();
        let rounded = self.hire_duration.ceil().clamp(
            Decimal::from(min_duration),
            Decimal::from(max_duration),
        );
        rounded.to_u32().unwrap_or(min_duration)
    }

    pub fn is_hire(&self) -> bool {
        self.option == PurchaseOption::Hire
    }
}

/// Line item grouping shown on the quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCategory {
    Panels,
    Feet,
    Connectors,
    Supports,
    Delivery,
    Services,
    Discount,
}

/// One priced row of a quote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub category: LineCategory,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub is_estimate: bool,
}

impl LineItem {
    pub fn new(name: impl Into<String>, category: LineCategory, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            category,
            unit_price,
            quantity,
            is_estimate: false,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
