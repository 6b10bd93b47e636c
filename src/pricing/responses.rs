//! Response DTOs for the quote endpoint.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::delivery::DeliveryEstimate;

use super::calculators::{BillOfMaterials, Quote};
use super::models::LineItem;

/// Item counts behind the quote lines
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub panel_length: Decimal,
    pub panels: u32,
    pub feet: u32,
    pub clamps: u32,
    pub braces: u32,
}

impl From<BillOfMaterials> for MaterialsResponse {
    fn from(bom: BillOfMaterials) -> Self {
        Self {
            panel_length: bom.panel_length,
            panels: bom.panels,
            feet: bom.feet,
            clamps: bom.clamps,
            braces: bom.braces,
        }
    }
}

/// Response for quote calculation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub items: Vec<LineItem>,
    pub materials: MaterialsResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryEstimate>,
}

impl QuoteResponse {
    pub fn new(quote: Quote, delivery: Option<DeliveryEstimate>) -> Self {
        Self {
            success: true,
            items: quote.items,
            materials: quote.materials.into(),
            subtotal: quote.subtotal,
            discount: quote.discount,
            total_price: quote.total_price,
            delivery,
        }
    }
}
