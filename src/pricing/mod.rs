//! Pricing engine module.
//!
//! One pure calculator shared by every quote entry point, plus the HTTP
//! handler that exposes it.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculators::{bill_of_materials, calculate_quote, round_money, BillOfMaterials, Quote};
pub use models::{DurationUnit, FeetOption, FenceType, LineCategory, LineItem, PurchaseOption, QuoteConfiguration};
pub use routes::router;
