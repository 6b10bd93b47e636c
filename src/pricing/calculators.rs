//! Core pricing calculation functions.
//!
//! Pure functions for quote math - no network or storage access. Every
//! calculator entry point in the wizard prices through [`calculate_quote`].

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::delivery::DeliveryEstimate;
use crate::pricing::models::{
    DurationUnit, FeetOption, FenceType, LineCategory, LineItem, QuoteConfiguration,
};

pub const CLAMP_PRICE: Decimal = dec!(4);
pub const BRACE_PRICE: Decimal = dec!(35);
/// Weekly hire charge per panel on site
pub const HIRE_RATE_PER_PANEL_WEEK: Decimal = dec!(2);
/// Subtotals strictly above this earn the bulk discount
pub const DISCOUNT_THRESHOLD: Decimal = dec!(500);
pub const DISCOUNT_RATE: Decimal = dec!(0.05);
/// One brace per started run of this many panels
const PANELS_PER_BRACE: u32 = 7;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use fencequote_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Length in metres covered by one panel of the given fence type.
pub fn panel_length(fence_type: FenceType) -> Decimal {
    match fence_type {
        FenceType::Builders | FenceType::Premium => dec!(2.4),
        FenceType::Pool => dec!(2.3),
        FenceType::Crowd => dec!(2.2),
    }
}

pub fn panel_unit_price(fence_type: FenceType) -> Decimal {
    match fence_type {
        FenceType::Premium => dec!(80),
        FenceType::Pool => dec!(95),
        FenceType::Builders | FenceType::Crowd => dec!(50),
    }
}

pub fn feet_unit_price(feet_option: FeetOption) -> Decimal {
    match feet_option {
        FeetOption::HookStay => dec!(35),
        FeetOption::Feet => dec!(25),
    }
}

/// Builders and pool fencing need bracing; premium and crowd barriers don't.
pub fn needs_braces(fence_type: FenceType) -> bool {
    matches!(fence_type, FenceType::Builders | FenceType::Pool)
}

/// Item counts derived from the run length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillOfMaterials {
    pub panel_length: Decimal,
    pub panels: u32,
    pub feet: u32,
    pub clamps: u32,
    pub braces: u32,
}

/// Work out how many of each item a run of fencing needs.
///
/// Metres are clamped to the accepted range before dividing.
pub fn bill_of_materials(fence_type: FenceType, meters_required: Decimal) -> BillOfMaterials {
    let meters = meters_required.clamp(
        crate::pricing::models::MIN_METERS,
        crate::pricing::models::MAX_METERS,
    );
    let panel_length = panel_length(fence_type);
    let panels = (meters / panel_length).ceil().to_u32().unwrap_or(0);

    let braces = if needs_braces(fence_type) {
        panels.div_ceil(PANELS_PER_BRACE)
    } else {
        0
    };
    let clamps = if fence_type == FenceType::Crowd { 0 } else { panels };

    BillOfMaterials {
        panel_length,
        panels,
        feet: panels + 1,
        clamps,
        braces,
    }
}

/// Convert a hire duration into whole billable weeks, rounding up.
pub fn billable_weeks(duration: u32, unit: DurationUnit) -> u32 {
    match unit {
        DurationUnit::Days => duration.div_ceil(7),
        DurationUnit::Weeks => duration,
        DurationUnit::Months => (duration * 52).div_ceil(12),
    }
}

/// Bulk discount owed on a pre-discount subtotal.
pub fn discount_for(subtotal: Decimal) -> Decimal {
    if subtotal > DISCOUNT_THRESHOLD {
        round_money(subtotal * DISCOUNT_RATE, 2)
    } else {
        Decimal::ZERO
    }
}

/// A priced quote
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub items: Vec<LineItem>,
    pub materials: BillOfMaterials,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
}

impl Quote {
    /// Append a delivery line after the discount. Delivery is never discounted.
    pub fn with_delivery_fee(mut self, distance_km: f64, fee: Decimal, is_estimate: bool) -> Self {
        let mut item = LineItem::new(
            format!("Delivery ({distance_km:.1} km)"),
            LineCategory::Delivery,
            fee,
            1,
        );
        item.is_estimate = is_estimate;
        self.total_price += item.line_total();
        self.items.push(item);
        self
    }

    /// Append the delivery line for a resolved estimate. Invalid estimates
    /// (no address) leave the quote untouched.
    pub fn with_delivery(self, estimate: &DeliveryEstimate) -> Self {
        if estimate.error.is_some() {
            return self;
        }
        self.with_delivery_fee(estimate.distance_km, estimate.fee, estimate.using_fallback)
    }

    pub fn delivery_fee(&self) -> Option<Decimal> {
        self.items
            .iter()
            .find(|item| item.category == LineCategory::Delivery)
            .map(LineItem::line_total)
    }
}

/// Price a wizard configuration.
///
/// Input is clamped first, so any configuration produces a quote.
pub fn calculate_quote(config: &QuoteConfiguration) -> Quote {
    let config = config.clamped();
    let materials = bill_of_materials(config.fence_type, config.meters_required);

    let mut items = vec![
        LineItem::new(
            config.fence_type.display_name(),
            LineCategory::Panels,
            panel_unit_price(config.fence_type),
            materials.panels,
        ),
        LineItem::new(
            config.feet_option.display_name(),
            LineCategory::Feet,
            feet_unit_price(config.feet_option),
            materials.feet,
        ),
    ];

    if materials.clamps > 0 {
        items.push(LineItem::new(
            "Fence Clamps",
            LineCategory::Connectors,
            CLAMP_PRICE,
            materials.clamps,
        ));
    }

    if materials.braces > 0 {
        items.push(LineItem::new(
            "Fence Braces",
            LineCategory::Supports,
            BRACE_PRICE,
            materials.braces,
        ));
    }

    if config.is_hire() {
        items.push(LineItem::new(
            format!(
                "Hire period ({} {})",
                config.hire_units(),
                config.duration_unit.as_str()
            ),
            LineCategory::Services,
            HIRE_RATE_PER_PANEL_WEEK * Decimal::from(materials.panels),
            billable_weeks(config.hire_units(), config.duration_unit),
        ));
    }

    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let discount = discount_for(subtotal);

    if discount > Decimal::ZERO {
        items.push(LineItem::new(
            "Bulk order discount (5%)",
            LineCategory::Discount,
            -discount,
            1,
        ));
    }

    Quote {
        items,
        materials,
        subtotal,
        discount,
        total_price: subtotal - discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::PurchaseOption;

    fn config(fence_type: FenceType, meters: Decimal) -> QuoteConfiguration {
        QuoteConfiguration {
            fence_type,
            feet_option: FeetOption::Feet,
            meters_required: meters,
            option: PurchaseOption::Purchase,
            hire_duration: dec!(1),
            duration_unit: DurationUnit::Weeks,
        }
    }

    const ALL_TYPES: [FenceType; 4] = [
        FenceType::Builders,
        FenceType::Premium,
        FenceType::Pool,
        FenceType::Crowd,
    ];

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.125), 2), dec!(2.12));
        assert_eq!(round_money(dec!(2.135), 2), dec!(2.14));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(-1.234), 2), dec!(-1.23));
    }

    // ==================== bill_of_materials tests ====================

    #[test]
    fn test_panel_lengths() {
        assert_eq!(panel_length(FenceType::Builders), dec!(2.4));
        assert_eq!(panel_length(FenceType::Premium), dec!(2.4));
        assert_eq!(panel_length(FenceType::Pool), dec!(2.3));
        assert_eq!(panel_length(FenceType::Crowd), dec!(2.2));
    }

    #[test]
    fn test_builders_100_meters() {
        let bom = bill_of_materials(FenceType::Builders, dec!(100));
        assert_eq!(bom.panel_length, dec!(2.4));
        assert_eq!(bom.panels, 42);
        assert_eq!(bom.feet, 43);
        assert_eq!(bom.braces, 6);
        assert_eq!(bom.clamps, 42);
    }

    #[test]
    fn test_exact_multiple_does_not_round_up() {
        // 12 / 2.4 is exactly 5 in decimal arithmetic
        assert_eq!(bill_of_materials(FenceType::Builders, dec!(12)).panels, 5);
        assert_eq!(bill_of_materials(FenceType::Pool, dec!(23)).panels, 10);
        assert_eq!(bill_of_materials(FenceType::Crowd, dec!(22)).panels, 10);
    }

    #[test]
    fn test_panel_and_feet_counts_cover_the_run() {
        for fence_type in ALL_TYPES {
            let length = panel_length(fence_type);
            for meters in (1..=800).map(Decimal::from).chain([dec!(1.5), dec!(7.25), dec!(799.9)]) {
                let bom = bill_of_materials(fence_type, meters);
                let panels = Decimal::from(bom.panels);
                assert!(panels * length >= meters, "{fence_type:?} {meters}m too short");
                assert!((panels - Decimal::ONE) * length < meters, "{fence_type:?} {meters}m too long");
                assert_eq!(bom.feet, bom.panels + 1);
            }
        }
    }

    #[test]
    fn test_braces_and_clamps_by_type() {
        for meters in [dec!(1), dec!(17), dec!(100), dec!(800)] {
            let crowd = bill_of_materials(FenceType::Crowd, meters);
            assert_eq!(crowd.clamps, 0);
            assert_eq!(crowd.braces, 0);

            let premium = bill_of_materials(FenceType::Premium, meters);
            assert_eq!(premium.braces, 0);
            assert_eq!(premium.clamps, premium.panels);

            for fence_type in [FenceType::Builders, FenceType::Pool] {
                let bom = bill_of_materials(fence_type, meters);
                assert_eq!(bom.braces, bom.panels.div_ceil(7));
                assert_eq!(bom.clamps, bom.panels);
            }
        }
    }

    #[test]
    fn test_meters_clamped_to_range() {
        assert_eq!(bill_of_materials(FenceType::Builders, dec!(0)).panels, 1);
        assert_eq!(bill_of_materials(FenceType::Builders, dec!(-20)).panels, 1);
        assert_eq!(
            bill_of_materials(FenceType::Builders, dec!(5000)).panels,
            bill_of_materials(FenceType::Builders, dec!(800)).panels
        );
    }

    // ==================== billable_weeks tests ====================

    #[test]
    fn test_billable_weeks() {
        assert_eq!(billable_weeks(7, DurationUnit::Days), 1);
        assert_eq!(billable_weeks(10, DurationUnit::Days), 2);
        assert_eq!(billable_weeks(6, DurationUnit::Weeks), 6);
        assert_eq!(billable_weeks(1, DurationUnit::Months), 5);
        assert_eq!(billable_weeks(3, DurationUnit::Months), 13);
        assert_eq!(billable_weeks(24, DurationUnit::Months), 104);
    }

    // ==================== discount tests ====================

    #[test]
    fn test_discount_threshold_is_exclusive() {
        assert_eq!(discount_for(dec!(500)), dec!(0));
        assert_eq!(discount_for(dec!(499)), dec!(0));
        assert_eq!(discount_for(dec!(501)), dec!(25.05));
        assert_eq!(discount_for(dec!(3553)), dec!(177.65));
    }

    // ==================== calculate_quote tests ====================

    #[test]
    fn test_quote_builders_100_meters() {
        let quote = calculate_quote(&config(FenceType::Builders, dec!(100)));

        // 42*50 + 43*25 + 42*4 + 6*35
        assert_eq!(quote.subtotal, dec!(3553));
        assert_eq!(quote.discount, dec!(177.65));
        assert_eq!(quote.total_price, dec!(3375.35));

        let categories: Vec<LineCategory> = quote.items.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                LineCategory::Panels,
                LineCategory::Feet,
                LineCategory::Connectors,
                LineCategory::Supports,
                LineCategory::Discount,
            ]
        );
        assert_eq!(quote.items[4].unit_price, dec!(-177.65));
    }

    #[test]
    fn test_quote_below_threshold_has_no_discount_line() {
        let quote = calculate_quote(&config(FenceType::Builders, dec!(10)));
        // 5*50 + 6*25 + 5*4 + 1*35
        assert_eq!(quote.subtotal, dec!(455));
        assert_eq!(quote.discount, dec!(0));
        assert_eq!(quote.total_price, dec!(455));
        assert!(quote.items.iter().all(|i| i.category != LineCategory::Discount));
    }

    #[test]
    fn test_quote_crowd_omits_clamps_and_braces() {
        let quote = calculate_quote(&config(FenceType::Crowd, dec!(22)));
        assert_eq!(quote.items.len(), 2);
        // 10*50 + 11*25
        assert_eq!(quote.subtotal, dec!(775));
        assert_eq!(quote.discount, dec!(38.75));
        assert_eq!(quote.total_price, dec!(736.25));
    }

    #[test]
    fn test_quote_premium_hook_stay_prices() {
        let mut cfg = config(FenceType::Premium, dec!(24));
        cfg.feet_option = FeetOption::HookStay;
        let quote = calculate_quote(&cfg);
        // 10*80 + 11*35 + 10*4
        assert_eq!(quote.subtotal, dec!(1225));
        assert_eq!(quote.items[0].unit_price, dec!(80));
        assert_eq!(quote.items[1].unit_price, dec!(35));
    }

    #[test]
    fn test_quote_pool_panel_price() {
        let quote = calculate_quote(&config(FenceType::Pool, dec!(23)));
        assert_eq!(quote.items[0].unit_price, dec!(95));
        assert_eq!(quote.materials.braces, 2);
    }

    #[test]
    fn test_subtotal_is_sum_of_lines() {
        for fence_type in ALL_TYPES {
            for meters in [dec!(3), dec!(48), dec!(333.3)] {
                let quote = calculate_quote(&config(fence_type, meters));
                let non_discount: Decimal = quote
                    .items
                    .iter()
                    .filter(|i| i.category != LineCategory::Discount)
                    .map(LineItem::line_total)
                    .sum();
                assert_eq!(non_discount, quote.subtotal);
                assert_eq!(quote.total_price, quote.subtotal - quote.discount);
                if quote.subtotal > dec!(500) {
                    assert_eq!(quote.discount, quote.subtotal * dec!(0.05));
                }
            }
        }
    }

    #[test]
    fn test_hire_adds_service_line() {
        let mut cfg = config(FenceType::Builders, dec!(10));
        cfg.option = PurchaseOption::Hire;
        cfg.hire_duration = dec!(2);
        let quote = calculate_quote(&cfg);

        let hire = quote
            .items
            .iter()
            .find(|i| i.category == LineCategory::Services)
            .expect("hire line");
        assert_eq!(hire.unit_price, dec!(10)); // 5 panels * $2
        assert_eq!(hire.quantity, 2);
        assert_eq!(hire.name, "Hire period (2 weeks)");
        assert_eq!(quote.subtotal, dec!(475));
        assert_eq!(quote.total_price, dec!(475));
    }

    #[test]
    fn test_hire_in_months_crosses_threshold() {
        let mut cfg = config(FenceType::Builders, dec!(10));
        cfg.option = PurchaseOption::Hire;
        cfg.hire_duration = dec!(1);
        cfg.duration_unit = DurationUnit::Months;
        let quote = calculate_quote(&cfg);
        // 455 + 10*5 weeks
        assert_eq!(quote.subtotal, dec!(505));
        assert_eq!(quote.discount, dec!(25.25));
        assert_eq!(quote.total_price, dec!(479.75));
    }

    #[test]
    fn test_purchase_ignores_hire_duration() {
        let mut cfg = config(FenceType::Builders, dec!(10));
        cfg.hire_duration = dec!(52);
        let quote = calculate_quote(&cfg);
        assert!(quote.items.iter().all(|i| i.category != LineCategory::Services));
    }

    #[test]
    fn test_with_delivery_fee_is_not_discounted() {
        let quote = calculate_quote(&config(FenceType::Builders, dec!(100)))
            .with_delivery_fee(72.5, dec!(145), true);

        let last = quote.items.last().unwrap();
        assert_eq!(last.category, LineCategory::Delivery);
        assert!(last.is_estimate);
        assert_eq!(last.name, "Delivery (72.5 km)");
        assert_eq!(quote.discount, dec!(177.65));
        assert_eq!(quote.total_price, dec!(3520.35));
        assert_eq!(quote.delivery_fee(), Some(dec!(145)));
    }

    #[test]
    fn test_with_delivery_skips_invalid_estimate() {
        let quote = calculate_quote(&config(FenceType::Premium, dec!(10)));
        let before = quote.total_price;

        let quote = quote.with_delivery(&DeliveryEstimate::invalid("Delivery address is required"));
        assert_eq!(quote.total_price, before);
        assert!(quote.delivery_fee().is_none());

        let quote = quote.with_delivery(&DeliveryEstimate::resolved(20.0, false));
        assert_eq!(quote.total_price, before + dec!(100));
        assert!(!quote.items.last().unwrap().is_estimate);
    }
}
