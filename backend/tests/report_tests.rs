//! KPI aggregation tests
//!
//! Covers the pure arithmetic behind the report service:
//! - profit contribution per sale
//! - stock totals folding per kind and unit
//! - window boundary semantics shared with the list filters

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    day_bounds, profit_contribution, MeasurementUnit, StockKind, StockTotals,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario: one sale of 10 units bought at 1000 and sold at 1500
    /// contributes +5000 to total profit
    #[test]
    fn test_profit_single_sale() {
        assert_eq!(
            profit_contribution(dec("1500"), dec("1000"), dec("10")),
            dec("5000")
        );
    }

    #[test]
    fn test_profit_can_be_negative() {
        assert_eq!(
            profit_contribution(dec("800"), dec("1000"), dec("5")),
            dec("-1000")
        );
    }

    #[test]
    fn test_profit_sums_across_sales() {
        let sales = [
            (dec("1500"), dec("1000"), dec("10")),
            (dec("120"), dec("100"), dec("3")),
            (dec("90"), dec("100"), dec("2")),
        ];

        let total: Decimal = sales
            .iter()
            .map(|(sell, buy, qty)| profit_contribution(*sell, *buy, *qty))
            .sum();

        // 5000 + 60 - 20
        assert_eq!(total, dec("5040"));
    }

    #[test]
    fn test_stock_totals_buckets() {
        let mut totals = StockTotals::default();
        totals.add(StockKind::RawMaterial, MeasurementUnit::Kg, dec("100"));
        totals.add(StockKind::RawMaterial, MeasurementUnit::Unit, dec("8"));
        totals.add(StockKind::Product, MeasurementUnit::Kg, dec("42.5"));
        totals.add(StockKind::Product, MeasurementUnit::Unit, dec("7"));
        totals.add(StockKind::RawMaterial, MeasurementUnit::Kg, dec("-30"));

        assert_eq!(totals.raw_kg, dec("70"));
        assert_eq!(totals.raw_unit, dec("8"));
        assert_eq!(totals.product_kg, dec("42.5"));
        assert_eq!(totals.product_unit, dec("7"));
    }

    /// A deleted batch simply stops contributing: folding without it is the
    /// same as never having added it
    #[test]
    fn test_deleted_batch_excluded_from_totals() {
        let mut with_batch = StockTotals::default();
        with_batch.add(StockKind::Product, MeasurementUnit::Unit, dec("100"));
        with_batch.add(StockKind::Product, MeasurementUnit::Unit, dec("50"));

        let mut without_batch = StockTotals::default();
        without_batch.add(StockKind::Product, MeasurementUnit::Unit, dec("50"));

        assert_eq!(with_batch.product_unit - dec("100"), without_batch.product_unit);
    }

    /// The KPI window uses the same inclusive day bounds as list filters
    #[test]
    fn test_window_bounds_match_list_semantics() {
        let (from, to) = day_bounds(Some("2025-06-01"), Some("2025-06-30"));
        let from = from.unwrap();
        let to = to.unwrap();

        // a sale at 2025-06-30 23:59:59.500 is inside the window
        assert!(from < to);
        assert_eq!(to.timestamp_millis() % 1000, 999);
    }

    #[test]
    fn test_open_window_means_no_bounds() {
        assert_eq!(day_bounds(None, None), (None, None));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Profit is linear in quantity
    #[test]
    fn prop_profit_linear_in_quantity(
        sell in 0u64..100_000,
        buy in 1u64..100_000,
        qty in 1u64..10_000,
    ) {
        let sell = Decimal::from(sell);
        let buy = Decimal::from(buy);
        let qty = Decimal::from(qty);

        let unit_margin = profit_contribution(sell, buy, Decimal::ONE);
        prop_assert_eq!(profit_contribution(sell, buy, qty), unit_margin * qty);
    }

    /// Folding quantities into totals is order-independent per bucket
    #[test]
    fn prop_totals_accumulate(quantities in proptest::collection::vec(0u64..100_000, 0..50)) {
        let mut totals = StockTotals::default();
        let mut expected = Decimal::ZERO;

        for q in &quantities {
            let q = Decimal::from(*q);
            totals.add(StockKind::RawMaterial, MeasurementUnit::Kg, q);
            expected += q;
        }

        prop_assert_eq!(totals.raw_kg, expected);
        prop_assert_eq!(totals.product_kg, Decimal::ZERO);
    }
}
