//! Property-based tests for tiered charge resolution
//!
//! Uses proptest to generate threshold tables and subtotals

use printdesk::charges::{resolve_charge, ChargeThreshold};
use printdesk::{ChargeKind, PricingPolicy};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Cents in 0..=1_000_000 as a two-place decimal
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn any_table() -> impl Strategy<Value = Vec<ChargeThreshold>> {
    prop::collection::vec(
        (amount(), amount()).prop_map(|(min_amount, charge)| ChargeThreshold {
            min_amount,
            charge,
        }),
        0..8,
    )
}

/// Table with a zero tier and charges that never rise
fn falling_table() -> impl Strategy<Value = Vec<ChargeThreshold>> {
    prop::collection::btree_map(1i64..=1_000_000, 0i64..=10_000, 0..6).prop_flat_map(|tiers| {
        let mut mins: Vec<i64> = tiers.keys().copied().collect();
        mins.insert(0, 0);
        let mut charges: Vec<i64> = tiers.values().copied().collect();
        charges.push(10_000);
        charges.sort_unstable_by(|a, b| b.cmp(a));
        let table: Vec<ChargeThreshold> = mins
            .into_iter()
            .zip(charges)
            .map(|(min, charge)| ChargeThreshold {
                min_amount: Decimal::new(min, 2),
                charge: Decimal::new(charge, 2),
            })
            .collect();
        Just(table).prop_shuffle()
    })
}

proptest! {
    #[test]
    fn test_charge_never_negative(table in any_table(), subtotal in amount()) {
        prop_assert!(resolve_charge(&table, subtotal) >= Decimal::ZERO);
    }

    #[test]
    fn test_charge_comes_from_table_or_zero(table in any_table(), subtotal in amount()) {
        let charge = resolve_charge(&table, subtotal);
        prop_assert!(charge.is_zero() || table.iter().any(|t| t.charge == charge));
    }

    #[test]
    fn test_selected_tier_is_highest_reached(table in any_table(), subtotal in amount()) {
        let reached: Vec<&ChargeThreshold> =
            table.iter().filter(|t| t.min_amount <= subtotal).collect();
        let charge = resolve_charge(&table, subtotal);
        match reached.iter().map(|t| t.min_amount).max() {
            None => prop_assert_eq!(charge, Decimal::ZERO),
            Some(top) => {
                prop_assert!(reached.iter().any(|t| t.min_amount == top && t.charge == charge));
            }
        }
    }

    #[test]
    fn test_monotone_for_falling_tables(
        table in falling_table(),
        a in amount(),
        b in amount(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(resolve_charge(&table, low) >= resolve_charge(&table, high));
    }

    #[test]
    fn test_delivery_disabled_is_free(table in any_table(), subtotal in amount()) {
        let mut policy = PricingPolicy::with_defaults(chrono::Utc::now());
        policy.delivery_thresholds = table;
        policy.is_delivery_enabled = false;
        prop_assert_eq!(policy.charge_for(ChargeKind::Delivery, subtotal), Decimal::ZERO);
    }
}
