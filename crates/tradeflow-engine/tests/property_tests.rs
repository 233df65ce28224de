//! Property-based tests for rate and schedule invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use tradeflow_core::model::InstallmentStatus;
use tradeflow_core::types::Date;
use tradeflow_engine::{financing_rate, flat_rate_schedule, inventory_financing_rate};

proptest! {
    #[test]
    fn po_rate_non_increasing_in_rating(rating in 1u8..10) {
        let lower = financing_rate(rating).unwrap();
        let higher = financing_rate(rating + 1).unwrap();
        prop_assert!(higher <= lower);
    }

    #[test]
    fn inventory_rate_non_increasing_in_rating(rating in 1u8..10) {
        let lower = inventory_financing_rate(rating).unwrap();
        let higher = inventory_financing_rate(rating + 1).unwrap();
        prop_assert!(higher <= lower);
    }

    #[test]
    fn ratings_outside_range_rejected(rating in 11u8..=255) {
        prop_assert!(financing_rate(rating).is_err());
        prop_assert!(inventory_financing_rate(rating).is_err());
    }

    #[test]
    fn schedule_sums_to_principal(
        cents in 1i64..=1_000_000_000,
        rate_bp in 0i64..=3000,
        term in 1u32..=60,
        day in 1u32..=31,
    ) {
        let principal = Decimal::new(cents, 2);
        let rate = Decimal::new(rate_bp, 2);
        let approval = Date::from_ymd(2025, 1, day.min(28)).unwrap();

        let schedule = flat_rate_schedule(principal, rate, term, approval, 2).unwrap();

        prop_assert_eq!(schedule.len(), term as usize);
        let total: Decimal = schedule.iter().map(|i| i.principal).sum();
        prop_assert_eq!(total, principal);
        for (i, installment) in schedule.iter().enumerate() {
            prop_assert!(installment.principal >= Decimal::ZERO);
            prop_assert_eq!(installment.amount, installment.principal + installment.interest);
            prop_assert_eq!(installment.status, InstallmentStatus::Pending);
            prop_assert_eq!(installment.interest, schedule[0].interest);
            if i > 0 {
                prop_assert!(installment.due_date > schedule[i - 1].due_date);
            }
        }
    }
}

#[test]
fn rate_endpoints() {
    assert_eq!(financing_rate(10).unwrap(), Decimal::new(50, 1));
    assert_eq!(financing_rate(1).unwrap(), Decimal::new(95, 1));
}
