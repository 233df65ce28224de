//! Flat-rate repayment schedule generation.
//!
//! Interest is charged on the original principal for every month of the
//! term, not on the declining balance:
//!
//! ```text
//! monthly principal = principal / term
//! monthly interest  = principal * rate / 100 / 12
//! due date (i)      = approval date + i months, i = 1..=term
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use tradeflow_core::model::{Installment, InstallmentStatus};
use tradeflow_core::{Date, FinanceError, FinanceResult};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Generates a flat-rate schedule of `term_months` pending installments.
///
/// Monthly principal is truncated to `scale` decimal places and the final
/// installment takes the remainder, so the principal portions always sum to
/// `principal` exactly. Monthly interest is rounded half away from zero to
/// `scale` places and is the same for every installment. Amounts too large
/// to schedule are rejected with `InvalidInput` instead of overflowing.
pub fn flat_rate_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
    approval_date: Date,
    scale: u32,
) -> FinanceResult<Vec<Installment>> {
    if term_months == 0 {
        return Err(FinanceError::invalid_input(
            "term_months",
            "must be at least 1",
        ));
    }
    if principal <= Decimal::ZERO {
        return Err(FinanceError::invalid_input(
            "principal",
            format!("must be positive, got {principal}"),
        ));
    }

    let monthly_principal = principal
        .checked_div(Decimal::from(term_months))
        .ok_or_else(|| overflow(principal))?
        .round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    let monthly_interest = principal
        .checked_mul(annual_rate_percent)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|v| v.checked_div(MONTHS_PER_YEAR))
        .ok_or_else(|| overflow(principal))?
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let final_principal = monthly_principal
        .checked_mul(Decimal::from(term_months - 1))
        .and_then(|paid| principal.checked_sub(paid))
        .ok_or_else(|| overflow(principal))?;

    (1..=term_months)
        .map(|number| {
            let principal_part = if number == term_months {
                final_principal
            } else {
                monthly_principal
            };
            Ok(Installment {
                number,
                due_date: approval_date.add_months(month_offset(number)?)?,
                amount: principal_part
                    .checked_add(monthly_interest)
                    .ok_or_else(|| overflow(principal))?,
                principal: principal_part,
                interest: monthly_interest,
                status: InstallmentStatus::Pending,
                paid_on: None,
            })
        })
        .collect()
}

fn overflow(principal: Decimal) -> FinanceError {
    FinanceError::invalid_input("principal", format!("{principal} is too large to schedule"))
}

fn month_offset(number: u32) -> FinanceResult<i32> {
    i32::try_from(number)
        .map_err(|_| FinanceError::invalid_input("term_months", format!("{number} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn approval() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_even_split() {
        let schedule = flat_rate_schedule(dec!(120000), dec!(8.6), 6, approval(), 2).unwrap();

        assert_eq!(schedule.len(), 6);
        for (i, inst) in schedule.iter().enumerate() {
            assert_eq!(inst.number, i as u32 + 1);
            assert_eq!(inst.principal, dec!(20000));
            assert_eq!(inst.interest, dec!(860));
            assert_eq!(inst.amount, dec!(20860));
            assert_eq!(inst.status, InstallmentStatus::Pending);
        }
        assert_eq!(schedule[0].due_date, Date::from_ymd(2025, 2, 15).unwrap());
        assert_eq!(schedule[5].due_date, Date::from_ymd(2025, 7, 15).unwrap());
    }

    #[test]
    fn test_residual_lands_on_last_installment() {
        let schedule = flat_rate_schedule(dec!(1000), dec!(9.5), 3, approval(), 2).unwrap();

        assert_eq!(schedule[0].principal, dec!(333.33));
        assert_eq!(schedule[1].principal, dec!(333.33));
        assert_eq!(schedule[2].principal, dec!(333.34));
        let total: Decimal = schedule.iter().map(|i| i.principal).sum();
        assert_eq!(total, dec!(1000));
        // 1000 * 9.5 / 100 / 12 = 7.9166..
        assert!(schedule.iter().all(|i| i.interest == dec!(7.92)));
    }

    #[test]
    fn test_tiny_principal_never_goes_negative() {
        let schedule = flat_rate_schedule(dec!(0.06), dec!(8), 12, approval(), 2).unwrap();
        assert!(schedule.iter().all(|i| i.principal >= Decimal::ZERO));
        let total: Decimal = schedule.iter().map(|i| i.principal).sum();
        assert_eq!(total, dec!(0.06));
    }

    #[test]
    fn test_month_end_due_dates_clamp() {
        let schedule = flat_rate_schedule(
            dec!(600),
            dec!(8),
            2,
            Date::from_ymd(2025, 1, 31).unwrap(),
            2,
        )
        .unwrap();
        assert_eq!(schedule[0].due_date, Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(schedule[1].due_date, Date::from_ymd(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_unrepresentable_interest_is_an_error() {
        let err = flat_rate_schedule(Decimal::MAX, dec!(8.6), 6, approval(), 2).unwrap_err();
        assert!(matches!(err, FinanceError::InvalidInput { field: "principal", .. }));
    }

    #[test]
    fn test_zero_term_rejected() {
        assert!(flat_rate_schedule(dec!(100), dec!(8), 0, approval(), 2).is_err());
    }
}
