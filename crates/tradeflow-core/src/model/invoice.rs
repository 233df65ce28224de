//! Invoices and factoring offers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ensure_amount, FinanceError, FinanceResult};
use crate::types::{Currency, Date, InvoiceId, LineItem, ParticipantId};

const ENTITY: &str = "invoice";

/// Invoice lifecycle status.
///
/// ```text
/// pending  -> approved | factored | overdue
/// approved -> paid | overdue
/// factored -> paid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, awaiting buyer acceptance.
    Pending,
    /// Accepted by the buyer.
    Approved,
    /// Sold to a financier at a discount.
    Factored,
    /// Settled.
    Paid,
    /// Due date passed without settlement.
    Overdue,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Factored => "factored",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        };
        f.write_str(name)
    }
}

/// Discount offered for immediate cash against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoringOffer {
    /// Fee rate in percent of face amount.
    pub fee_rate: Decimal,
    /// Amount paid out to the supplier.
    pub net_payout: Decimal,
    /// Date the offer was attached.
    pub offered_on: Date,
}

/// Net payout after deducting a percentage fee: `amount * (1 - fee/100)`.
pub fn net_payout(amount: Decimal, fee_rate_percent: Decimal) -> FinanceResult<Decimal> {
    fee_rate_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fee| Decimal::ONE.checked_sub(fee))
        .and_then(|retained| amount.checked_mul(retained))
        .ok_or_else(|| FinanceError::invalid_input("amount", format!("net payout of {amount} overflows")))
}

/// An invoice issued by a supplier to a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Engine-assigned id.
    pub id: InvoiceId,
    /// Issuing supplier.
    pub supplier_id: ParticipantId,
    /// Paying buyer.
    pub buyer_id: ParticipantId,
    /// Face amount.
    pub amount: Decimal,
    /// Invoice currency.
    pub currency: Currency,
    /// Issue date.
    pub issue_date: Date,
    /// Due date.
    pub due_date: Date,
    /// Current status.
    pub status: InvoiceStatus,
    /// Invoiced goods.
    pub items: Vec<LineItem>,
    /// Factoring offer, if one has been made.
    pub factoring: Option<FactoringOffer>,
    /// Date the invoice was factored.
    pub factored_on: Option<Date>,
    /// Date settlement was recorded.
    pub paid_on: Option<Date>,
}

/// Request to issue an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvoice {
    /// Issuing supplier.
    pub supplier_id: ParticipantId,
    /// Paying buyer.
    pub buyer_id: ParticipantId,
    /// Face amount.
    pub amount: Decimal,
    /// Invoice currency.
    #[serde(default)]
    pub currency: Currency,
    /// Issue date.
    pub issue_date: Date,
    /// Due date.
    pub due_date: Date,
    /// Invoiced goods.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl NewInvoice {
    /// Validates amounts, dates and line items.
    pub fn validate(&self) -> FinanceResult<()> {
        ensure_amount("amount", self.amount)?;
        if self.due_date < self.issue_date {
            return Err(FinanceError::invalid_input(
                "due_date",
                format!(
                    "due date {} precedes issue date {}",
                    self.due_date, self.issue_date
                ),
            ));
        }
        if self.supplier_id == self.buyer_id {
            return Err(FinanceError::invalid_input(
                "buyer_id",
                "supplier and buyer must differ",
            ));
        }
        self.items.iter().try_for_each(LineItem::validate)
    }

    /// Materializes a pending invoice under the assigned id.
    #[must_use]
    pub fn into_invoice(self, id: InvoiceId) -> Invoice {
        Invoice {
            id,
            supplier_id: self.supplier_id,
            buyer_id: self.buyer_id,
            amount: self.amount,
            currency: self.currency,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status: InvoiceStatus::Pending,
            items: self.items,
            factoring: None,
            factored_on: None,
            paid_on: None,
        }
    }
}

impl Invoice {
    /// Attaches (or replaces) a factoring offer. Only legal while pending.
    pub fn offer_factoring(&mut self, fee_rate: Decimal, today: Date) -> FinanceResult<()> {
        if self.status != InvoiceStatus::Pending {
            return Err(self.invalid_state("offer factoring on"));
        }
        if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE_HUNDRED {
            return Err(FinanceError::invalid_input(
                "fee_rate",
                format!("must be in [0, 100), got {fee_rate}"),
            ));
        }
        let net_payout = net_payout(self.amount, fee_rate)?;
        self.factoring = Some(FactoringOffer {
            fee_rate,
            net_payout,
            offered_on: today,
        });
        Ok(())
    }

    /// pending -> factored. Requires an attached offer.
    pub fn factor(&mut self, today: Date) -> FinanceResult<()> {
        if self.status != InvoiceStatus::Pending {
            return Err(self.invalid_state("factor"));
        }
        if self.factoring.is_none() {
            return Err(FinanceError::NoFactoringOffer {
                invoice_id: self.id.to_string(),
            });
        }
        self.status = InvoiceStatus::Factored;
        self.factored_on = Some(today);
        Ok(())
    }

    /// pending -> approved (buyer acceptance).
    pub fn approve(&mut self) -> FinanceResult<()> {
        if self.status != InvoiceStatus::Pending {
            return Err(self.invalid_state("approve"));
        }
        self.status = InvoiceStatus::Approved;
        Ok(())
    }

    /// approved | factored -> paid (settlement callback).
    pub fn mark_paid(&mut self, today: Date) -> FinanceResult<()> {
        match self.status {
            InvoiceStatus::Approved | InvoiceStatus::Factored => {
                self.status = InvoiceStatus::Paid;
                self.paid_on = Some(today);
                Ok(())
            }
            _ => Err(self.invalid_state("mark paid")),
        }
    }

    /// pending | approved -> overdue once the due date has passed.
    ///
    /// Idempotent; returns whether the status changed. Paid, factored and
    /// not-yet-due invoices are left untouched.
    pub fn mark_overdue(&mut self, today: Date) -> bool {
        if self.is_past_due(today) {
            self.status = InvoiceStatus::Overdue;
            true
        } else {
            false
        }
    }

    /// True if the invoice is still open (pending or approved) after its due date.
    #[must_use]
    pub fn is_past_due(&self, today: Date) -> bool {
        matches!(self.status, InvoiceStatus::Pending | InvoiceStatus::Approved)
            && today > self.due_date
    }

    /// True once the invoice has been sold to a financier, even if later paid.
    #[must_use]
    pub fn was_factored(&self) -> bool {
        self.factored_on.is_some()
    }

    fn invalid_state(&self, operation: &'static str) -> FinanceError {
        FinanceError::invalid_state(ENTITY, self.id.as_str(), self.status, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn sample() -> Invoice {
        NewInvoice {
            supplier_id: ParticipantId::from_sequence(1),
            buyer_id: ParticipantId::from_sequence(2),
            amount: dec!(25000),
            currency: Currency::USD,
            issue_date: d(2025, 1, 10),
            due_date: d(2025, 2, 9),
            items: vec![LineItem::new("Textiles", dec!(500), dec!(50))],
        }
        .into_invoice(InvoiceId::from_sequence(1))
    }

    #[test]
    fn test_net_payout() {
        assert_eq!(net_payout(dec!(25000), dec!(3.5)).unwrap(), dec!(24125));
        assert!(net_payout(Decimal::MAX, dec!(-100)).is_err());
    }

    #[test]
    fn test_offer_then_factor() {
        let mut inv = sample();
        inv.offer_factoring(dec!(3.5), d(2025, 1, 11)).unwrap();
        assert_eq!(inv.factoring.as_ref().unwrap().net_payout, dec!(24125.000));
        inv.factor(d(2025, 1, 12)).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Factored);
        assert!(inv.was_factored());
    }

    #[test]
    fn test_factor_without_offer() {
        let mut inv = sample();
        assert!(matches!(
            inv.factor(d(2025, 1, 12)),
            Err(FinanceError::NoFactoringOffer { .. })
        ));
        assert_eq!(inv.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_factor_twice_is_invalid_state() {
        let mut inv = sample();
        inv.offer_factoring(dec!(2), d(2025, 1, 11)).unwrap();
        inv.factor(d(2025, 1, 12)).unwrap();
        assert!(matches!(
            inv.factor(d(2025, 1, 13)),
            Err(FinanceError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_offer_rejected_after_approval() {
        let mut inv = sample();
        inv.approve().unwrap();
        assert!(matches!(
            inv.offer_factoring(dec!(2), d(2025, 1, 11)),
            Err(FinanceError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_mark_overdue_is_idempotent() {
        let mut inv = sample();
        assert!(!inv.mark_overdue(d(2025, 2, 9)));
        assert!(inv.mark_overdue(d(2025, 2, 10)));
        assert!(!inv.mark_overdue(d(2025, 2, 11)));
        assert_eq!(inv.status, InvoiceStatus::Overdue);
    }

    #[test]
    fn test_mark_overdue_skips_factored() {
        let mut inv = sample();
        inv.offer_factoring(dec!(2), d(2025, 1, 11)).unwrap();
        inv.factor(d(2025, 1, 12)).unwrap();
        assert!(!inv.mark_overdue(d(2025, 3, 1)));
        assert_eq!(inv.status, InvoiceStatus::Factored);
    }

    #[test]
    fn test_mark_paid_from_pending_rejected() {
        let mut inv = sample();
        assert!(inv.mark_paid(d(2025, 1, 20)).is_err());
        inv.approve().unwrap();
        inv.mark_paid(d(2025, 1, 20)).unwrap();
        assert_eq!(inv.paid_on, Some(d(2025, 1, 20)));
    }

    #[test]
    fn test_new_invoice_rejects_inverted_dates() {
        let req = NewInvoice {
            supplier_id: ParticipantId::from_sequence(1),
            buyer_id: ParticipantId::from_sequence(2),
            amount: dec!(100),
            currency: Currency::USD,
            issue_date: d(2025, 2, 1),
            due_date: d(2025, 1, 1),
            items: vec![],
        };
        assert!(matches!(
            req.validate(),
            Err(FinanceError::InvalidInput { field: "due_date", .. })
        ));
    }
}
