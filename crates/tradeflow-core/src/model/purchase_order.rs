//! Purchase orders and PO financing terms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ensure_amount, FinanceError, FinanceResult};
use crate::types::{Currency, Date, LineItem, ParticipantId, PurchaseOrderId};

const ENTITY: &str = "purchase order";

/// Purchase order lifecycle status.
///
/// Transitions only move forward:
/// `draft -> sent -> confirmed -> financed -> delivered -> completed`.
/// Financing may be requested from any of draft, sent or confirmed, and an
/// unfinanced confirmed order may go straight to delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    /// Being drafted by the buyer.
    Draft,
    /// Sent to the supplier.
    Sent,
    /// Confirmed by the supplier.
    Confirmed,
    /// Financing approved and attached.
    Financed,
    /// Goods delivered.
    Delivered,
    /// Closed out.
    Completed,
}

impl PurchaseOrderStatus {
    /// True while financing may still be requested.
    #[must_use]
    pub fn accepts_financing(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Confirmed)
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::Financed => "financed",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Financing attached to a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Financing was requested.
    pub requested: bool,
    /// Financing was approved.
    pub approved: bool,
    /// Financed amount.
    pub amount: Decimal,
    /// Annual rate in percent.
    pub rate: Decimal,
    /// Approval date.
    pub approved_on: Date,
}

/// A purchase order from a buyer to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Engine-assigned id.
    pub id: PurchaseOrderId,
    /// Ordering buyer.
    pub buyer_id: ParticipantId,
    /// Fulfilling supplier.
    pub supplier_id: ParticipantId,
    /// Order value.
    pub amount: Decimal,
    /// Order currency.
    pub currency: Currency,
    /// Issue date.
    pub issue_date: Date,
    /// Expected delivery date.
    pub expected_delivery: Date,
    /// Current status.
    pub status: PurchaseOrderStatus,
    /// Ordered goods.
    pub items: Vec<LineItem>,
    /// Financing terms, once approved.
    pub financing: Option<FinancingTerms>,
}

/// Request to create a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchaseOrder {
    /// Ordering buyer.
    pub buyer_id: ParticipantId,
    /// Fulfilling supplier.
    pub supplier_id: ParticipantId,
    /// Order value.
    pub amount: Decimal,
    /// Order currency.
    #[serde(default)]
    pub currency: Currency,
    /// Issue date.
    pub issue_date: Date,
    /// Expected delivery date.
    pub expected_delivery: Date,
    /// Ordered goods.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl NewPurchaseOrder {
    /// Validates amounts, dates and line items.
    pub fn validate(&self) -> FinanceResult<()> {
        ensure_amount("amount", self.amount)?;
        if self.expected_delivery < self.issue_date {
            return Err(FinanceError::invalid_input(
                "expected_delivery",
                format!(
                    "expected delivery {} precedes issue date {}",
                    self.expected_delivery, self.issue_date
                ),
            ));
        }
        if self.buyer_id == self.supplier_id {
            return Err(FinanceError::invalid_input(
                "supplier_id",
                "buyer and supplier must differ",
            ));
        }
        self.items.iter().try_for_each(LineItem::validate)
    }

    /// Materializes a draft purchase order under the assigned id.
    #[must_use]
    pub fn into_purchase_order(self, id: PurchaseOrderId) -> PurchaseOrder {
        PurchaseOrder {
            id,
            buyer_id: self.buyer_id,
            supplier_id: self.supplier_id,
            amount: self.amount,
            currency: self.currency,
            issue_date: self.issue_date,
            expected_delivery: self.expected_delivery,
            status: PurchaseOrderStatus::Draft,
            items: self.items,
            financing: None,
        }
    }
}

impl PurchaseOrder {
    /// Checks a financing request against the order value.
    ///
    /// Runs before any status check, so an oversized request always reports
    /// `FinancingExceedsOrderValue`.
    pub fn check_financing_amount(&self, requested: Decimal) -> FinanceResult<()> {
        if requested > self.amount {
            return Err(FinanceError::FinancingExceedsOrderValue {
                requested,
                order_value: self.amount,
            });
        }
        ensure_amount("requested_amount", requested)?;
        Ok(())
    }

    /// Fails unless financing may be requested in the current status.
    pub fn ensure_accepts_financing(&self) -> FinanceResult<()> {
        if self.status.accepts_financing() {
            Ok(())
        } else {
            Err(self.invalid_state("request financing on"))
        }
    }

    /// Attaches approved financing and moves to `financed`.
    pub fn apply_financing(
        &mut self,
        amount: Decimal,
        rate: Decimal,
        today: Date,
    ) -> FinanceResult<()> {
        self.check_financing_amount(amount)?;
        self.ensure_accepts_financing()?;
        self.financing = Some(FinancingTerms {
            requested: true,
            approved: true,
            amount,
            rate,
            approved_on: today,
        });
        self.status = PurchaseOrderStatus::Financed;
        Ok(())
    }

    /// draft -> sent.
    pub fn send(&mut self) -> FinanceResult<()> {
        self.advance(&[PurchaseOrderStatus::Draft], PurchaseOrderStatus::Sent, "send")
    }

    /// sent -> confirmed.
    pub fn confirm(&mut self) -> FinanceResult<()> {
        self.advance(
            &[PurchaseOrderStatus::Sent],
            PurchaseOrderStatus::Confirmed,
            "confirm",
        )
    }

    /// confirmed | financed -> delivered.
    pub fn mark_delivered(&mut self) -> FinanceResult<()> {
        self.advance(
            &[PurchaseOrderStatus::Confirmed, PurchaseOrderStatus::Financed],
            PurchaseOrderStatus::Delivered,
            "mark delivered",
        )
    }

    /// delivered -> completed.
    pub fn complete(&mut self) -> FinanceResult<()> {
        self.advance(
            &[PurchaseOrderStatus::Delivered],
            PurchaseOrderStatus::Completed,
            "complete",
        )
    }

    /// Amount financed, if financing was approved.
    #[must_use]
    pub fn financed_amount(&self) -> Option<Decimal> {
        self.financing
            .as_ref()
            .filter(|terms| terms.approved)
            .map(|terms| terms.amount)
    }

    fn advance(
        &mut self,
        from: &[PurchaseOrderStatus],
        to: PurchaseOrderStatus,
        operation: &'static str,
    ) -> FinanceResult<()> {
        if !from.contains(&self.status) {
            return Err(self.invalid_state(operation));
        }
        self.status = to;
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> FinanceError {
        FinanceError::invalid_state(ENTITY, self.id.as_str(), self.status, operation)
    }
}
