//! Inventory-backed financing agreements and their repayment schedules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ensure_amount, FinanceError, FinanceResult};
use crate::types::{Date, FinancingId, ParticipantId};

const ENTITY: &str = "inventory financing";

/// Physical condition of a collateral item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollateralCondition {
    /// Unused stock.
    New,
    /// Good condition.
    Good,
    /// Usable with wear.
    Fair,
    /// Damaged or degraded.
    Poor,
}

/// A declared stock item pledged as collateral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralItem {
    /// Item name.
    pub name: String,
    /// Stock category (free text, e.g. "grain").
    pub category: String,
    /// Units held.
    pub quantity: Decimal,
    /// Value per unit.
    pub unit_value: Decimal,
    /// Physical condition.
    pub condition: CollateralCondition,
}

/// Agreement lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryFinancingStatus {
    /// Application received.
    Applied,
    /// Priced, schedule generated.
    Approved,
    /// Funds drawn down.
    Active,
    /// Every installment paid.
    Repaid,
    /// Declared in default.
    Defaulted,
}

impl fmt::Display for InventoryFinancingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Applied => "applied",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Repaid => "repaid",
            Self::Defaulted => "defaulted",
        };
        f.write_str(name)
    }
}

/// Installment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Not yet due or not yet paid.
    Pending,
    /// Paid.
    Paid,
    /// Past due and unpaid.
    Overdue,
}

/// One scheduled repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based installment number.
    pub number: u32,
    /// Due date.
    pub due_date: Date,
    /// Total due (principal + interest).
    pub amount: Decimal,
    /// Principal portion.
    pub principal: Decimal,
    /// Interest portion.
    pub interest: Decimal,
    /// Payment status.
    pub status: InstallmentStatus,
    /// Date payment was recorded.
    pub paid_on: Option<Date>,
}

/// An inventory-backed loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFinancing {
    /// Engine-assigned id.
    pub id: FinancingId,
    /// Borrowing participant.
    pub participant_id: ParticipantId,
    /// Declared inventory value.
    pub inventory_value: Decimal,
    /// Financing principal; never above `inventory_value`.
    pub principal: Decimal,
    /// Annual rate in percent, fixed at approval.
    pub interest_rate: Option<Decimal>,
    /// Term in months, fixed at approval.
    pub term_months: Option<u32>,
    /// Pledged stock.
    pub collateral: Vec<CollateralItem>,
    /// Current status.
    pub status: InventoryFinancingStatus,
    /// Application date.
    pub application_date: Date,
    /// Approval date.
    pub approval_date: Option<Date>,
    /// Repayment schedule; generated once at approval.
    pub schedule: Vec<Installment>,
}

/// Application for inventory-backed financing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryFinancing {
    /// Borrowing participant.
    pub participant_id: ParticipantId,
    /// Declared inventory value.
    pub inventory_value: Decimal,
    /// Requested principal.
    pub requested_amount: Decimal,
    /// Pledged stock.
    #[serde(default)]
    pub collateral: Vec<CollateralItem>,
}

impl NewInventoryFinancing {
    /// Validates the application; the principal may not exceed the inventory value.
    pub fn validate(&self) -> FinanceResult<()> {
        if self.requested_amount > self.inventory_value {
            return Err(FinanceError::CollateralInsufficient {
                requested: self.requested_amount,
                inventory_value: self.inventory_value,
            });
        }
        ensure_amount("inventory_value", self.inventory_value)?;
        ensure_amount("requested_amount", self.requested_amount)?;
        for item in &self.collateral {
            if item.quantity <= Decimal::ZERO || item.unit_value < Decimal::ZERO {
                return Err(FinanceError::invalid_input(
                    "collateral",
                    format!("item '{}' has a non-positive quantity or negative value", item.name),
                ));
            }
        }
        Ok(())
    }

    /// Materializes an `applied` agreement under the assigned id.
    #[must_use]
    pub fn into_financing(self, id: FinancingId, application_date: Date) -> InventoryFinancing {
        InventoryFinancing {
            id,
            participant_id: self.participant_id,
            inventory_value: self.inventory_value,
            principal: self.requested_amount,
            interest_rate: None,
            term_months: None,
            collateral: self.collateral,
            status: InventoryFinancingStatus::Applied,
            application_date,
            approval_date: None,
            schedule: Vec::new(),
        }
    }
}

impl InventoryFinancing {
    /// applied -> approved, installing the priced schedule.
    ///
    /// The schedule must have exactly `term_months` installments whose
    /// principal portions sum to the financing principal.
    pub fn approve(
        &mut self,
        interest_rate: Decimal,
        term_months: u32,
        approval_date: Date,
        schedule: Vec<Installment>,
    ) -> FinanceResult<()> {
        if self.status != InventoryFinancingStatus::Applied {
            return Err(self.invalid_state("approve"));
        }
        if schedule.len() != term_months as usize {
            return Err(FinanceError::invalid_input(
                "schedule",
                format!(
                    "expected {term_months} installments, got {}",
                    schedule.len()
                ),
            ));
        }
        let principal_sum: Decimal = schedule.iter().map(|i| i.principal).sum();
        if principal_sum != self.principal {
            return Err(FinanceError::invalid_input(
                "schedule",
                format!(
                    "principal portions sum to {principal_sum}, expected {}",
                    self.principal
                ),
            ));
        }
        self.interest_rate = Some(interest_rate);
        self.term_months = Some(term_months);
        self.approval_date = Some(approval_date);
        self.schedule = schedule;
        self.status = InventoryFinancingStatus::Approved;
        Ok(())
    }

    /// approved -> active (drawdown).
    pub fn activate(&mut self) -> FinanceResult<()> {
        if self.status != InventoryFinancingStatus::Approved {
            return Err(self.invalid_state("activate"));
        }
        self.status = InventoryFinancingStatus::Active;
        Ok(())
    }

    /// Marks installment `index` (zero-based) paid.
    ///
    /// Returns true when this payment completed the schedule and the
    /// agreement moved to `repaid`.
    pub fn record_payment(&mut self, index: usize, paid_on: Date) -> FinanceResult<bool> {
        if matches!(
            self.status,
            InventoryFinancingStatus::Applied | InventoryFinancingStatus::Defaulted
        ) {
            return Err(self.invalid_state("record payment on"));
        }
        let len = self.schedule.len();
        let installment = self
            .schedule
            .get_mut(index)
            .ok_or(FinanceError::IndexOutOfRange { index, len })?;
        if installment.status == InstallmentStatus::Paid {
            return Err(FinanceError::AlreadyPaid {
                financing_id: self.id.to_string(),
                index,
            });
        }
        installment.status = InstallmentStatus::Paid;
        installment.paid_on = Some(paid_on);

        if self.is_fully_paid() {
            self.status = InventoryFinancingStatus::Repaid;
            return Ok(true);
        }
        Ok(false)
    }

    /// Flags installment `index` overdue. Paid installments are rejected.
    pub fn mark_installment_overdue(&mut self, index: usize) -> FinanceResult<()> {
        let len = self.schedule.len();
        let installment = self
            .schedule
            .get_mut(index)
            .ok_or(FinanceError::IndexOutOfRange { index, len })?;
        if installment.status == InstallmentStatus::Paid {
            return Err(FinanceError::AlreadyPaid {
                financing_id: self.id.to_string(),
                index,
            });
        }
        installment.status = InstallmentStatus::Overdue;
        Ok(())
    }

    /// Flags every pending installment due before `today`. Returns the count.
    pub fn mark_past_due(&mut self, today: Date) -> usize {
        let mut flagged = 0;
        for installment in &mut self.schedule {
            if installment.status == InstallmentStatus::Pending && installment.due_date < today {
                installment.status = InstallmentStatus::Overdue;
                flagged += 1;
            }
        }
        flagged
    }

    /// active -> defaulted.
    pub fn mark_defaulted(&mut self) -> FinanceResult<()> {
        if self.status != InventoryFinancingStatus::Active {
            return Err(self.invalid_state("default"));
        }
        self.status = InventoryFinancingStatus::Defaulted;
        Ok(())
    }

    /// True when the schedule is non-empty and every installment is paid.
    #[must_use]
    pub fn is_fully_paid(&self) -> bool {
        !self.schedule.is_empty()
            && self
                .schedule
                .iter()
                .all(|i| i.status == InstallmentStatus::Paid)
    }

    /// Principal not yet repaid. Before approval this is the full principal.
    #[must_use]
    pub fn outstanding_principal(&self) -> Decimal {
        if self.schedule.is_empty() {
            return self.principal;
        }
        self.schedule
            .iter()
            .filter(|i| i.status != InstallmentStatus::Paid)
            .map(|i| i.principal)
            .sum()
    }

    /// Total interest over the schedule.
    #[must_use]
    pub fn total_interest(&self) -> Decimal {
        self.schedule.iter().map(|i| i.interest).sum()
    }

    /// Total repayable over the schedule.
    #[must_use]
    pub fn total_repayable(&self) -> Decimal {
        self.schedule.iter().map(|i| i.amount).sum()
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

    fn application() -> NewInventoryFinancing {
        NewInventoryFinancing {
            participant_id: ParticipantId::from_sequence(1),
            inventory_value: dec!(150000),
            requested_amount: dec!(120000),
            collateral: vec![CollateralItem {
                name: "Rice".into(),
                category: "grain".into(),
                quantity: dec!(1000),
                unit_value: dec!(150),
                condition: CollateralCondition::Good,
            }],
        }
    }

    fn even_schedule(principal: Decimal, term: u32) -> Vec<Installment> {
        let part = principal / Decimal::from(term);
        (1..=term)
            .map(|n| Installment {
                number: n,
                due_date: d(2025, 1, 15).add_months(n as i32).unwrap(),
                amount: part + dec!(860),
                principal: part,
                interest: dec!(860),
                status: InstallmentStatus::Pending,
                paid_on: None,
            })
            .collect()
    }

    fn approved() -> InventoryFinancing {
        let mut f = application().into_financing(FinancingId::from_sequence(1), d(2025, 1, 10));
        f.approve(dec!(8.6), 6, d(2025, 1, 15), even_schedule(dec!(120000), 6))
            .unwrap();
        f
    }

    #[test]
    fn test_application_rejects_excess_principal() {
        let mut req = application();
        req.requested_amount = dec!(150000.01);
        assert!(matches!(
            req.validate(),
            Err(FinanceError::CollateralInsufficient { .. })
        ));
    }

    #[test]
    fn test_approve_rejects_mismatched_schedule() {
        let mut f = application().into_financing(FinancingId::from_sequence(1), d(2025, 1, 10));
        let err = f
            .approve(dec!(8.6), 6, d(2025, 1, 15), even_schedule(dec!(120000), 5))
            .unwrap_err();
        assert!(matches!(err, FinanceError::InvalidInput { field: "schedule", .. }));
        assert_eq!(f.status, InventoryFinancingStatus::Applied);
    }

    #[test]
    fn test_pay_all_installments_repays() {
        let mut f = approved();
        f.activate().unwrap();
        for i in 0..5 {
            assert!(!f.record_payment(i, d(2025, 2, 15)).unwrap());
        }
        assert!(f.record_payment(5, d(2025, 7, 15)).unwrap());
        assert_eq!(f.status, InventoryFinancingStatus::Repaid);
        assert_eq!(f.outstanding_principal(), Decimal::ZERO);
    }

    #[test]
    fn test_record_payment_errors() {
        let mut f = approved();
        f.record_payment(0, d(2025, 2, 15)).unwrap();
        assert!(matches!(
            f.record_payment(0, d(2025, 2, 16)),
            Err(FinanceError::AlreadyPaid { index: 0, .. })
        ));
        assert!(matches!(
            f.record_payment(6, d(2025, 2, 16)),
            Err(FinanceError::IndexOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_default_requires_active() {
        let mut f = approved();
        assert!(f.mark_defaulted().is_err());
        f.activate().unwrap();
        f.mark_defaulted().unwrap();
        assert!(matches!(
            f.record_payment(0, d(2025, 2, 15)),
            Err(FinanceError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_mark_past_due() {
        let mut f = approved();
        f.record_payment(0, d(2025, 2, 15)).unwrap();
        let flagged = f.mark_past_due(d(2025, 4, 20));
        // installment 1 paid; installments 2 and 3 (Mar 15, Apr 15) are past due
        assert_eq!(flagged, 2);
        assert_eq!(f.schedule[1].status, InstallmentStatus::Overdue);
        assert_eq!(f.schedule[3].status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_overdue_installment_can_still_be_paid() {
        let mut f = approved();
        f.mark_installment_overdue(2).unwrap();
        f.record_payment(2, d(2025, 5, 1)).unwrap();
        assert_eq!(f.schedule[2].status, InstallmentStatus::Paid);
    }
}
