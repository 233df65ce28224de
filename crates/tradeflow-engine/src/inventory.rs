//! Inventory-backed financing ledger.

use std::sync::Arc;

use tracing::{info, warn};

use tradeflow_config::InventoryPolicy;
use tradeflow_core::model::{InventoryFinancing, InventoryFinancingStatus, NewInventoryFinancing};
use tradeflow_core::types::{FinancingId, ParticipantId};
use tradeflow_core::{Date, FinanceError, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::clock::Clock;
use crate::locks::EntityLocks;
use crate::rates::RateCalculator;
use crate::registry::ParticipantRegistry;
use crate::schedule::flat_rate_schedule;
use crate::sequence::IdSequence;

/// Tracks collateralized loans and their repayment schedules.
pub struct InventoryLedger {
    storage: Arc<dyn StorageAdapter>,
    registry: Arc<ParticipantRegistry>,
    rates: RateCalculator,
    policy: InventoryPolicy,
    clock: Arc<dyn Clock>,
    sequence: IdSequence,
    locks: EntityLocks,
}

impl InventoryLedger {
    pub(crate) fn new(
        storage: Arc<dyn StorageAdapter>,
        registry: Arc<ParticipantRegistry>,
        rates: RateCalculator,
        policy: InventoryPolicy,
        clock: Arc<dyn Clock>,
        last_sequence: u64,
    ) -> Self {
        Self {
            storage,
            registry,
            rates,
            policy,
            clock,
            sequence: IdSequence::starting_after(last_sequence),
            locks: EntityLocks::new(),
        }
    }

    /// Records an application. The borrower must be registered and the
    /// requested amount may not exceed the declared inventory value.
    pub fn apply(&self, request: NewInventoryFinancing) -> FinanceResult<FinancingId> {
        self.registry.require(&request.participant_id)?;
        request.validate()?;

        let id = FinancingId::from_sequence(self.sequence.next());
        let financing = request.into_financing(id.clone(), self.clock.today());
        self.storage.put_inventory_financing(&financing)?;

        info!(
            financing_id = %id,
            participant_id = %financing.participant_id,
            principal = %financing.principal,
            inventory_value = %financing.inventory_value,
            "Inventory financing applied"
        );
        Ok(id)
    }

    /// Looks up an agreement.
    pub fn get(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        self.storage
            .get_inventory_financing(id)?
            .ok_or_else(|| FinanceError::not_found("inventory financing", id.as_str()))
    }

    /// Lists agreements in application order, optionally for one borrower.
    pub fn list(&self, participant: Option<&ParticipantId>) -> FinanceResult<Vec<InventoryFinancing>> {
        Ok(self
            .storage
            .list_inventory_financings()?
            .into_iter()
            .filter(|f| participant.map_or(true, |p| f.participant_id == *p))
            .collect())
    }

    /// applied -> approved.
    ///
    /// Prices the loan on the borrower's current rating, fixes the policy
    /// term and generates the schedule. The schedule is never regenerated.
    pub fn approve(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        let today = self.clock.today();
        let financing = self.update(id, |financing| {
            if financing.status != InventoryFinancingStatus::Applied {
                return Err(FinanceError::invalid_state(
                    "inventory financing",
                    financing.id.as_str(),
                    financing.status,
                    "approve",
                ));
            }
            let borrower = self.registry.require(&financing.participant_id)?;
            let rate = self.rates.inventory_rate(borrower.credit_rating)?;
            let term = self.policy.term_months;
            let schedule = flat_rate_schedule(
                financing.principal,
                rate,
                term,
                today,
                self.policy.amount_scale,
            )?;
            financing.approve(rate, term, today, schedule)
        })?;

        info!(
            financing_id = %id,
            rate = ?financing.interest_rate,
            term_months = ?financing.term_months,
            total_repayable = %financing.total_repayable(),
            "Inventory financing approved"
        );
        Ok(financing)
    }

    /// approved -> active.
    pub fn activate(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        let financing = self.update(id, InventoryFinancing::activate)?;
        info!(financing_id = %id, "Inventory financing active");
        Ok(financing)
    }

    /// Marks installment `index` (zero-based) paid; repays the agreement
    /// when it was the last unpaid installment.
    pub fn record_payment(&self, id: &FinancingId, index: usize) -> FinanceResult<InventoryFinancing> {
        let today = self.clock.today();
        let mut repaid = false;
        let financing = self.update(id, |financing| {
            repaid = financing.record_payment(index, today)?;
            Ok(())
        })?;

        info!(financing_id = %id, index, "Installment paid");
        if repaid {
            info!(financing_id = %id, "Inventory financing repaid");
        }
        Ok(financing)
    }

    /// Flags installment `index` overdue.
    pub fn mark_installment_overdue(
        &self,
        id: &FinancingId,
        index: usize,
    ) -> FinanceResult<InventoryFinancing> {
        let financing = self.update(id, |financing| financing.mark_installment_overdue(index))?;
        warn!(financing_id = %id, index, "Installment overdue");
        Ok(financing)
    }

    /// active -> defaulted.
    pub fn mark_defaulted(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        let financing = self.update(id, InventoryFinancing::mark_defaulted)?;
        warn!(
            financing_id = %id,
            outstanding = %financing.outstanding_principal(),
            "Inventory financing defaulted"
        );
        Ok(financing)
    }

    /// Flags past-due pending installments of active agreements as of
    /// `today`. Returns the number of installments flagged.
    pub fn sweep_overdue(&self, today: Date) -> FinanceResult<usize> {
        let mut flagged = 0;
        for candidate in self.storage.list_inventory_financings()? {
            if candidate.status != InventoryFinancingStatus::Active {
                continue;
            }
            flagged += self.locks.with_lock(candidate.id.as_str(), || {
                let mut financing = self.get(&candidate.id)?;
                if financing.status != InventoryFinancingStatus::Active {
                    return Ok(0);
                }
                let count = financing.mark_past_due(today);
                if count > 0 {
                    self.storage.put_inventory_financing(&financing)?;
                    warn!(financing_id = %financing.id, count, "Installments overdue");
                }
                Ok::<_, FinanceError>(count)
            })?;
        }
        Ok(flagged)
    }

    fn update<F>(&self, id: &FinancingId, op: F) -> FinanceResult<InventoryFinancing>
    where
        F: FnOnce(&mut InventoryFinancing) -> FinanceResult<()>,
    {
        self.locks.with_lock(id.as_str(), || {
            let mut financing = self.get(id)?;
            op(&mut financing)?;
            self.storage.put_inventory_financing(&financing)?;
            Ok(financing)
        })
    }
}
