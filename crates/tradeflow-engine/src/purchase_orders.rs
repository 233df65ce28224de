//! Purchase-order financing ledger.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use tradeflow_core::model::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderStatus};
use tradeflow_core::types::PurchaseOrderId;
use tradeflow_core::{FinanceError, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::clock::Clock;
use crate::locks::EntityLocks;
use crate::rates::RateCalculator;
use crate::registry::ParticipantRegistry;
use crate::sequence::IdSequence;

/// Tracks purchase orders and their financing.
pub struct PurchaseOrderLedger {
    storage: Arc<dyn StorageAdapter>,
    registry: Arc<ParticipantRegistry>,
    rates: RateCalculator,
    clock: Arc<dyn Clock>,
    sequence: IdSequence,
    locks: EntityLocks,
}

impl PurchaseOrderLedger {
    pub(crate) fn new(
        storage: Arc<dyn StorageAdapter>,
        registry: Arc<ParticipantRegistry>,
        rates: RateCalculator,
        clock: Arc<dyn Clock>,
        last_sequence: u64,
    ) -> Self {
        Self {
            storage,
            registry,
            rates,
            clock,
            sequence: IdSequence::starting_after(last_sequence),
            locks: EntityLocks::new(),
        }
    }

    /// Creates a draft purchase order. Both parties must be registered.
    pub fn create(&self, request: NewPurchaseOrder) -> FinanceResult<PurchaseOrderId> {
        self.registry.require(&request.buyer_id)?;
        self.registry.require(&request.supplier_id)?;
        request.validate()?;

        let id = PurchaseOrderId::from_sequence(self.sequence.next());
        let order = request.into_purchase_order(id.clone());
        self.storage.put_purchase_order(&order)?;

        info!(
            po_id = %id,
            buyer_id = %order.buyer_id,
            supplier_id = %order.supplier_id,
            amount = %order.amount,
            "Purchase order created"
        );
        Ok(id)
    }

    /// Looks up a purchase order.
    pub fn get(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.storage
            .get_purchase_order(id)?
            .ok_or_else(|| FinanceError::not_found("purchase order", id.as_str()))
    }

    /// Lists purchase orders in creation order, optionally by status.
    pub fn list(&self, status: Option<PurchaseOrderStatus>) -> FinanceResult<Vec<PurchaseOrder>> {
        Ok(self
            .storage
            .list_purchase_orders()?
            .into_iter()
            .filter(|po| status.map_or(true, |s| po.status == s))
            .collect())
    }

    /// Requests financing, priced on the buyer's credit rating.
    ///
    /// Approval is automatic. An amount above the order value always fails
    /// with `FinancingExceedsOrderValue`, whatever the order's status.
    pub fn request_financing(
        &self,
        id: &PurchaseOrderId,
        requested_amount: Decimal,
    ) -> FinanceResult<PurchaseOrder> {
        let today = self.clock.today();
        let order = self.update(id, |order| {
            order.check_financing_amount(requested_amount)?;
            order.ensure_accepts_financing()?;
            let buyer = self.registry.require(&order.buyer_id)?;
            let rate = self.rates.po_rate(buyer.credit_rating)?;
            order.apply_financing(requested_amount, rate, today)
        })?;

        info!(
            po_id = %id,
            amount = %requested_amount,
            rate = %order.financing.as_ref().map_or(Decimal::ZERO, |t| t.rate),
            "Purchase order financed"
        );
        Ok(order)
    }

    /// draft -> sent.
    pub fn send(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.transition(id, PurchaseOrder::send)
    }

    /// sent -> confirmed.
    pub fn confirm(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.transition(id, PurchaseOrder::confirm)
    }

    /// confirmed | financed -> delivered.
    pub fn mark_delivered(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.transition(id, PurchaseOrder::mark_delivered)
    }

    /// delivered -> completed.
    pub fn complete(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.transition(id, PurchaseOrder::complete)
    }

    fn transition<F>(&self, id: &PurchaseOrderId, op: F) -> FinanceResult<PurchaseOrder>
    where
        F: FnOnce(&mut PurchaseOrder) -> FinanceResult<()>,
    {
        let order = self.update(id, op)?;
        info!(po_id = %id, status = %order.status, "Purchase order status changed");
        Ok(order)
    }

    fn update<F>(&self, id: &PurchaseOrderId, op: F) -> FinanceResult<PurchaseOrder>
    where
        F: FnOnce(&mut PurchaseOrder) -> FinanceResult<()>,
    {
        self.locks.with_lock(id.as_str(), || {
            let mut order = self.get(id)?;
            op(&mut order)?;
            self.storage.put_purchase_order(&order)?;
            Ok(order)
        })
    }
}
