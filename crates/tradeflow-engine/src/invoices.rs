//! Invoice factoring ledger.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use tradeflow_core::model::{Invoice, InvoiceStatus, NewInvoice};
use tradeflow_core::types::{InvoiceId, ParticipantId};
use tradeflow_core::{Date, FinanceError, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::clock::Clock;
use crate::locks::EntityLocks;
use crate::registry::ParticipantRegistry;
use crate::sequence::IdSequence;

/// Filter for [`InvoiceLedger::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Only invoices in this status.
    pub status: Option<InvoiceStatus>,
    /// Only invoices where this participant is supplier or buyer.
    pub participant: Option<ParticipantId>,
}

impl InvoiceFilter {
    fn matches(&self, invoice: &Invoice) -> bool {
        self.status.map_or(true, |s| invoice.status == s)
            && self.participant.as_ref().map_or(true, |p| {
                invoice.supplier_id == *p || invoice.buyer_id == *p
            })
    }
}

/// Tracks invoices and their factoring.
pub struct InvoiceLedger {
    storage: Arc<dyn StorageAdapter>,
    registry: Arc<ParticipantRegistry>,
    clock: Arc<dyn Clock>,
    sequence: IdSequence,
    locks: EntityLocks,
}

impl InvoiceLedger {
    pub(crate) fn new(
        storage: Arc<dyn StorageAdapter>,
        registry: Arc<ParticipantRegistry>,
        clock: Arc<dyn Clock>,
        last_sequence: u64,
    ) -> Self {
        Self {
            storage,
            registry,
            clock,
            sequence: IdSequence::starting_after(last_sequence),
            locks: EntityLocks::new(),
        }
    }

    /// Issues a pending invoice. Both parties must be registered.
    pub fn create(&self, request: NewInvoice) -> FinanceResult<InvoiceId> {
        self.registry.require(&request.supplier_id)?;
        self.registry.require(&request.buyer_id)?;
        request.validate()?;

        let id = InvoiceId::from_sequence(self.sequence.next());
        let invoice = request.into_invoice(id.clone());
        self.storage.put_invoice(&invoice)?;

        info!(
            invoice_id = %id,
            supplier_id = %invoice.supplier_id,
            buyer_id = %invoice.buyer_id,
            amount = %invoice.amount,
            currency = %invoice.currency,
            "Invoice created"
        );
        Ok(id)
    }

    /// Looks up an invoice.
    pub fn get(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.storage
            .get_invoice(id)?
            .ok_or_else(|| FinanceError::not_found("invoice", id.as_str()))
    }

    /// Lists invoices in creation order.
    pub fn list(&self, filter: &InvoiceFilter) -> FinanceResult<Vec<Invoice>> {
        Ok(self
            .storage
            .list_invoices()?
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect())
    }

    /// Attaches a factoring offer; net payout is `amount * (1 - fee/100)`.
    pub fn offer_factoring(&self, id: &InvoiceId, fee_rate_percent: Decimal) -> FinanceResult<Invoice> {
        let today = self.clock.today();
        let invoice = self.update(id, |invoice| invoice.offer_factoring(fee_rate_percent, today))?;
        info!(
            invoice_id = %id,
            fee_rate = %fee_rate_percent,
            net_payout = %invoice.factoring.as_ref().map_or(Decimal::ZERO, |o| o.net_payout),
            "Factoring offered"
        );
        Ok(invoice)
    }

    /// pending -> factored.
    pub fn factor(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        let today = self.clock.today();
        let invoice = self.update(id, |invoice| invoice.factor(today))?;
        info!(invoice_id = %id, amount = %invoice.amount, "Invoice factored");
        Ok(invoice)
    }

    /// pending -> approved.
    pub fn approve(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        let invoice = self.update(id, Invoice::approve)?;
        info!(invoice_id = %id, "Invoice approved");
        Ok(invoice)
    }

    /// approved | factored -> paid. Called back by the settlement side.
    pub fn mark_paid(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        let today = self.clock.today();
        let invoice = self.update(id, |invoice| invoice.mark_paid(today))?;
        info!(invoice_id = %id, "Invoice paid");
        Ok(invoice)
    }

    /// pending | approved -> overdue once the due date has passed.
    ///
    /// Idempotent: an invoice that is not eligible is returned unchanged.
    pub fn mark_overdue(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        let today = self.clock.today();
        self.mark_overdue_as_of(id, today).map(|(invoice, _)| invoice)
    }

    /// Flags every eligible invoice overdue as of `today`. Returns the count.
    pub fn sweep_overdue(&self, today: Date) -> FinanceResult<usize> {
        let mut flagged = 0;
        for invoice in self.storage.list_invoices()? {
            if invoice.is_past_due(today) {
                let (_, changed) = self.mark_overdue_as_of(&invoice.id, today)?;
                flagged += usize::from(changed);
            }
        }
        Ok(flagged)
    }

    fn mark_overdue_as_of(&self, id: &InvoiceId, today: Date) -> FinanceResult<(Invoice, bool)> {
        self.locks.with_lock(id.as_str(), || {
            let mut invoice = self.get(id)?;
            let changed = invoice.mark_overdue(today);
            if changed {
                self.storage.put_invoice(&invoice)?;
                info!(invoice_id = %id, due_date = %invoice.due_date, "Invoice overdue");
            } else {
                debug!(invoice_id = %id, status = %invoice.status, "Invoice not eligible for overdue");
            }
            Ok((invoice, changed))
        })
    }

    /// Read-validate-write under the invoice's lock. Nothing is stored when
    /// `op` fails.
    fn update<F>(&self, id: &InvoiceId, op: F) -> FinanceResult<Invoice>
    where
        F: FnOnce(&mut Invoice) -> FinanceResult<()>,
    {
        self.locks.with_lock(id.as_str(), || {
            let mut invoice = self.get(id)?;
            op(&mut invoice)?;
            self.storage.put_invoice(&invoice)?;
            Ok(invoice)
        })
    }
}
