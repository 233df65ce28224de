//! The financing engine facade.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use tradeflow_config::EngineConfig;
use tradeflow_core::model::{
    InventoryFinancing, Invoice, NewInventoryFinancing, NewInvoice, NewParticipant,
    NewPurchaseOrder, Participant, ParticipantCategory, PurchaseOrder, PurchaseOrderStatus,
};
use tradeflow_core::types::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId};
use tradeflow_core::{Date, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::clock::Clock;
use crate::inventory::InventoryLedger;
use crate::invoices::{InvoiceFilter, InvoiceLedger};
use crate::metrics::{MetricsAggregator, SupplyChainMetrics};
use crate::purchase_orders::PurchaseOrderLedger;
use crate::rates::{FinancingProduct, RateCalculator, RateQuote};
use crate::registry::ParticipantRegistry;
use crate::sequence::last_sequence;

/// Outcome of an overdue sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Invoices moved to `overdue`.
    pub invoices_marked_overdue: usize,
    /// Installments of active agreements moved to `overdue`.
    pub installments_marked_overdue: usize,
}

/// The supply-chain financing engine.
///
/// Constructed once by the host process (see
/// [`FinancingEngineBuilder`](crate::FinancingEngineBuilder)) and shared by
/// handle. Every operation is synchronous and atomic with respect to the one
/// entity it mutates.
pub struct FinancingEngine {
    config: EngineConfig,
    storage: Arc<dyn StorageAdapter>,
    clock: Arc<dyn Clock>,
    rates: RateCalculator,
    registry: Arc<ParticipantRegistry>,
    invoices: InvoiceLedger,
    purchase_orders: PurchaseOrderLedger,
    inventory: InventoryLedger,
    metrics: MetricsAggregator,
}

impl FinancingEngine {
    pub(crate) fn new(
        config: EngineConfig,
        storage: Arc<dyn StorageAdapter>,
        clock: Arc<dyn Clock>,
    ) -> FinanceResult<Self> {
        let stats = storage.stats()?;
        let last_participant =
            last_sequence(storage.list_participants()?.iter().map(|p| p.id.sequence()));
        let last_invoice = last_sequence(storage.list_invoices()?.iter().map(|i| i.id.sequence()));
        let last_purchase_order =
            last_sequence(storage.list_purchase_orders()?.iter().map(|po| po.id.sequence()));
        let last_financing = last_sequence(
            storage
                .list_inventory_financings()?
                .iter()
                .map(|f| f.id.sequence()),
        );
        let rates = RateCalculator::new(config.rates.clone());
        let registry = Arc::new(ParticipantRegistry::new(
            Arc::clone(&storage),
            Arc::clone(&clock),
            last_participant,
        ));
        let invoices = InvoiceLedger::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            Arc::clone(&clock),
            last_invoice,
        );
        let purchase_orders = PurchaseOrderLedger::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            rates.clone(),
            Arc::clone(&clock),
            last_purchase_order,
        );
        let inventory = InventoryLedger::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            rates.clone(),
            config.inventory.clone(),
            Arc::clone(&clock),
            last_financing,
        );
        let metrics = MetricsAggregator::new(Arc::clone(&storage), config.metrics.top_categories);

        info!(
            backend = storage.backend_name(),
            participants = stats.participant_count,
            invoices = stats.invoice_count,
            purchase_orders = stats.purchase_order_count,
            inventory_financings = stats.inventory_financing_count,
            "Financing engine ready"
        );

        Ok(Self {
            config,
            storage,
            clock,
            rates,
            registry,
            invoices,
            purchase_orders,
            inventory,
            metrics,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Storage backend name.
    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// True if the storage backend is reachable.
    pub fn is_healthy(&self) -> bool {
        self.storage.is_healthy()
    }

    /// The engine's current date.
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// The rate calculator.
    pub fn rates(&self) -> &RateCalculator {
        &self.rates
    }

    // =========================================================================
    // PARTICIPANTS
    // =========================================================================

    /// Registers a participant.
    pub fn register_participant(&self, request: NewParticipant) -> FinanceResult<ParticipantId> {
        self.registry.register(request)
    }

    /// Looks up a participant.
    pub fn get_participant(&self, id: &ParticipantId) -> FinanceResult<Participant> {
        self.registry.get(id)
    }

    /// Lists participants, optionally by category.
    pub fn list_participants(
        &self,
        category: Option<ParticipantCategory>,
    ) -> FinanceResult<Vec<Participant>> {
        self.registry.list(category)
    }

    /// Quotes the current rate for a participant and product.
    pub fn quote_rate(
        &self,
        id: &ParticipantId,
        product: FinancingProduct,
    ) -> FinanceResult<RateQuote> {
        let participant = self.registry.get(id)?;
        self.rates.quote(&participant, product)
    }

    // =========================================================================
    // INVOICES
    // =========================================================================

    /// Issues an invoice.
    pub fn create_invoice(&self, request: NewInvoice) -> FinanceResult<InvoiceId> {
        self.invoices.create(request)
    }

    /// Looks up an invoice.
    pub fn get_invoice(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.invoices.get(id)
    }

    /// Lists invoices.
    pub fn list_invoices(&self, filter: &InvoiceFilter) -> FinanceResult<Vec<Invoice>> {
        self.invoices.list(filter)
    }

    /// Attaches a factoring offer to a pending invoice.
    pub fn offer_factoring(
        &self,
        id: &InvoiceId,
        fee_rate_percent: Decimal,
    ) -> FinanceResult<Invoice> {
        self.invoices.offer_factoring(id, fee_rate_percent)
    }

    /// Factors a pending invoice that carries an offer.
    pub fn factor_invoice(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.invoices.factor(id)
    }

    /// Records buyer acceptance.
    pub fn approve_invoice(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.invoices.approve(id)
    }

    /// Marks an invoice overdue if its due date has passed.
    pub fn mark_invoice_overdue(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.invoices.mark_overdue(id)
    }

    /// Records settlement of an approved or factored invoice.
    pub fn mark_invoice_paid(&self, id: &InvoiceId) -> FinanceResult<Invoice> {
        self.invoices.mark_paid(id)
    }

    // =========================================================================
    // PURCHASE ORDERS
    // =========================================================================

    /// Creates a draft purchase order.
    pub fn create_purchase_order(&self, request: NewPurchaseOrder) -> FinanceResult<PurchaseOrderId> {
        self.purchase_orders.create(request)
    }

    /// Looks up a purchase order.
    pub fn get_purchase_order(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.get(id)
    }

    /// Lists purchase orders, optionally by status.
    pub fn list_purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
    ) -> FinanceResult<Vec<PurchaseOrder>> {
        self.purchase_orders.list(status)
    }

    /// Requests (and auto-approves) financing for a purchase order.
    pub fn request_po_financing(
        &self,
        id: &PurchaseOrderId,
        requested_amount: Decimal,
    ) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.request_financing(id, requested_amount)
    }

    /// draft -> sent.
    pub fn send_purchase_order(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.send(id)
    }

    /// sent -> confirmed.
    pub fn confirm_purchase_order(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.confirm(id)
    }

    /// confirmed | financed -> delivered.
    pub fn mark_po_delivered(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.mark_delivered(id)
    }

    /// delivered -> completed.
    pub fn complete_purchase_order(&self, id: &PurchaseOrderId) -> FinanceResult<PurchaseOrder> {
        self.purchase_orders.complete(id)
    }

    // =========================================================================
    // INVENTORY FINANCING
    // =========================================================================

    /// Applies for inventory-backed financing.
    pub fn apply_inventory_financing(
        &self,
        request: NewInventoryFinancing,
    ) -> FinanceResult<FinancingId> {
        self.inventory.apply(request)
    }

    /// Looks up an agreement.
    pub fn get_inventory_financing(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        self.inventory.get(id)
    }

    /// Lists agreements, optionally for one borrower.
    pub fn list_inventory_financings(
        &self,
        participant: Option<&ParticipantId>,
    ) -> FinanceResult<Vec<InventoryFinancing>> {
        self.inventory.list(participant)
    }

    /// Prices an application and generates its schedule.
    pub fn approve_inventory_financing(
        &self,
        id: &FinancingId,
    ) -> FinanceResult<InventoryFinancing> {
        self.inventory.approve(id)
    }

    /// Records drawdown.
    pub fn activate_inventory_financing(
        &self,
        id: &FinancingId,
    ) -> FinanceResult<InventoryFinancing> {
        self.inventory.activate(id)
    }

    /// Marks an installment paid.
    pub fn record_payment(
        &self,
        id: &FinancingId,
        installment_index: usize,
    ) -> FinanceResult<InventoryFinancing> {
        self.inventory.record_payment(id, installment_index)
    }

    /// Flags an installment overdue.
    pub fn mark_installment_overdue(
        &self,
        id: &FinancingId,
        installment_index: usize,
    ) -> FinanceResult<InventoryFinancing> {
        self.inventory.mark_installment_overdue(id, installment_index)
    }

    /// Declares an active agreement in default.
    pub fn mark_defaulted(&self, id: &FinancingId) -> FinanceResult<InventoryFinancing> {
        self.inventory.mark_defaulted(id)
    }

    // =========================================================================
    // PORTFOLIO
    // =========================================================================

    /// Computes portfolio metrics from the current ledger state.
    pub fn compute_metrics(&self) -> FinanceResult<SupplyChainMetrics> {
        self.metrics.compute()
    }

    /// Flags overdue invoices and past-due installments as of `today`.
    pub fn sweep_overdue(&self, today: Date) -> FinanceResult<SweepReport> {
        let report = SweepReport {
            invoices_marked_overdue: self.invoices.sweep_overdue(today)?,
            installments_marked_overdue: self.inventory.sweep_overdue(today)?,
        };
        info!(
            %today,
            invoices = report.invoices_marked_overdue,
            installments = report.installments_marked_overdue,
            "Overdue sweep complete"
        );
        Ok(report)
    }
}
