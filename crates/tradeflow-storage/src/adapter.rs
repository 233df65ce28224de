//! Storage adapter trait definition.
//!
//! This module defines the core `StorageAdapter` trait that all storage
//! backends must implement.

use tradeflow_core::model::{InventoryFinancing, Invoice, Participant, PurchaseOrder};
use tradeflow_core::types::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId};

use crate::error::StorageResult;

/// Core storage adapter trait.
///
/// One keyed table per entity with get/put/list. Records are never deleted.
/// `list_*` returns records in id order, which is creation order for
/// engine-assigned ids. Each `list_*` call reads a consistent view of its
/// table.
///
/// The trait carries no locking contract across calls: callers that need
/// read-modify-write atomicity serialize on the entity id themselves.
///
/// # Example
///
/// ```rust
/// use tradeflow_storage::{InMemoryStorage, StorageAdapter};
///
/// let storage = InMemoryStorage::new();
/// assert!(storage.is_healthy());
/// assert_eq!(storage.stats().unwrap().invoice_count, 0);
/// ```
pub trait StorageAdapter: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Checks if the storage is healthy and accessible.
    fn is_healthy(&self) -> bool;

    // =========================================================================
    // PARTICIPANTS
    // =========================================================================

    /// Inserts or replaces a participant.
    fn put_participant(&self, participant: &Participant) -> StorageResult<()>;

    /// Retrieves a participant by id.
    fn get_participant(&self, id: &ParticipantId) -> StorageResult<Option<Participant>>;

    /// Lists all participants in id order.
    fn list_participants(&self) -> StorageResult<Vec<Participant>>;

    // =========================================================================
    // INVOICES
    // =========================================================================

    /// Inserts or replaces an invoice.
    fn put_invoice(&self, invoice: &Invoice) -> StorageResult<()>;

    /// Retrieves an invoice by id.
    fn get_invoice(&self, id: &InvoiceId) -> StorageResult<Option<Invoice>>;

    /// Lists all invoices in id order.
    fn list_invoices(&self) -> StorageResult<Vec<Invoice>>;

    // =========================================================================
    // PURCHASE ORDERS
    // =========================================================================

    /// Inserts or replaces a purchase order.
    fn put_purchase_order(&self, order: &PurchaseOrder) -> StorageResult<()>;

    /// Retrieves a purchase order by id.
    fn get_purchase_order(&self, id: &PurchaseOrderId) -> StorageResult<Option<PurchaseOrder>>;

    /// Lists all purchase orders in id order.
    fn list_purchase_orders(&self) -> StorageResult<Vec<PurchaseOrder>>;

    // =========================================================================
    // INVENTORY FINANCING
    // =========================================================================

    /// Inserts or replaces an inventory financing agreement.
    fn put_inventory_financing(&self, financing: &InventoryFinancing) -> StorageResult<()>;

    /// Retrieves an inventory financing agreement by id.
    fn get_inventory_financing(&self, id: &FinancingId)
        -> StorageResult<Option<InventoryFinancing>>;

    /// Lists all inventory financing agreements in id order.
    fn list_inventory_financings(&self) -> StorageResult<Vec<InventoryFinancing>>;

    // =========================================================================
    // UTILITY
    // =========================================================================

    /// Returns record counts per table.
    fn stats(&self) -> StorageResult<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of participants stored.
    pub participant_count: usize,
    /// Number of invoices stored.
    pub invoice_count: usize,
    /// Number of purchase orders stored.
    pub purchase_order_count: usize,
    /// Number of inventory financing agreements stored.
    pub inventory_financing_count: usize,
    /// Database file size in bytes (if applicable).
    pub file_size_bytes: Option<u64>,
}
