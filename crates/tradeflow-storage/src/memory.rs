//! In-memory storage adapter.
//!
//! Provides a simple in-memory implementation of the StorageAdapter trait.
//! Useful for testing and development. Data is not persisted across restarts.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tradeflow_core::model::{InventoryFinancing, Invoice, Participant, PurchaseOrder};
use tradeflow_core::types::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId};

use crate::adapter::{StorageAdapter, StorageStats};
use crate::error::{StorageError, StorageResult};

type Table<T> = RwLock<BTreeMap<String, T>>;

/// In-memory storage adapter.
///
/// Each table is a `BTreeMap` keyed by id behind its own `RwLock`, so
/// listing yields id order and a list call sees one consistent table state.
///
/// # Example
///
/// ```rust
/// use tradeflow_storage::{InMemoryStorage, StorageAdapter};
///
/// let storage = InMemoryStorage::new();
/// assert_eq!(storage.backend_name(), "memory");
/// ```
#[derive(Default)]
pub struct InMemoryStorage {
    participants: Table<Participant>,
    invoices: Table<Invoice>,
    purchase_orders: Table<PurchaseOrder>,
    inventory_financings: Table<InventoryFinancing>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(table: &Table<T>) -> StorageResult<RwLockReadGuard<'_, BTreeMap<String, T>>> {
    table
        .read()
        .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
}

fn write<T>(table: &Table<T>) -> StorageResult<RwLockWriteGuard<'_, BTreeMap<String, T>>> {
    table
        .write()
        .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
}

fn put<T: Clone>(table: &Table<T>, key: &str, record: &T) -> StorageResult<()> {
    write(table)?.insert(key.to_string(), record.clone());
    Ok(())
}

fn get<T: Clone>(table: &Table<T>, key: &str) -> StorageResult<Option<T>> {
    Ok(read(table)?.get(key).cloned())
}

fn list<T: Clone>(table: &Table<T>) -> StorageResult<Vec<T>> {
    Ok(read(table)?.values().cloned().collect())
}

impl StorageAdapter for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn put_participant(&self, participant: &Participant) -> StorageResult<()> {
        put(&self.participants, participant.id.as_str(), participant)
    }

    fn get_participant(&self, id: &ParticipantId) -> StorageResult<Option<Participant>> {
        get(&self.participants, id.as_str())
    }

    fn list_participants(&self) -> StorageResult<Vec<Participant>> {
        list(&self.participants)
    }

    fn put_invoice(&self, invoice: &Invoice) -> StorageResult<()> {
        put(&self.invoices, invoice.id.as_str(), invoice)
    }

    fn get_invoice(&self, id: &InvoiceId) -> StorageResult<Option<Invoice>> {
        get(&self.invoices, id.as_str())
    }

    fn list_invoices(&self) -> StorageResult<Vec<Invoice>> {
        list(&self.invoices)
    }

    fn put_purchase_order(&self, order: &PurchaseOrder) -> StorageResult<()> {
        put(&self.purchase_orders, order.id.as_str(), order)
    }

    fn get_purchase_order(&self, id: &PurchaseOrderId) -> StorageResult<Option<PurchaseOrder>> {
        get(&self.purchase_orders, id.as_str())
    }

    fn list_purchase_orders(&self) -> StorageResult<Vec<PurchaseOrder>> {
        list(&self.purchase_orders)
    }

    fn put_inventory_financing(&self, financing: &InventoryFinancing) -> StorageResult<()> {
        put(&self.inventory_financings, financing.id.as_str(), financing)
    }

    fn get_inventory_financing(
        &self,
        id: &FinancingId,
    ) -> StorageResult<Option<InventoryFinancing>> {
        get(&self.inventory_financings, id.as_str())
    }

    fn list_inventory_financings(&self) -> StorageResult<Vec<InventoryFinancing>> {
        list(&self.inventory_financings)
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        Ok(StorageStats {
            participant_count: read(&self.participants)?.len(),
            invoice_count: read(&self.invoices)?.len(),
            purchase_order_count: read(&self.purchase_orders)?.len(),
            inventory_financing_count: read(&self.inventory_financings)?.len(),
            file_size_bytes: None,
        })
    }
}
