//! RedbStorage implementation.
//!
//! Implements the StorageAdapter trait using redb as the underlying database.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use tradeflow_core::model::{InventoryFinancing, Invoice, Participant, PurchaseOrder};
use tradeflow_core::types::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId};

use crate::adapter::{StorageAdapter, StorageStats};
use crate::error::StorageResult;

/// Every table maps an entity id to its JSON-encoded record.
type RecordTable = TableDefinition<'static, &'static str, &'static [u8]>;

// Table definitions
const PARTICIPANTS_TABLE: RecordTable = TableDefinition::new("participants");
const INVOICES_TABLE: RecordTable = TableDefinition::new("invoices");
const PURCHASE_ORDERS_TABLE: RecordTable = TableDefinition::new("purchase_orders");
const INVENTORY_FINANCINGS_TABLE: RecordTable = TableDefinition::new("inventory_financings");

/// Redb-based storage adapter.
///
/// Records are stored as JSON under their id. redb orders `&str` keys
/// lexically, which is creation order for engine-assigned ids. Every put is
/// its own write transaction; every list runs inside one read transaction.
///
/// # Example
///
/// ```rust,ignore
/// use tradeflow_storage::{RedbStorage, StorageAdapter};
///
/// let storage = RedbStorage::open("./tradeflow.redb")?;
/// assert!(storage.is_healthy());
/// ```
pub struct RedbStorage {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        let storage = Self {
            db: Arc::new(db),
            path,
        };
        storage.initialize_tables()?;
        Ok(storage)
    }

    /// Initializes all required tables.
    fn initialize_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PARTICIPANTS_TABLE)?;
            let _ = write_txn.open_table(INVOICES_TABLE)?;
            let _ = write_txn.open_table(PURCHASE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(INVENTORY_FINANCINGS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn put<T: Serialize>(
        &self,
        table: RecordTable,
        key: &str,
        record: &T,
    ) -> StorageResult<()> {
        let data = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table)?;
            table.insert(key, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table: RecordTable,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;
        match table.get(key)? {
            Some(data) => Ok(Some(serde_json::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    fn list<T: DeserializeOwned>(&self, table: RecordTable) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table)?;

        let mut results = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            results.push(serde_json::from_slice(value.value())?);
        }
        Ok(results)
    }
}

impl StorageAdapter for RedbStorage {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    fn is_healthy(&self) -> bool {
        // Try a simple read transaction to verify database is accessible
        self.db.begin_read().is_ok()
    }

    fn put_participant(&self, participant: &Participant) -> StorageResult<()> {
        self.put(PARTICIPANTS_TABLE, participant.id.as_str(), participant)
    }

    fn get_participant(&self, id: &ParticipantId) -> StorageResult<Option<Participant>> {
        self.get(PARTICIPANTS_TABLE, id.as_str())
    }

    fn list_participants(&self) -> StorageResult<Vec<Participant>> {
        self.list(PARTICIPANTS_TABLE)
    }

    fn put_invoice(&self, invoice: &Invoice) -> StorageResult<()> {
        self.put(INVOICES_TABLE, invoice.id.as_str(), invoice)
    }

    fn get_invoice(&self, id: &InvoiceId) -> StorageResult<Option<Invoice>> {
        self.get(INVOICES_TABLE, id.as_str())
    }

    fn list_invoices(&self) -> StorageResult<Vec<Invoice>> {
        self.list(INVOICES_TABLE)
    }

    fn put_purchase_order(&self, order: &PurchaseOrder) -> StorageResult<()> {
        self.put(PURCHASE_ORDERS_TABLE, order.id.as_str(), order)
    }

    fn get_purchase_order(&self, id: &PurchaseOrderId) -> StorageResult<Option<PurchaseOrder>> {
        self.get(PURCHASE_ORDERS_TABLE, id.as_str())
    }

    fn list_purchase_orders(&self) -> StorageResult<Vec<PurchaseOrder>> {
        self.list(PURCHASE_ORDERS_TABLE)
    }

    fn put_inventory_financing(&self, financing: &InventoryFinancing) -> StorageResult<()> {
        self.put(INVENTORY_FINANCINGS_TABLE, financing.id.as_str(), financing)
    }

    fn get_inventory_financing(
        &self,
        id: &FinancingId,
    ) -> StorageResult<Option<InventoryFinancing>> {
        self.get(INVENTORY_FINANCINGS_TABLE, id.as_str())
    }

    fn list_inventory_financings(&self) -> StorageResult<Vec<InventoryFinancing>> {
        self.list(INVENTORY_FINANCINGS_TABLE)
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let participant_count = read_txn.open_table(PARTICIPANTS_TABLE)?.len()? as usize;
        let invoice_count = read_txn.open_table(INVOICES_TABLE)?.len()? as usize;
        let purchase_order_count = read_txn.open_table(PURCHASE_ORDERS_TABLE)?.len()? as usize;
        let inventory_financing_count =
            read_txn.open_table(INVENTORY_FINANCINGS_TABLE)?.len()? as usize;

        let file_size_bytes = std::fs::metadata(&self.path).ok().map(|m| m.len());

        Ok(StorageStats {
            participant_count,
            invoice_count,
            purchase_order_count,
            inventory_financing_count,
            file_size_bytes,
        })
    }
}
