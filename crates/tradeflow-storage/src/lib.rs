//! Tradeflow Storage Layer
//!
//! This crate provides storage adapters for the Tradeflow supply-chain
//! financing engine. Every backend exposes one keyed table per entity
//! (participants, invoices, purchase orders, inventory financings) behind
//! the [`StorageAdapter`] trait.
//!
//! # Storage Backends
//!
//! ## RedbStorage
//!
//! Uses [redb](https://crates.io/crates/redb), a pure-Rust embedded database
//! with ACID transactions. Records are stored as JSON values keyed by id.
//!
//! ## InMemoryStorage
//!
//! A `BTreeMap`-backed implementation for tests and development.
//! Data is not persisted across restarts.
//!
//! # Example
//!
//! ```rust,ignore
//! use tradeflow_storage::{RedbStorage, StorageAdapter};
//!
//! let storage = RedbStorage::open("./tradeflow.redb")?;
//! storage.put_participant(&participant)?;
//! let stored = storage.get_participant(&participant.id)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod adapter;
mod error;
mod memory;
mod redb;

#[cfg(test)]
mod test_fixtures;

pub use adapter::{StorageAdapter, StorageStats};
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use redb::RedbStorage;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::{StorageAdapter, StorageStats};
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::memory::InMemoryStorage;
    pub use crate::redb::RedbStorage;
}
