//! # Tradeflow Engine
//!
//! The supply-chain financing engine.
//!
//! This crate provides:
//! - [`ParticipantRegistry`]: participant onboarding with unique business identity
//! - [`RateCalculator`]: credit-rating driven PO and inventory rates
//! - [`InvoiceLedger`]: invoices, factoring offers and factoring
//! - [`PurchaseOrderLedger`]: purchase orders and auto-approved financing
//! - [`InventoryLedger`]: inventory-backed loans with flat-rate schedules
//! - [`MetricsAggregator`]: on-demand portfolio metrics
//! - [`FinancingEngine`]: the facade the host process shares with callers
//!
//! ## Architecture
//!
//! ```text
//! ParticipantRegistry ─> RateCalculator ─┬─> InvoiceLedger ──────┐
//!                                        ├─> PurchaseOrderLedger ├─> MetricsAggregator
//!                                        └─> InventoryLedger ────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal_macros::dec;
//! use tradeflow_core::model::{NewParticipant, ParticipantCategory};
//! use tradeflow_engine::{FinancingEngineBuilder, FinancingProduct};
//! use tradeflow_storage::InMemoryStorage;
//!
//! let engine = FinancingEngineBuilder::new()
//!     .with_storage(Arc::new(InMemoryStorage::new()))
//!     .build()
//!     .unwrap();
//!
//! let buyer = engine
//!     .register_participant(
//!         NewParticipant::builder("Kampala Wholesale", ParticipantCategory::Distributor)
//!             .credit_rating(9)
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let quote = engine.quote_rate(&buyer, FinancingProduct::PurchaseOrder).unwrap();
//! assert_eq!(quote.rate, dec!(5.5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod clock;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod invoices;
pub mod metrics;
pub mod purchase_orders;
pub mod rates;
pub mod registry;
pub mod schedule;

mod locks;
mod sequence;

// Re-exports
pub use builder::FinancingEngineBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{FinancingEngine, SweepReport};
pub use error::EngineError;
pub use inventory::InventoryLedger;
pub use invoices::{InvoiceFilter, InvoiceLedger};
pub use metrics::{compute_metrics, CategoryVolume, MetricsAggregator, RiskTierCounts, SupplyChainMetrics};
pub use purchase_orders::PurchaseOrderLedger;
pub use rates::{
    financing_rate, inventory_financing_rate, FinancingProduct, RateCalculator, RateQuote,
    RiskTier,
};
pub use registry::ParticipantRegistry;
pub use schedule::flat_rate_schedule;
