//! # Tradeflow Core
//!
//! Domain types, entity models, and errors for the Tradeflow supply-chain
//! financing engine.
//!
//! - **Types**: `Date`, `Currency`, entity ids, `LineItem`
//! - **Models**: participants, invoices, purchase orders, inventory financing
//!   agreements, each with its own state machine
//! - **Errors**: the `FinanceError` taxonomy shared by every crate
//!
//! ## Example
//!
//! ```rust
//! use tradeflow_core::model::net_payout;
//! use rust_decimal_macros::dec;
//!
//! // 3.5% factoring fee on a 25,000 invoice
//! assert_eq!(net_payout(dec!(25000), dec!(3.5)).unwrap(), dec!(24125));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod model;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FinanceError, FinanceResult};
    pub use crate::model::{
        CollateralCondition, CollateralItem, Installment, InstallmentStatus, InventoryFinancing,
        InventoryFinancingStatus, Invoice, InvoiceStatus, NewInventoryFinancing, NewInvoice,
        NewParticipant, NewPurchaseOrder, Participant, ParticipantCategory, PurchaseOrder,
        PurchaseOrderStatus, VerificationStatus,
    };
    pub use crate::types::{
        Currency, Date, FinancingId, InvoiceId, LineItem, ParticipantId, PurchaseOrderId,
    };
}

// Re-export commonly used types at crate root
pub use error::{FinanceError, FinanceResult, MAX_AMOUNT};
pub use types::{Currency, Date};
