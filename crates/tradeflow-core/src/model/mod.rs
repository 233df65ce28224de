//! Entity models and their state machines.
//!
//! Each model owns its transition rules. A transition method either applies
//! fully or returns an error and leaves the entity untouched.

mod inventory;
mod invoice;
mod participant;
mod purchase_order;

pub use inventory::{
    CollateralCondition, CollateralItem, Installment, InstallmentStatus, InventoryFinancing,
    InventoryFinancingStatus, NewInventoryFinancing,
};
pub use invoice::{net_payout, FactoringOffer, Invoice, InvoiceStatus, NewInvoice};
pub use participant::{
    validate_credit_rating, NewParticipant, NewParticipantBuilder, Participant,
    ParticipantCategory, VerificationStatus, MAX_CREDIT_RATING, MIN_CREDIT_RATING,
};
pub use purchase_order::{FinancingTerms, NewPurchaseOrder, PurchaseOrder, PurchaseOrderStatus};
