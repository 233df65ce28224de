//! Domain value types.

mod currency;
mod date;
mod ids;
mod line_item;

pub use currency::Currency;
pub use date::Date;
pub use ids::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId, ID_SEQUENCE_WIDTH};
pub use line_item::LineItem;
