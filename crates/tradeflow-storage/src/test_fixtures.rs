//! Shared records for backend unit tests.

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use tradeflow_core::model::{Invoice, NewInvoice, NewParticipant, Participant, ParticipantCategory};
use tradeflow_core::types::{Currency, Date, InvoiceId, ParticipantId};

pub(crate) fn sample_participant(seq: u64, name: &str) -> Participant {
    NewParticipant::builder(name, ParticipantCategory::Supplier)
        .credit_rating(7)
        .monthly_volume(dec!(50000))
        .build()
        .into_participant(
            ParticipantId::from_sequence(seq),
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
        )
}

pub(crate) fn sample_invoice(seq: u64) -> Invoice {
    NewInvoice {
        supplier_id: ParticipantId::from_sequence(1),
        buyer_id: ParticipantId::from_sequence(2),
        amount: dec!(12500),
        currency: Currency::KES,
        issue_date: Date::from_ymd(2025, 1, 10).unwrap(),
        due_date: Date::from_ymd(2025, 2, 9).unwrap(),
        items: vec![],
    }
    .into_invoice(InvoiceId::from_sequence(seq))
}
