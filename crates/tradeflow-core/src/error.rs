//! Error types for the Tradeflow engine.
//!
//! Every failure is a local validation failure raised synchronously by the
//! operation that detects it. Operations are all-or-nothing: when an error is
//! returned, no state has been changed.

use rust_decimal::Decimal;
use thiserror::Error;

/// A specialized Result type for Tradeflow operations.
pub type FinanceResult<T> = Result<T, FinanceError>;

/// The main error type for Tradeflow operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinanceError {
    /// Unknown id for the addressed entity.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity (e.g. "invoice").
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A referenced participant is not registered.
    #[error("Unknown participant: {id}")]
    UnknownParticipant {
        /// The unregistered participant id.
        id: String,
    },

    /// The same business identity was registered twice.
    #[error("Participant '{name}' is already registered as {category} ({existing_id})")]
    DuplicateParticipant {
        /// Business name.
        name: String,
        /// Participant category.
        category: String,
        /// Id of the existing registration.
        existing_id: String,
    },

    /// The operation is not legal for the entity's current status.
    #[error("Cannot {operation} {entity} {id} in status {status}")]
    InvalidState {
        /// Kind of entity.
        entity: &'static str,
        /// Entity id.
        id: String,
        /// Current status.
        status: String,
        /// Attempted operation.
        operation: &'static str,
    },

    /// Factoring requested on an invoice with no offer attached.
    #[error("Invoice {invoice_id} has no factoring offer")]
    NoFactoringOffer {
        /// Invoice id.
        invoice_id: String,
    },

    /// Requested PO financing is larger than the order value.
    #[error("Requested financing {requested} exceeds order value {order_value}")]
    FinancingExceedsOrderValue {
        /// Requested amount.
        requested: Decimal,
        /// Purchase order amount.
        order_value: Decimal,
    },

    /// Requested inventory financing is larger than the declared inventory value.
    #[error("Requested financing {requested} exceeds inventory value {inventory_value}")]
    CollateralInsufficient {
        /// Requested amount.
        requested: Decimal,
        /// Declared inventory value.
        inventory_value: Decimal,
    },

    /// Credit rating outside the inclusive range 1-10.
    #[error("Invalid credit rating {rating}: must be between 1 and 10")]
    InvalidCreditRating {
        /// The rejected rating.
        rating: u8,
    },

    /// Installment has already been paid.
    #[error("Installment {index} of financing {financing_id} is already paid")]
    AlreadyPaid {
        /// Financing id.
        financing_id: String,
        /// Zero-based installment index.
        index: usize,
    },

    /// Installment index is past the end of the schedule.
    #[error("Installment index {index} out of range (schedule has {len} installments)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Schedule length.
        len: usize,
    },

    /// Malformed input (non-positive amount, inverted dates, ...).
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// The storage backend failed.
    #[error("Storage error: {reason}")]
    Storage {
        /// Backend error message.
        reason: String,
    },
}

impl FinanceError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an unknown-participant error.
    #[must_use]
    pub fn unknown_participant(id: impl Into<String>) -> Self {
        Self::UnknownParticipant { id: id.into() }
    }

    /// Creates an invalid-state error.
    #[must_use]
    pub fn invalid_state(
        entity: &'static str,
        id: impl Into<String>,
        status: impl ToString,
        operation: &'static str,
    ) -> Self {
        Self::InvalidState {
            entity,
            id: id.into(),
            status: status.to_string(),
            operation,
        }
    }

    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for RPC callers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UnknownParticipant { .. } => "UNKNOWN_PARTICIPANT",
            Self::DuplicateParticipant { .. } => "DUPLICATE_PARTICIPANT",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::NoFactoringOffer { .. } => "NO_FACTORING_OFFER",
            Self::FinancingExceedsOrderValue { .. } => "FINANCING_EXCEEDS_ORDER_VALUE",
            Self::CollateralInsufficient { .. } => "COLLATERAL_INSUFFICIENT",
            Self::InvalidCreditRating { .. } => "INVALID_CREDIT_RATING",
            Self::AlreadyPaid { .. } => "ALREADY_PAID",
            Self::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }
}

/// Largest monetary amount accepted on any ledger (10^18).
///
/// Products and sums of accepted amounts stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Rejects zero, negative, and oversized amounts.
pub(crate) fn ensure_amount(field: &'static str, value: Decimal) -> FinanceResult<()> {
    if value <= Decimal::ZERO {
        return Err(FinanceError::invalid_input(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(FinanceError::invalid_input(
            field,
            format!("must not exceed {MAX_AMOUNT}, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = FinanceError::not_found("invoice", "INV-00000001");
        assert_eq!(err.to_string(), "invoice not found: INV-00000001");
    }

    #[test]
    fn test_invalid_state_display() {
        let err = FinanceError::invalid_state("invoice", "INV-00000001", "factored", "factor");
        assert!(err.to_string().contains("Cannot factor invoice INV-00000001"));
        assert_eq!(err.code(), "INVALID_STATE");
    }

    #[test]
    fn test_ensure_amount() {
        assert!(ensure_amount("amount", dec!(1)).is_ok());
        assert!(ensure_amount("amount", MAX_AMOUNT).is_ok());
        assert!(matches!(
            ensure_amount("amount", dec!(0)),
            Err(FinanceError::InvalidInput { field: "amount", .. })
        ));
        assert!(matches!(
            ensure_amount("amount", MAX_AMOUNT + Decimal::ONE),
            Err(FinanceError::InvalidInput { field: "amount", .. })
        ));
        assert!(ensure_amount("amount", Decimal::MAX).is_err());
    }

    #[test]
    fn test_max_amount_value() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000_000_i64));
    }
}
