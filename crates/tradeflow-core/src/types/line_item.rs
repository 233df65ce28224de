//! Line items shared by invoices and purchase orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};

/// One line of an invoice or purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description of the goods.
    pub description: String,
    /// Quantity ordered or delivered.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Rejects negative quantities or prices and blank descriptions.
    pub fn validate(&self) -> FinanceResult<()> {
        if self.description.trim().is_empty() {
            return Err(FinanceError::invalid_input(
                "line_item.description",
                "must not be empty",
            ));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(FinanceError::invalid_input(
                "line_item.quantity",
                format!("must be positive, got {}", self.quantity),
            ));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(FinanceError::invalid_input(
                "line_item.unit_price",
                format!("must not be negative, got {}", self.unit_price),
            ));
        }
        Ok(())
    }
}
