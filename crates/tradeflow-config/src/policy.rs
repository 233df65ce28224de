//! Pricing, schedule and metrics policy sections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

// =============================================================================
// RATE POLICY
// =============================================================================

/// Credit-rating driven rate policy.
///
/// A rate is `base + (10 - rating) * step`, in percent. Factoring fees are
/// set per invoice and are not derived from this policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatePolicy {
    /// Base rate for purchase-order financing, percent.
    pub po_base_rate: Decimal,
    /// Rate added per rating notch below 10, purchase-order financing.
    pub po_rating_step: Decimal,
    /// Base rate for inventory-backed financing, percent.
    pub inventory_base_rate: Decimal,
    /// Rate added per rating notch below 10, inventory-backed financing.
    pub inventory_rating_step: Decimal,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            po_base_rate: Decimal::new(50, 1),
            po_rating_step: Decimal::new(5, 1),
            inventory_base_rate: Decimal::new(80, 1),
            inventory_rating_step: Decimal::new(3, 1),
        }
    }
}

impl Validate for RatePolicy {
    fn validate(&self) -> Vec<ValidationError> {
        let fields = [
            ("po_base_rate", self.po_base_rate),
            ("po_rating_step", self.po_rating_step),
            ("inventory_base_rate", self.inventory_base_rate),
            ("inventory_rating_step", self.inventory_rating_step),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| *value <= Decimal::ZERO)
            .map(|(field, value)| {
                ValidationError::new(field, format!("must be positive, got {value}"))
            })
            .collect()
    }
}

// =============================================================================
// INVENTORY POLICY
// =============================================================================

/// Inventory-backed financing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryPolicy {
    /// Repayment term fixed at approval, in months.
    pub term_months: u32,
    /// Decimal places installment figures are rounded to.
    pub amount_scale: u32,
}

/// Largest scale `rust_decimal` can represent.
const MAX_SCALE: u32 = 28;

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            term_months: 6,
            amount_scale: 2,
        }
    }
}

impl Validate for InventoryPolicy {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.term_months == 0 {
            errors.push(ValidationError::new("term_months", "must be at least 1"));
        }
        if self.amount_scale > MAX_SCALE {
            errors.push(ValidationError::new(
                "amount_scale",
                format!("must be at most {MAX_SCALE}, got {}", self.amount_scale),
            ));
        }
        errors
    }
}

// =============================================================================
// METRICS
// =============================================================================

/// Portfolio metrics settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Number of categories reported in the financed-volume ranking.
    pub top_categories: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { top_categories: 3 }
    }
}

impl Validate for MetricsConfig {
    fn validate(&self) -> Vec<ValidationError> {
        if self.top_categories == 0 {
            vec![ValidationError::new("top_categories", "must be at least 1")]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_policy_defaults() {
        let policy = RatePolicy::default();
        assert_eq!(policy.po_base_rate, dec!(5.0));
        assert_eq!(policy.po_rating_step, dec!(0.5));
        assert_eq!(policy.inventory_base_rate, dec!(8.0));
        assert_eq!(policy.inventory_rating_step, dec!(0.3));
        assert!(policy.is_valid());
    }

    #[test]
    fn test_rate_policy_rejects_non_positive() {
        let policy = RatePolicy {
            po_rating_step: Decimal::ZERO,
            inventory_base_rate: dec!(-1),
            ..RatePolicy::default()
        };
        let fields: Vec<_> = policy.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["po_rating_step", "inventory_base_rate"]);
    }

    #[test]
    fn test_inventory_policy_rejects_zero_term() {
        let policy = InventoryPolicy {
            term_months: 0,
            ..InventoryPolicy::default()
        };
        assert!(!policy.is_valid());
    }

    #[test]
    fn test_metrics_rejects_zero_top_n() {
        assert!(!MetricsConfig { top_categories: 0 }.is_valid());
        assert!(MetricsConfig::default().is_valid());
    }
}
