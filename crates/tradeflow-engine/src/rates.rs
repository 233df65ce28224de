//! Credit-rating driven rate derivation.
//!
//! Purchase-order and inventory-backed financing are priced from the
//! counterparty's credit rating:
//!
//! ```text
//! po rate        = 5.0 + (10 - rating) * 0.5
//! inventory rate = 8.0 + (10 - rating) * 0.3
//! ```
//!
//! Factoring fees are set per invoice and never derived here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tradeflow_config::RatePolicy;
use tradeflow_core::model::{validate_credit_rating, Participant, MAX_CREDIT_RATING};
use tradeflow_core::types::ParticipantId;
use tradeflow_core::{FinanceError, FinanceResult};

/// Purchase-order financing rate under the default policy, in percent.
pub fn financing_rate(credit_rating: u8) -> FinanceResult<Decimal> {
    RateCalculator::default().po_rate(credit_rating)
}

/// Inventory-backed financing rate under the default policy, in percent.
pub fn inventory_financing_rate(credit_rating: u8) -> FinanceResult<Decimal> {
    RateCalculator::default().inventory_rate(credit_rating)
}

/// Financing product a quote is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingProduct {
    /// Purchase-order financing, priced on the buyer.
    PurchaseOrder,
    /// Inventory-backed financing, priced on the borrower.
    Inventory,
}

impl fmt::Display for FinancingProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PurchaseOrder => f.write_str("purchase_order"),
            Self::Inventory => f.write_str("inventory"),
        }
    }
}

impl FromStr for FinancingProduct {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "purchase_order" | "po" => Ok(Self::PurchaseOrder),
            "inventory" => Ok(Self::Inventory),
            other => Err(FinanceError::invalid_input(
                "product",
                format!("unknown financing product '{other}'"),
            )),
        }
    }
}

/// Coarse risk bucket derived from a credit rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Rating 8-10.
    Low,
    /// Rating 5-7.
    Medium,
    /// Rating 1-4.
    High,
}

impl RiskTier {
    /// Buckets a validated credit rating.
    pub fn from_rating(credit_rating: u8) -> FinanceResult<Self> {
        Ok(match validate_credit_rating(credit_rating)? {
            8..=10 => Self::Low,
            5..=7 => Self::Medium,
            _ => Self::High,
        })
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

/// A priced rate for one participant and product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Quoted participant.
    pub participant_id: ParticipantId,
    /// Product priced.
    pub product: FinancingProduct,
    /// Rating the quote was derived from.
    pub credit_rating: u8,
    /// Risk bucket of that rating.
    pub risk_tier: RiskTier,
    /// Annual rate in percent.
    pub rate: Decimal,
}

/// Stateless rate calculator over a [`RatePolicy`].
#[derive(Debug, Clone, Default)]
pub struct RateCalculator {
    policy: RatePolicy,
}

impl RateCalculator {
    /// Creates a calculator for the given policy.
    pub fn new(policy: RatePolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    /// Purchase-order financing rate for a credit rating.
    pub fn po_rate(&self, credit_rating: u8) -> FinanceResult<Decimal> {
        rating_adjusted(
            self.policy.po_base_rate,
            self.policy.po_rating_step,
            credit_rating,
        )
    }

    /// Inventory-backed financing rate for a credit rating.
    pub fn inventory_rate(&self, credit_rating: u8) -> FinanceResult<Decimal> {
        rating_adjusted(
            self.policy.inventory_base_rate,
            self.policy.inventory_rating_step,
            credit_rating,
        )
    }

    /// Rate for `product` given the participant's current rating.
    pub fn rate_for(&self, product: FinancingProduct, credit_rating: u8) -> FinanceResult<Decimal> {
        match product {
            FinancingProduct::PurchaseOrder => self.po_rate(credit_rating),
            FinancingProduct::Inventory => self.inventory_rate(credit_rating),
        }
    }

    /// Builds a full quote for a participant.
    pub fn quote(
        &self,
        participant: &Participant,
        product: FinancingProduct,
    ) -> FinanceResult<RateQuote> {
        let rate = self.rate_for(product, participant.credit_rating)?;
        Ok(RateQuote {
            participant_id: participant.id.clone(),
            product,
            credit_rating: participant.credit_rating,
            risk_tier: RiskTier::from_rating(participant.credit_rating)?,
            rate,
        })
    }
}

fn rating_adjusted(base: Decimal, step: Decimal, credit_rating: u8) -> FinanceResult<Decimal> {
    let rating = validate_credit_rating(credit_rating)?;
    let notches = Decimal::from(MAX_CREDIT_RATING - rating);
    Ok(base + notches * step)
}
