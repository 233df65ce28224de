//! Supply-chain participants and their credit attributes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FinanceError, FinanceResult};
use crate::types::ParticipantId;

/// Lowest valid credit rating.
pub const MIN_CREDIT_RATING: u8 = 1;
/// Highest valid credit rating.
pub const MAX_CREDIT_RATING: u8 = 10;

/// Role of a participant in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantCategory {
    /// Raw material or goods supplier.
    Supplier,
    /// Manufacturer.
    Manufacturer,
    /// Distributor or wholesaler.
    Distributor,
    /// Retailer.
    Retailer,
}

impl ParticipantCategory {
    /// All categories, in declaration order.
    pub const ALL: [ParticipantCategory; 4] = [
        ParticipantCategory::Supplier,
        ParticipantCategory::Manufacturer,
        ParticipantCategory::Distributor,
        ParticipantCategory::Retailer,
    ];

    /// Lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Manufacturer => "manufacturer",
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
        }
    }
}

impl fmt::Display for ParticipantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantCategory {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier" => Ok(Self::Supplier),
            "manufacturer" => Ok(Self::Manufacturer),
            "distributor" => Ok(Self::Distributor),
            "retailer" => Ok(Self::Retailer),
            other => Err(FinanceError::invalid_input(
                "category",
                format!("unknown participant category '{other}'"),
            )),
        }
    }
}

/// KYC verification state, supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Identity verified.
    Verified,
    /// Verification in progress.
    Pending,
    /// Not verified.
    #[default]
    Unverified,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Unverified => "unverified",
        };
        f.write_str(name)
    }
}

/// Checks that a credit rating lies in 1..=10.
pub fn validate_credit_rating(rating: u8) -> FinanceResult<u8> {
    if (MIN_CREDIT_RATING..=MAX_CREDIT_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(FinanceError::InvalidCreditRating { rating })
    }
}

/// A registered supply-chain participant.
///
/// Identity (`name`, `category`) is immutable once registered. Credit rating
/// and on-time rate are maintained by external reputation processes and are
/// read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Engine-assigned id.
    pub id: ParticipantId,
    /// Business name.
    pub name: String,
    /// Supply-chain role.
    pub category: ParticipantCategory,
    /// KYC status.
    pub verification: VerificationStatus,
    /// Credit rating, 1 (worst) to 10 (best).
    pub credit_rating: u8,
    /// Monthly transaction volume.
    pub monthly_volume: Decimal,
    /// Standard payment terms in days.
    pub payment_terms_days: u32,
    /// Historical on-time payment rate, in percent.
    pub on_time_rate: Decimal,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Normalized business identity used for duplicate detection.
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, self.category)
    }

    /// Returns true if KYC verification has completed.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verification == VerificationStatus::Verified
    }
}

fn identity_key(name: &str, category: ParticipantCategory) -> String {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}:{}", category.as_str(), normalized.to_lowercase())
}

/// Onboarding request for a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParticipant {
    /// Business name.
    pub name: String,
    /// Supply-chain role.
    pub category: ParticipantCategory,
    /// KYC status at onboarding.
    #[serde(default)]
    pub verification: VerificationStatus,
    /// Credit rating, 1-10.
    pub credit_rating: u8,
    /// Monthly transaction volume.
    #[serde(default)]
    pub monthly_volume: Decimal,
    /// Standard payment terms in days.
    #[serde(default = "default_payment_terms")]
    pub payment_terms_days: u32,
    /// Historical on-time payment rate, in percent.
    #[serde(default)]
    pub on_time_rate: Decimal,
}

fn default_payment_terms() -> u32 {
    30
}

impl NewParticipant {
    /// Starts a builder with the required identity fields.
    pub fn builder(name: impl Into<String>, category: ParticipantCategory) -> NewParticipantBuilder {
        NewParticipantBuilder::new(name, category)
    }

    /// Normalized business identity used for duplicate detection.
    #[must_use]
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, self.category)
    }

    /// Validates onboarding fields.
    pub fn validate(&self) -> FinanceResult<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::invalid_input("name", "must not be empty"));
        }
        validate_credit_rating(self.credit_rating)?;
        if self.monthly_volume < Decimal::ZERO {
            return Err(FinanceError::invalid_input(
                "monthly_volume",
                "must not be negative",
            ));
        }
        if self.on_time_rate < Decimal::ZERO || self.on_time_rate > Decimal::ONE_HUNDRED {
            return Err(FinanceError::invalid_input(
                "on_time_rate",
                format!("must be between 0 and 100, got {}", self.on_time_rate),
            ));
        }
        Ok(())
    }

    /// Materializes the participant under the assigned id.
    #[must_use]
    pub fn into_participant(self, id: ParticipantId, registered_at: DateTime<Utc>) -> Participant {
        Participant {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            verification: self.verification,
            credit_rating: self.credit_rating,
            monthly_volume: self.monthly_volume,
            payment_terms_days: self.payment_terms_days,
            on_time_rate: self.on_time_rate,
            registered_at,
        }
    }
}

/// Builder for [`NewParticipant`].
#[derive(Debug)]
pub struct NewParticipantBuilder {
    inner: NewParticipant,
}

impl NewParticipantBuilder {
    /// Creates a builder with defaults: unverified, rating 5, 30-day terms.
    pub fn new(name: impl Into<String>, category: ParticipantCategory) -> Self {
        Self {
            inner: NewParticipant {
                name: name.into(),
                category,
                verification: VerificationStatus::Unverified,
                credit_rating: 5,
                monthly_volume: Decimal::ZERO,
                payment_terms_days: default_payment_terms(),
                on_time_rate: Decimal::ZERO,
            },
        }
    }

    /// Sets the verification status.
    pub fn verification(mut self, verification: VerificationStatus) -> Self {
        self.inner.verification = verification;
        self
    }

    /// Sets the credit rating.
    pub fn credit_rating(mut self, rating: u8) -> Self {
        self.inner.credit_rating = rating;
        self
    }

    /// Sets the monthly transaction volume.
    pub fn monthly_volume(mut self, volume: Decimal) -> Self {
        self.inner.monthly_volume = volume;
        self
    }

    /// Sets the standard payment terms.
    pub fn payment_terms_days(mut self, days: u32) -> Self {
        self.inner.payment_terms_days = days;
        self
    }

    /// Sets the on-time payment rate (percent).
    pub fn on_time_rate(mut self, rate: Decimal) -> Self {
        self.inner.on_time_rate = rate;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> NewParticipant {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identity_key_normalizes_case_and_whitespace() {
        let a = NewParticipant::builder("  Acme   Textiles ", ParticipantCategory::Supplier).build();
        let b = NewParticipant::builder("acme textiles", ParticipantCategory::Supplier).build();
        let c = NewParticipant::builder("acme textiles", ParticipantCategory::Retailer).build();
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a.identity_key(), c.identity_key());
    }

    #[test]
    fn test_validate_rejects_bad_rating() {
        let p = NewParticipant::builder("Acme", ParticipantCategory::Supplier)
            .credit_rating(11)
            .build();
        assert_eq!(
            p.validate(),
            Err(FinanceError::InvalidCreditRating { rating: 11 })
        );
    }

    #[test]
    fn test_validate_rejects_on_time_rate_over_100() {
        let p = NewParticipant::builder("Acme", ParticipantCategory::Supplier)
            .on_time_rate(dec!(100.5))
            .build();
        assert!(matches!(
            p.validate(),
            Err(FinanceError::InvalidInput { field: "on_time_rate", .. })
        ));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            "Distributor".parse::<ParticipantCategory>().unwrap(),
            ParticipantCategory::Distributor
        );
        assert!("broker".parse::<ParticipantCategory>().is_err());
    }

    #[test]
    fn test_credit_rating_bounds() {
        assert!(validate_credit_rating(1).is_ok());
        assert!(validate_credit_rating(10).is_ok());
        assert!(validate_credit_rating(0).is_err());
    }
}
