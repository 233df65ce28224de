//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// ISO 4217 currency codes accepted on invoices and purchase orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// United States Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Kenyan Shilling
    KES,
    /// Nigerian Naira
    NGN,
    /// Ghanaian Cedi
    GHS,
    /// South African Rand
    ZAR,
    /// Indian Rupee
    INR,
    /// Philippine Peso
    PHP,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::KES => "KES",
            Currency::NGN => "NGN",
            Currency::GHS => "GHS",
            Currency::ZAR => "ZAR",
            Currency::INR => "INR",
            Currency::PHP => "PHP",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "KES" => Ok(Currency::KES),
            "NGN" => Ok(Currency::NGN),
            "GHS" => Ok(Currency::GHS),
            "ZAR" => Ok(Currency::ZAR),
            "INR" => Ok(Currency::INR),
            "PHP" => Ok(Currency::PHP),
            "BRL" => Ok(Currency::BRL),
            "MXN" => Ok(Currency::MXN),
            other => Err(FinanceError::invalid_input(
                "currency",
                format!("unsupported currency code '{other}'"),
            )),
        }
    }
}
