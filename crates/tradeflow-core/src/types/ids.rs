//! Identifier types for engine entities.
//!
//! Ids are prefixed, zero-padded sequence numbers (`INV-00000042`), so
//! lexical order of ids is creation order in every storage backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the zero-padded sequence part of an id.
pub const ID_SEQUENCE_WIDTH: usize = 8;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Prefix used for generated ids.
            pub const PREFIX: &'static str = $prefix;

            /// Wraps an existing id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Builds the id for the given sequence number.
            pub fn from_sequence(sequence: u64) -> Self {
                Self(format!(
                    "{}-{:0width$}",
                    $prefix,
                    sequence,
                    width = ID_SEQUENCE_WIDTH
                ))
            }

            /// Sequence number of a generated id; `None` for ids in any other shape.
            pub fn sequence(&self) -> Option<u64> {
                self.0
                    .strip_prefix($prefix)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .and_then(|digits| digits.parse().ok())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Supply-chain participant identifier.
    ParticipantId,
    "PRT"
);

entity_id!(
    /// Invoice identifier.
    InvoiceId,
    "INV"
);

entity_id!(
    /// Purchase order identifier.
    PurchaseOrderId,
    "PO"
);

entity_id!(
    /// Inventory financing agreement identifier.
    FinancingId,
    "INVF"
);
