//! Typed IDs for type-safe entity references.
//!
//! Every tenant-scoped table uses a `BIGSERIAL` key. Wrapping the raw `i64`
//! keeps a `TenantId` from being passed where an `ItemId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw database key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant (organization).");
typed_id!(ItemId, "Unique identifier for an inventory or service item.");
typed_id!(ItemCategoryId, "Unique identifier for an item category.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(ContactId, "Unique identifier for a customer or vendor.");
typed_id!(LedgerEntryId, "Unique identifier for a contact ledger entry.");
