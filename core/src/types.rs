//! Value objects shared by the purchase pipeline.
//!
//! `AccountId` guards the "positive account" rule at the type level so
//! collaborators never see an unchecked id. `Money` keeps arithmetic checked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Returned when an account id is zero or negative
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Account id must be positive, got {0}")]
pub struct InvalidAccountId(pub i64);

/// Identifier of the purchasing account (always positive)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AccountId(NonZeroU64);

impl AccountId {
    /// Validate a raw account id
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAccountId`] if `value` is zero or negative.
    pub fn new(value: i64) -> Result<Self, InvalidAccountId> {
        u64::try_from(value)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or(InvalidAccountId(value))
    }

    /// Get the raw numeric id
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<i64> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for i64 {
    fn from(id: AccountId) -> Self {
        // Ids are only ever built from positive i64 values
        Self::try_from(id.get()).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (whole units, integer arithmetic only)
// ============================================================================

/// An amount of money in whole currency units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero units
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from whole units
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in whole units
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
