//! Business rules for the composition of a purchase.
//!
//! Rules are checked in a fixed order so the reported reason is deterministic:
//!
//! 1. At least one ticket must be requested
//! 2. The total quantity must not exceed the purchase cap
//! 3. Child and infant tickets need an adult ticket in the same purchase
//!
//! An adult entry with quantity zero does not count as an adult.

use crate::ticket::{TicketRequest, TicketType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a purchase failed the business rules
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Nothing to purchase
    #[error("No tickets requested")]
    Empty,

    /// Purchase cap exceeded
    #[error("Requested {requested} tickets, maximum per purchase is {max}")]
    ExceedsMaximum {
        /// Total tickets requested
        requested: u64,
        /// Configured cap
        max: u32,
    },

    /// Child or infant tickets without an adult
    #[error("Child and infant tickets require at least one adult ticket")]
    NoAdult,
}

/// Validates ticket requests against the purchase cap and composition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseValidator {
    max_tickets: u32,
}

impl PurchaseValidator {
    /// Creates a validator with the given cap (inclusive)
    #[must_use]
    pub const fn new(max_tickets: u32) -> Self {
        Self { max_tickets }
    }

    /// The configured cap
    #[must_use]
    pub const fn max_tickets(&self) -> u32 {
        self.max_tickets
    }

    /// Check all rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] that applies.
    pub fn validate(&self, requests: &[TicketRequest]) -> Result<(), ValidationError> {
        let requested = total_quantity(requests);

        if requested == 0 {
            return Err(ValidationError::Empty);
        }

        if requested > u64::from(self.max_tickets) {
            return Err(ValidationError::ExceedsMaximum {
                requested,
                max: self.max_tickets,
            });
        }

        let needs_adult = requests
            .iter()
            .any(|r| r.ticket_type().requires_adult() && r.quantity() > 0);
        let has_adult = requests
            .iter()
            .any(|r| r.ticket_type() == TicketType::Adult && r.quantity() > 0);

        if needs_adult && !has_adult {
            return Err(ValidationError::NoAdult);
        }

        Ok(())
    }

    /// Whether the requests satisfy every rule
    #[must_use]
    pub fn is_valid(&self, requests: &[TicketRequest]) -> bool {
        self.validate(requests).is_ok()
    }
}

impl Default for PurchaseValidator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TICKETS)
    }
}

/// Sum of quantities, widened so it cannot overflow
fn total_quantity(requests: &[TicketRequest]) -> u64 {
    requests.iter().map(|r| u64::from(r.quantity())).sum()
}
