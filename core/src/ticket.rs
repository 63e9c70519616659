//! Ticket line items.
//!
//! A [`TicketRequest`] is one line of a purchase: "N tickets of type T". It is
//! validated once at construction and is read-only afterwards. Construction
//! errors are the only failures that surface to callers as `Err`; business rule
//! rejections happen later, inside the purchase service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Invalid argument supplied while building a ticket request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketRequestError {
    /// Ticket type is not one of ADULT, CHILD, INFANT
    #[error("Unknown ticket type: {0}")]
    UnknownTicketType(String),

    /// Quantity was below zero
    #[error("Ticket quantity must not be negative, got {0}")]
    NegativeQuantity(i64),

    /// Quantity does not fit the supported range
    #[error("Ticket quantity {0} is out of range")]
    QuantityOutOfRange(u64),

    /// Quantity was not a whole number
    #[error("Ticket quantity must be a whole number, got {0:?}")]
    NonIntegerQuantity(String),
}

/// Kind of ticket being purchased
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketType {
    /// Full price, occupies a seat
    Adult,
    /// Reduced price, occupies a seat, needs an adult
    Child,
    /// Free, sits on an adult's lap, needs an adult
    Infant,
}

impl TicketType {
    /// All ticket types, in price-table order
    pub const ALL: [Self; 3] = [Self::Adult, Self::Child, Self::Infant];

    /// Canonical upper-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Adult => "ADULT",
            Self::Child => "CHILD",
            Self::Infant => "INFANT",
        }
    }

    /// Whether a ticket of this type occupies a physical seat
    #[must_use]
    pub const fn occupies_seat(&self) -> bool {
        !matches!(self, Self::Infant)
    }

    /// Whether this type may only be bought alongside an adult ticket
    #[must_use]
    pub const fn requires_adult(&self) -> bool {
        matches!(self, Self::Child | Self::Infant)
    }
}

impl FromStr for TicketType {
    type Err = TicketRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ticket_type| ticket_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TicketRequestError::UnknownTicketType(s.to_string()))
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape accepted on the wire before validation
#[derive(Deserialize)]
struct RawTicketRequest {
    ticket_type: String,
    quantity: wire::Quantity,
}

/// Immutable request for `quantity` tickets of one type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTicketRequest")]
pub struct TicketRequest {
    ticket_type: TicketType,
    quantity: u32,
}

impl TicketRequest {
    /// Creates a request from already-typed values
    #[must_use]
    pub const fn new(ticket_type: TicketType, quantity: u32) -> Self {
        Self {
            ticket_type,
            quantity,
        }
    }

    /// Creates a request from an untyped ticket type name and a signed quantity
    ///
    /// # Errors
    ///
    /// Returns [`TicketRequestError`] if the type is not recognised or the
    /// quantity is negative or does not fit in a `u32`.
    pub fn try_new(ticket_type: &str, quantity: i64) -> Result<Self, TicketRequestError> {
        let ticket_type = ticket_type.parse()?;
        Ok(Self::new(ticket_type, wire::count(quantity)?))
    }

    /// Creates a request from text, e.g. form input
    ///
    /// # Errors
    ///
    /// Returns [`TicketRequestError::NonIntegerQuantity`] if `quantity` is not a
    /// whole number, otherwise the same errors as [`TicketRequest::try_new`].
    pub fn parse(ticket_type: &str, quantity: &str) -> Result<Self, TicketRequestError> {
        let parsed = quantity
            .trim()
            .parse::<i64>()
            .map_err(|_| TicketRequestError::NonIntegerQuantity(quantity.to_string()))?;
        Self::try_new(ticket_type, parsed)
    }

    /// The type of ticket requested
    #[must_use]
    pub const fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// How many tickets of this type are requested
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl TryFrom<RawTicketRequest> for TicketRequest {
    type Error = TicketRequestError;

    fn try_from(raw: RawTicketRequest) -> Result<Self, Self::Error> {
        let ticket_type = raw.ticket_type.parse()?;
        Ok(Self::new(ticket_type, raw.quantity.into_count()?))
    }
}

impl fmt::Display for TicketRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.ticket_type, self.quantity)
    }
}

/// Quantity as it may appear in serialized input
mod wire {
    use super::TicketRequestError;
    use serde::Deserialize;

    /// Any numeric quantity; only non-negative whole numbers survive `into_count`
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Quantity {
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    impl Quantity {
        #[allow(
            clippy::float_cmp,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        pub(super) fn into_count(self) -> Result<u32, TicketRequestError> {
            match self {
                Self::Signed(value) => count(value),
                Self::Unsigned(value) => {
                    u32::try_from(value).map_err(|_| TicketRequestError::QuantityOutOfRange(value))
                }
                // `as` saturates, so the error payloads stay in range
                Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                    if value < 0.0 {
                        Err(TicketRequestError::NegativeQuantity(value as i64))
                    } else if value > f64::from(u32::MAX) {
                        Err(TicketRequestError::QuantityOutOfRange(value as u64))
                    } else {
                        Ok(value as u32)
                    }
                }
                Self::Float(value) => Err(TicketRequestError::NonIntegerQuantity(value.to_string())),
            }
        }
    }

    /// Narrow a signed quantity to a ticket count
    pub(super) fn count(quantity: i64) -> Result<u32, TicketRequestError> {
        if quantity < 0 {
            return Err(TicketRequestError::NegativeQuantity(quantity));
        }
        u32::try_from(quantity)
            .map_err(|_| TicketRequestError::QuantityOutOfRange(quantity.unsigned_abs()))
    }
}
