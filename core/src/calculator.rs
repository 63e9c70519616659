//! Price and seat calculations.
//!
//! Both calculators assume the requests already passed
//! [`PurchaseValidator`](crate::validation::PurchaseValidator).

use crate::config::PriceTable;
use crate::ticket::TicketRequest;
use crate::types::Money;
use thiserror::Error;

/// Pricing failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    /// Total does not fit in `Money`
    #[error("Purchase total overflowed")]
    Overflow,
}

/// Computes the amount to charge for a set of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceCalculator {
    prices: PriceTable,
}

impl PriceCalculator {
    /// Creates a calculator over a price table
    #[must_use]
    pub const fn new(prices: PriceTable) -> Self {
        Self { prices }
    }

    /// Σ unit price × quantity
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit.
    pub fn total(&self, requests: &[TicketRequest]) -> Result<Money, PricingError> {
        requests.iter().try_fold(Money::ZERO, |total, request| {
            self.prices
                .unit_price(request.ticket_type())
                .checked_multiply(request.quantity())
                .and_then(|line| total.checked_add(line))
                .ok_or(PricingError::Overflow)
        })
    }
}

/// Counts seats to reserve; infants sit on a lap and take none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeatCalculator;

impl SeatCalculator {
    /// Σ quantity over seat-occupying ticket types
    #[must_use]
    pub fn seats(requests: &[TicketRequest]) -> u32 {
        requests
            .iter()
            .filter(|r| r.ticket_type().occupies_seat())
            .fold(0u32, |seats, r| seats.saturating_add(r.quantity()))
    }
}
