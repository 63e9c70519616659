//! Ticket purchase service.
//!
//! Runs one purchase through a fixed sequence:
//!
//! 1. Account check
//! 2. Validation
//! 3. Pricing
//! 4. Payment
//! 5. Seat reservation
//!
//! Every step after the account check only runs if the previous one
//! succeeded, so reservation is never attempted without a successful payment.
//! Failures never escape as errors: the caller gets a [`PurchaseOutcome`],
//! and `purchase_tickets` collapses that to a seat count (0 = rejected).
//! A collaborator that panics is treated as unavailable.

use crate::calculator::{PriceCalculator, PricingError, SeatCalculator};
use crate::config::PurchasePolicy;
use crate::metrics;
use crate::payment_gateway::{PaymentGateway, PaymentGatewayError};
use crate::seat_reservation::{ReservationError, SeatReservationService};
use crate::ticket::TicketRequest;
use crate::types::{AccountId, InvalidAccountId, Money};
use crate::validation::{PurchaseValidator, ValidationError};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a purchase did not complete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Account id was zero or negative
    #[error(transparent)]
    InvalidAccount(#[from] InvalidAccountId),

    /// Requests broke a business rule
    #[error("Invalid purchase request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// Total could not be computed
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Payment collaborator failed or declined
    #[error("Payment failed: {0}")]
    PaymentFailed(#[from] PaymentGatewayError),

    /// Seats could not be reserved after payment was taken
    #[error("Seat reservation failed (refunded: {refunded}): {error}")]
    ReservationFailed {
        /// Collaborator error
        error: ReservationError,
        /// Whether the compensating refund succeeded
        refunded: bool,
    },
}

impl RejectionReason {
    /// Low-cardinality label for logs and metrics
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InvalidAccount(_) => "invalid_account",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Pricing(_) => "pricing",
            Self::PaymentFailed(_) => "payment_failed",
            Self::ReservationFailed { .. } => "reservation_failed",
        }
    }
}

/// Result of a purchase attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Payment taken and seats reserved
    Completed {
        /// Seats reserved
        seats_reserved: u32,
        /// Amount charged
        amount_charged: Money,
    },
    /// Purchase stopped before completion
    Rejected(RejectionReason),
}

impl PurchaseOutcome {
    /// Seats reserved; 0 for any rejection
    #[must_use]
    pub const fn seats_reserved(&self) -> u32 {
        match self {
            Self::Completed { seats_reserved, .. } => *seats_reserved,
            Self::Rejected(_) => 0,
        }
    }

    /// Whether the purchase completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The rejection reason, if rejected
    #[must_use]
    pub const fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            Self::Completed { .. } => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Validates, prices and completes ticket purchases
///
/// Holds no mutable state; clones share the same collaborators and may be used
/// from many tasks at once.
#[derive(Clone)]
pub struct TicketService {
    payments: Arc<dyn PaymentGateway>,
    reservations: Arc<dyn SeatReservationService>,
    policy: PurchasePolicy,
    validator: PurchaseValidator,
    prices: PriceCalculator,
}

impl TicketService {
    /// Create a new ticket service
    #[must_use]
    pub fn new(
        payments: Arc<dyn PaymentGateway>,
        reservations: Arc<dyn SeatReservationService>,
        policy: PurchasePolicy,
    ) -> Self {
        Self {
            payments,
            reservations,
            validator: PurchaseValidator::new(policy.max_tickets),
            prices: PriceCalculator::new(policy.prices),
            policy,
        }
    }

    /// The policy this service enforces
    #[must_use]
    pub const fn policy(&self) -> &PurchasePolicy {
        &self.policy
    }

    /// Purchase tickets and return the number of seats reserved.
    ///
    /// Returns 0 if the purchase was rejected for any reason.
    pub async fn purchase_tickets(&self, account_id: i64, requests: &[TicketRequest]) -> u32 {
        self.purchase(account_id, requests).await.seats_reserved()
    }

    /// Purchase tickets and return the full outcome.
    #[tracing::instrument(skip(self, requests), fields(lines = requests.len()), name = "purchase_tickets")]
    pub async fn purchase(&self, account_id: i64, requests: &[TicketRequest]) -> PurchaseOutcome {
        match self.execute(account_id, requests).await {
            Ok((seats_reserved, amount_charged)) => {
                tracing::info!(
                    account_id,
                    seats = seats_reserved,
                    amount = amount_charged.units(),
                    "Purchase completed"
                );
                metrics::record_purchase_completed(seats_reserved, amount_charged);
                PurchaseOutcome::Completed {
                    seats_reserved,
                    amount_charged,
                }
            }
            Err(reason) => {
                tracing::warn!(account_id, reason = %reason, "Purchase rejected");
                metrics::record_purchase_rejected(reason.label());
                PurchaseOutcome::Rejected(reason)
            }
        }
    }

    async fn execute(
        &self,
        account_id: i64,
        requests: &[TicketRequest],
    ) -> Result<(u32, Money), RejectionReason> {
        let account = AccountId::new(account_id)?;
        self.validator.validate(requests)?;
        let amount = self.prices.total(requests)?;

        tracing::debug!(%account, amount = amount.units(), "Requesting payment");
        bounded(
            self.policy.collaborator_timeout,
            || self.payments.make_payment(account, amount),
            PaymentGatewayError::Timeout,
            |message| PaymentGatewayError::Unavailable { message },
        )
        .await
        .inspect_err(|error| tracing::error!(%account, %error, "Payment collaborator failed"))?;

        let seats = SeatCalculator::seats(requests);
        tracing::debug!(%account, seats, "Reserving seats");
        if let Err(error) = bounded(
            self.policy.collaborator_timeout,
            || self.reservations.reserve_seats(account, seats),
            ReservationError::Timeout,
            |message| ReservationError::Unavailable { message },
        )
        .await
        {
            tracing::error!(%account, %error, "Reservation collaborator failed");
            let refunded = self.refund(account, amount).await;
            return Err(RejectionReason::ReservationFailed { error, refunded });
        }

        Ok((seats, amount))
    }

    /// Compensate a taken payment; returns whether the refund went through
    async fn refund(&self, account: AccountId, amount: Money) -> bool {
        match bounded(
            self.policy.collaborator_timeout,
            || self.payments.refund_payment(account, amount),
            PaymentGatewayError::Timeout,
            |message| PaymentGatewayError::Unavailable { message },
        )
        .await
        {
            Ok(()) => {
                tracing::info!(%account, amount = amount.units(), "Payment refunded");
                true
            }
            Err(error) => {
                tracing::error!(%account, amount = amount.units(), %error, "Refund failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Run one collaborator call.
///
/// A panic while building or polling the call becomes `on_panic`, and an
/// elapsed `limit` becomes `on_timeout`.
async fn bounded<T, E, C, F>(
    limit: Option<Duration>,
    call: C,
    on_timeout: E,
    on_panic: impl FnOnce(String) -> E,
) -> Result<T, E>
where
    C: FnOnce() -> F,
    F: Future<Output = Result<T, E>>,
{
    let guarded = AssertUnwindSafe(async move { call().await }).catch_unwind();
    let caught = match limit {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(caught) => caught,
            Err(_) => return Err(on_timeout),
        },
        None => guarded.await,
    };

    caught.unwrap_or_else(|payload| Err(on_panic(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    format!("collaborator panicked: {detail}")
}
