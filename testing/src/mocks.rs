//! Recording collaborator doubles.
//!
//! Both doubles write into one shared [`CallLog`] so tests can assert on the
//! order of calls across collaborators (payment always precedes reservation).

use cinema_tickets_core::{
    AccountId, GatewayResult, Money, PaymentGateway, PaymentGatewayError, ReservationError,
    ReservationResult, SeatReservationService,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// One call made to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorCall {
    /// `PaymentGateway::make_payment`
    Payment {
        /// Account charged
        account_id: AccountId,
        /// Amount charged
        amount: Money,
    },
    /// `PaymentGateway::refund_payment`
    Refund {
        /// Account refunded
        account_id: AccountId,
        /// Amount refunded
        amount: Money,
    },
    /// `SeatReservationService::reserve_seats`
    Reservation {
        /// Account reserving
        account_id: AccountId,
        /// Seats requested
        seat_count: u32,
    },
}

/// Ordered, shareable record of collaborator calls
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<CollaboratorCall>>>,
}

impl CallLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: CollaboratorCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Snapshot of every call so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<CollaboratorCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Payment calls only
    #[must_use]
    pub fn payments(&self) -> Vec<(AccountId, Money)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CollaboratorCall::Payment { account_id, amount } => Some((account_id, amount)),
                _ => None,
            })
            .collect()
    }

    /// Refund calls only
    #[must_use]
    pub fn refunds(&self) -> Vec<(AccountId, Money)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CollaboratorCall::Refund { account_id, amount } => Some((account_id, amount)),
                _ => None,
            })
            .collect()
    }

    /// Reservation calls only
    #[must_use]
    pub fn reservations(&self) -> Vec<(AccountId, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CollaboratorCall::Reservation {
                    account_id,
                    seat_count,
                } => Some((account_id, seat_count)),
                _ => None,
            })
            .collect()
    }

    /// Whether no collaborator was called
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Payment gateway that records calls and answers with scripted results
#[derive(Debug, Clone)]
pub struct RecordingPaymentGateway {
    log: CallLog,
    payment_result: GatewayResult<()>,
    refund_result: GatewayResult<()>,
}

impl RecordingPaymentGateway {
    /// Approves every payment and refund
    #[must_use]
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            payment_result: Ok(()),
            refund_result: Ok(()),
        }
    }

    /// Decline every payment with `reason`
    #[must_use]
    pub fn declining(mut self, reason: impl Into<String>) -> Self {
        self.payment_result = Err(PaymentGatewayError::Declined {
            reason: reason.into(),
        });
        self
    }

    /// Answer every payment with `result`
    #[must_use]
    pub fn with_payment_result(mut self, result: GatewayResult<()>) -> Self {
        self.payment_result = result;
        self
    }

    /// Answer every refund with `result`
    #[must_use]
    pub fn with_refund_result(mut self, result: GatewayResult<()>) -> Self {
        self.refund_result = result;
        self
    }
}

impl PaymentGateway for RecordingPaymentGateway {
    fn make_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>> {
        self.log.push(CollaboratorCall::Payment { account_id, amount });
        let result = self.payment_result.clone();
        Box::pin(async move { result })
    }

    fn refund_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>> {
        self.log.push(CollaboratorCall::Refund { account_id, amount });
        let result = self.refund_result.clone();
        Box::pin(async move { result })
    }
}

/// Reservation service that records calls and answers with a scripted result
#[derive(Debug, Clone)]
pub struct RecordingSeatReservation {
    log: CallLog,
    result: ReservationResult<()>,
}

impl RecordingSeatReservation {
    /// Accepts every reservation
    #[must_use]
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            result: Ok(()),
        }
    }

    /// Fail every reservation with `error`
    #[must_use]
    pub fn failing(mut self, error: ReservationError) -> Self {
        self.result = Err(error);
        self
    }
}

impl SeatReservationService for RecordingSeatReservation {
    fn reserve_seats(
        &self,
        account_id: AccountId,
        seat_count: u32,
    ) -> Pin<Box<dyn Future<Output = ReservationResult<()>> + Send>> {
        self.log.push(CollaboratorCall::Reservation {
            account_id,
            seat_count,
        });
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}
