//! Ergonomic testing utilities for purchases
//!
//! This module provides a fluent API for testing the ticket service with
//! readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // PurchaseTest is the natural name

use crate::mocks::{CallLog, CollaboratorCall, RecordingPaymentGateway, RecordingSeatReservation};
use cinema_tickets_core::{
    GatewayResult, PurchaseOutcome, PurchasePolicy, ReservationError, TicketRequest,
    TicketService,
};
use std::sync::Arc;

/// Type alias for outcome assertion functions
type OutcomeAssertion = Box<dyn FnOnce(&PurchaseOutcome)>;

/// Type alias for collaborator-call assertion functions
type CallAssertion = Box<dyn FnOnce(&[CollaboratorCall])>;

/// Fluent API for testing purchases with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use cinema_tickets_testing::{PurchaseTest, assertions};
/// use cinema_tickets_core::{TicketRequest, TicketType};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// PurchaseTest::new()
///     .given_payment_declined("card expired")
///     .when_purchase(123, vec![TicketRequest::new(TicketType::Adult, 2)])
///     .then_seats(0)
///     .then_calls(assertions::assert_not_reserved)
///     .run()
///     .await;
/// # }
/// ```
pub struct PurchaseTest {
    policy: PurchasePolicy,
    payment_result: GatewayResult<()>,
    refund_result: GatewayResult<()>,
    reservation_error: Option<ReservationError>,
    purchase: Option<(i64, Vec<TicketRequest>)>,
    outcome_assertions: Vec<OutcomeAssertion>,
    call_assertions: Vec<CallAssertion>,
}

impl PurchaseTest {
    /// Create a new purchase test using the reference policy and collaborators
    /// that accept everything
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: PurchasePolicy::default(),
            payment_result: Ok(()),
            refund_result: Ok(()),
            reservation_error: None,
            purchase: None,
            outcome_assertions: Vec::new(),
            call_assertions: Vec::new(),
        }
    }

    /// Set the policy for the test
    #[must_use]
    pub fn with_policy(mut self, policy: PurchasePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Payment collaborator answers with `result` (Given)
    #[must_use]
    pub fn given_payment(mut self, result: GatewayResult<()>) -> Self {
        self.payment_result = result;
        self
    }

    /// Payment collaborator declines (Given)
    #[must_use]
    pub fn given_payment_declined(self, reason: impl Into<String>) -> Self {
        self.given_payment(Err(cinema_tickets_core::PaymentGatewayError::Declined {
            reason: reason.into(),
        }))
    }

    /// Refunds answer with `result` (Given)
    #[must_use]
    pub fn given_refund(mut self, result: GatewayResult<()>) -> Self {
        self.refund_result = result;
        self
    }

    /// Reservation collaborator fails with `error` (Given)
    #[must_use]
    pub fn given_reservation_failure(mut self, error: ReservationError) -> Self {
        self.reservation_error = Some(error);
        self
    }

    /// Set the purchase to attempt (When)
    #[must_use]
    pub fn when_purchase(mut self, account_id: i64, requests: Vec<TicketRequest>) -> Self {
        self.purchase = Some((account_id, requests));
        self
    }

    /// Add an assertion about the outcome (Then)
    #[must_use]
    pub fn then_outcome<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&PurchaseOutcome) + 'static,
    {
        self.outcome_assertions.push(Box::new(assertion));
        self
    }

    /// Assert the number of seats reserved (Then)
    #[must_use]
    pub fn then_seats(self, expected: u32) -> Self {
        self.then_outcome(move |outcome| {
            assert_eq!(
                outcome.seats_reserved(),
                expected,
                "Unexpected seat count, outcome was {outcome:?}"
            );
        })
    }

    /// Add an assertion about the collaborator calls made (Then)
    #[must_use]
    pub fn then_calls<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[CollaboratorCall]) + 'static,
    {
        self.call_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if no purchase is set, or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run(self) {
        let (account_id, requests) = self
            .purchase
            .expect("Purchase must be set with when_purchase()");

        let log = CallLog::new();
        let payments = RecordingPaymentGateway::new(&log)
            .with_payment_result(self.payment_result)
            .with_refund_result(self.refund_result);
        let mut reservations = RecordingSeatReservation::new(&log);
        if let Some(error) = self.reservation_error {
            reservations = reservations.failing(error);
        }

        let service = TicketService::new(Arc::new(payments), Arc::new(reservations), self.policy);
        let outcome = service.purchase(account_id, &requests).await;

        for assertion in self.outcome_assertions {
            assertion(&outcome);
        }

        let calls = log.calls();
        for assertion in self.call_assertions {
            assertion(&calls);
        }
    }
}

impl Default for PurchaseTest {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper assertions for collaborator calls
pub mod assertions {
    use crate::mocks::CollaboratorCall;
    use cinema_tickets_core::Money;

    /// Assert that no collaborator was called
    ///
    /// # Panics
    ///
    /// Panics if any call was made.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_calls(calls: &[CollaboratorCall]) {
        assert!(
            calls.is_empty(),
            "Expected no collaborator calls, but found {}: {:?}",
            calls.len(),
            calls
        );
    }

    /// Assert that reservation was never attempted
    ///
    /// # Panics
    ///
    /// Panics if a reservation call is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_not_reserved(calls: &[CollaboratorCall]) {
        assert!(
            !calls
                .iter()
                .any(|c| matches!(c, CollaboratorCall::Reservation { .. })),
            "Expected no reservation, but found {calls:?}"
        );
    }

    /// Assert exactly one payment of `amount` followed by one reservation of
    /// `seats`, and nothing else
    ///
    /// # Panics
    ///
    /// Panics if the calls differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_paid_then_reserved(calls: &[CollaboratorCall], amount: Money, seats: u32) {
        match calls {
            [
                CollaboratorCall::Payment {
                    amount: paid,
                    account_id: paid_by,
                },
                CollaboratorCall::Reservation {
                    seat_count,
                    account_id: reserved_by,
                },
            ] => {
                assert_eq!(*paid, amount, "Unexpected payment amount");
                assert_eq!(*seat_count, seats, "Unexpected seat count");
                assert_eq!(paid_by, reserved_by, "Payment and reservation accounts differ");
            }
            other => panic!("Expected payment then reservation, but found {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_tickets_core::{Money, RejectionReason, TicketType, ValidationError};

    #[tokio::test]
    async fn test_purchase_test_happy_path() {
        PurchaseTest::new()
            .when_purchase(
                7,
                vec![
                    TicketRequest::new(TicketType::Adult, 1),
                    TicketRequest::new(TicketType::Child, 1),
                ],
            )
            .then_seats(2)
            .then_calls(|calls| {
                assertions::assert_paid_then_reserved(calls, Money::from_units(30), 2);
            })
            .run()
            .await;
    }

    #[tokio::test]
    async fn test_purchase_test_rejection() {
        PurchaseTest::new()
            .when_purchase(7, vec![])
            .then_outcome(|outcome| {
                assert_eq!(
                    outcome.rejection(),
                    Some(&RejectionReason::InvalidRequest(ValidationError::Empty))
                );
            })
            .then_calls(assertions::assert_no_calls)
            .run()
            .await;
    }

    #[test]
    fn test_assertions_no_calls() {
        assertions::assert_no_calls(&[]);
        assertions::assert_not_reserved(&[]);
    }
}
