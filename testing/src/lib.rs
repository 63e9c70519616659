//! # Cinema Tickets Testing
//!
//! Testing utilities and helpers for the cinema ticket purchase service.
//!
//! This crate provides:
//! - Recording doubles for the payment and reservation collaborators
//! - A Given-When-Then builder for purchases
//! - Property-based testing strategies for ticket requests
//!
//! ## Example
//!
//! ```
//! use cinema_tickets_core::{Money, TicketRequest, TicketType};
//! use cinema_tickets_testing::{PurchaseTest, assertions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! PurchaseTest::new()
//!     .when_purchase(
//!         123,
//!         vec![
//!             TicketRequest::new(TicketType::Adult, 2),
//!             TicketRequest::new(TicketType::Child, 1),
//!         ],
//!     )
//!     .then_seats(3)
//!     .then_calls(|calls| assertions::assert_paid_then_reserved(calls, Money::from_units(50), 3))
//!     .run()
//!     .await;
//! # }
//! ```

pub mod mocks;
pub mod purchase_test;

/// Test helpers and utilities
pub mod helpers {
    use cinema_tickets_core::{PurchasePolicy, TicketService};
    use std::sync::Arc;
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    use crate::mocks::{CallLog, RecordingPaymentGateway, RecordingSeatReservation};

    static TRACING: Once = Once::new();

    /// Install a test-friendly tracing subscriber once per process.
    ///
    /// Honours `RUST_LOG`; defaults to `warn`.
    pub fn init_test_tracing() {
        TRACING.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_test_writer()
                .try_init();
        });
    }

    /// A service wired to accepting recording doubles, plus their shared log
    #[must_use]
    pub fn recording_service(policy: PurchasePolicy) -> (TicketService, CallLog) {
        let log = CallLog::new();
        let service = TicketService::new(
            Arc::new(RecordingPaymentGateway::new(&log)),
            Arc::new(RecordingSeatReservation::new(&log)),
            policy,
        );
        (service, log)
    }
}

/// Property-based testing utilities
///
/// proptest strategies that produce purchases with a known validity.
pub mod properties {
    use cinema_tickets_core::{TicketRequest, TicketType};
    use proptest::prelude::*;

    /// Any ticket type
    pub fn ticket_type() -> impl Strategy<Value = TicketType> {
        prop_oneof![
            Just(TicketType::Adult),
            Just(TicketType::Child),
            Just(TicketType::Infant),
        ]
    }

    /// Any single request with quantity up to `max_quantity`
    pub fn ticket_request(max_quantity: u32) -> impl Strategy<Value = TicketRequest> {
        (ticket_type(), 0..=max_quantity).prop_map(|(ticket_type, quantity)| {
            TicketRequest::new(ticket_type, quantity)
        })
    }

    /// Adult, child and infant counts that pass validation under `max_tickets`
    ///
    /// At least one adult; total ≤ `max_tickets`.
    pub fn valid_counts(max_tickets: u32) -> impl Strategy<Value = (u32, u32, u32)> {
        (1..=max_tickets.max(1))
            .prop_flat_map(move |adults| {
                let remaining = max_tickets.saturating_sub(adults);
                (Just(adults), 0..=remaining)
            })
            .prop_flat_map(move |(adults, children)| {
                let remaining = max_tickets.saturating_sub(adults + children);
                (Just(adults), Just(children), 0..=remaining)
            })
    }

    /// A shuffled valid purchase built from [`valid_counts`]
    pub fn valid_purchase(max_tickets: u32) -> impl Strategy<Value = Vec<TicketRequest>> {
        valid_counts(max_tickets)
            .prop_map(|(adults, children, infants)| {
                vec![
                    TicketRequest::new(TicketType::Adult, adults),
                    TicketRequest::new(TicketType::Child, children),
                    TicketRequest::new(TicketType::Infant, infants),
                ]
            })
            .prop_shuffle()
    }

    /// A purchase whose total exceeds `max_tickets` (always includes an adult)
    pub fn oversized_purchase(max_tickets: u32) -> impl Strategy<Value = Vec<TicketRequest>> {
        (1..=max_tickets + 10, 0..=max_tickets, 0..=max_tickets)
            .prop_filter("total must exceed the cap", move |(a, c, i)| {
                a + c + i > max_tickets
            })
            .prop_map(|(adults, children, infants)| {
                vec![
                    TicketRequest::new(TicketType::Adult, adults),
                    TicketRequest::new(TicketType::Child, children),
                    TicketRequest::new(TicketType::Infant, infants),
                ]
            })
    }

    /// Child and/or infant tickets with no adult of positive quantity
    pub fn unaccompanied_purchase(max_tickets: u32) -> impl Strategy<Value = Vec<TicketRequest>> {
        let max_tickets = max_tickets.max(1);
        (0..=max_tickets, 0..=max_tickets, any::<bool>())
            .prop_filter("needs a child or infant within the cap", move |(c, i, _)| {
                c + i > 0 && c + i <= max_tickets
            })
            .prop_map(|(children, infants, zero_adult_line)| {
                let mut requests = vec![
                    TicketRequest::new(TicketType::Child, children),
                    TicketRequest::new(TicketType::Infant, infants),
                ];
                if zero_adult_line {
                    requests.push(TicketRequest::new(TicketType::Adult, 0));
                }
                requests
            })
    }
}

// Re-export commonly used items
pub use mocks::{CallLog, CollaboratorCall, RecordingPaymentGateway, RecordingSeatReservation};
pub use purchase_test::{PurchaseTest, assertions};
