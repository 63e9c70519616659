//! # Cinema Tickets Core
//!
//! Validation, pricing and purchase orchestration for cinema ticket requests.
//!
//! A purchase is an account id plus a list of [`TicketRequest`] line items.
//! The [`TicketService`] checks the account, applies the business rules,
//! prices the tickets, takes payment and reserves seats:
//!
//! ```text
//! caller ─▶ TicketService ─▶ PurchaseValidator ─▶ PriceCalculator ─▶ PaymentGateway
//!                                                 SeatCalculator  ─▶ SeatReservationService
//! ```
//!
//! ## Business Rules
//!
//! - At most `max_tickets` (default 20) tickets per purchase, infants included
//! - Child and infant tickets need at least one adult ticket
//! - Infants are free and sit on an adult's lap (no seat)
//! - Reference prices: ADULT 20, CHILD 10, INFANT 0
//!
//! ## Example
//!
//! ```
//! use cinema_tickets_core::{
//!     MockPaymentGateway, MockSeatReservationService, PurchasePolicy, TicketRequest,
//!     TicketService, TicketType,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = TicketService::new(
//!     MockPaymentGateway::shared(),
//!     MockSeatReservationService::shared(),
//!     PurchasePolicy::default(),
//! );
//!
//! let seats = service
//!     .purchase_tickets(
//!         123,
//!         &[
//!             TicketRequest::new(TicketType::Adult, 2),
//!             TicketRequest::new(TicketType::Child, 1),
//!         ],
//!     )
//!     .await;
//! assert_eq!(seats, 3);
//! # }
//! ```

pub mod calculator;
pub mod config;
pub mod metrics;
pub mod payment_gateway;
pub mod seat_reservation;
pub mod service;
pub mod ticket;
pub mod types;
pub mod validation;

pub use calculator::{PriceCalculator, PricingError, SeatCalculator};
pub use config::{ConfigError, PriceTable, PurchasePolicy, DEFAULT_MAX_TICKETS};
pub use payment_gateway::{GatewayResult, MockPaymentGateway, PaymentGateway, PaymentGatewayError};
pub use seat_reservation::{
    MockSeatReservationService, ReservationError, ReservationResult, SeatReservationService,
};
pub use service::{PurchaseOutcome, RejectionReason, TicketService};
pub use ticket::{TicketRequest, TicketRequestError, TicketType};
pub use types::{AccountId, InvalidAccountId, Money};
pub use validation::{PurchaseValidator, ValidationError};
