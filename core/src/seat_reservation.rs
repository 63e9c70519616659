//! Seat reservation collaborator contract.

use crate::types::AccountId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Reservation result
pub type ReservationResult<T> = Result<T, ReservationError>;

/// Reservation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Reservation backend did not answer in time
    #[error("Reservation timeout")]
    Timeout,
    /// Reservation backend could not be reached or failed internally
    #[error("Reservation service unavailable: {message}")]
    Unavailable {
        /// Error message
        message: String,
    },
}

/// Reserves physical seats for an account
///
/// Only called after payment succeeded.
pub trait SeatReservationService: Send + Sync {
    /// Reserve `seat_count` seats for `account_id`
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails
    fn reserve_seats(
        &self,
        account_id: AccountId,
        seat_count: u32,
    ) -> Pin<Box<dyn Future<Output = ReservationResult<()>> + Send>>;
}

/// Mock reservation backend (always succeeds for development)
#[derive(Clone, Debug, Default)]
pub struct MockSeatReservationService;

impl MockSeatReservationService {
    /// Creates a new mock reservation service
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn SeatReservationService> {
        Arc::new(Self::new())
    }
}

impl SeatReservationService for MockSeatReservationService {
    fn reserve_seats(
        &self,
        account_id: AccountId,
        seat_count: u32,
    ) -> Pin<Box<dyn Future<Output = ReservationResult<()>> + Send>> {
        Box::pin(async move {
            tracing::info!(
                account_id = %account_id,
                seat_count,
                "Mock seats reserved"
            );
            Ok(())
        })
    }
}
