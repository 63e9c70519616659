//! Payment collaborator contract.
//!
//! The purchase service never talks to a payment processor directly; it goes
//! through [`PaymentGateway`]. A declined charge and a transport failure are both
//! reported as `Err` and both end the purchase.

use crate::types::{AccountId, Money};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentGatewayError>;

/// Payment gateway error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// The processor refused the charge
    #[error("Payment declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// Gateway did not answer in time
    #[error("Gateway timeout")]
    Timeout,
    /// Gateway could not be reached or failed internally
    #[error("Payment gateway unavailable: {message}")]
    Unavailable {
        /// Error message
        message: String,
    },
}

/// Payment gateway trait
///
/// Abstraction over whatever takes money from an account.
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` to `account_id`
    ///
    /// # Errors
    ///
    /// Returns error if the payment is declined or cannot be made
    fn make_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>>;

    /// Return `amount` to `account_id` after a purchase could not complete
    ///
    /// # Errors
    ///
    /// Returns error if the refund fails
    fn refund_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>>;
}

/// Mock payment gateway (always succeeds for development)
#[derive(Clone, Debug)]
pub struct MockPaymentGateway;

impl MockPaymentGateway {
    /// Creates a new mock payment gateway
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared() -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new())
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for MockPaymentGateway {
    fn make_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>> {
        Box::pin(async move {
            tracing::info!(
                account_id = %account_id,
                amount = amount.units(),
                "Mock payment processed successfully"
            );
            Ok(())
        })
    }

    fn refund_payment(
        &self,
        account_id: AccountId,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<()>> + Send>> {
        Box::pin(async move {
            tracing::info!(
                account_id = %account_id,
                amount = amount.units(),
                "Mock refund processed successfully"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_payment_success() {
        let gateway = MockPaymentGateway::new();
        let account_id = AccountId::new(123).unwrap();

        let result = gateway.make_payment(account_id, Money::from_units(50)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mock_refund_success() {
        let gateway = MockPaymentGateway::shared();
        let account_id = AccountId::new(123).unwrap();

        let result = gateway.refund_payment(account_id, Money::from_units(50)).await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_error_messages() {
        let declined = PaymentGatewayError::Declined {
            reason: "insufficient funds".to_string(),
        };
        assert_eq!(declined.to_string(), "Payment declined: insufficient funds");
        assert_eq!(PaymentGatewayError::Timeout.to_string(), "Gateway timeout");
    }
}
