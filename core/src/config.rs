//! Purchase policy configuration.
//!
//! The price table and purchase cap are process-wide, read-only settings. They
//! are loaded once (from environment variables, with the reference policy as
//! defaults) and handed to the [`TicketService`](crate::service::TicketService).

use crate::ticket::TicketType;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default maximum number of tickets per purchase (inclusive)
pub const DEFAULT_MAX_TICKETS: u32 = 20;

/// Errors raised while loading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },
}

/// Unit price for every ticket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    /// Price of one adult ticket
    pub adult: Money,
    /// Price of one child ticket
    pub child: Money,
    /// Price of one infant ticket
    pub infant: Money,
}

impl PriceTable {
    /// Reference prices: INFANT 0, CHILD 10, ADULT 20
    pub const STANDARD: Self = Self {
        adult: Money::from_units(20),
        child: Money::from_units(10),
        infant: Money::ZERO,
    };

    /// Unit price for a ticket type
    #[must_use]
    pub const fn unit_price(&self, ticket_type: TicketType) -> Money {
        match ticket_type {
            TicketType::Adult => self.adult,
            TicketType::Child => self.child,
            TicketType::Infant => self.infant,
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Business policy applied to every purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePolicy {
    /// Maximum total quantity in one purchase (inclusive)
    pub max_tickets: u32,
    /// Unit prices
    pub prices: PriceTable,
    /// Upper bound on each collaborator call (None = wait indefinitely)
    pub collaborator_timeout: Option<Duration>,
}

impl Default for PurchasePolicy {
    fn default() -> Self {
        Self {
            max_tickets: DEFAULT_MAX_TICKETS,
            prices: PriceTable::STANDARD,
            collaborator_timeout: None,
        }
    }
}

impl PurchasePolicy {
    /// Override the purchase cap
    #[must_use]
    pub const fn with_max_tickets(mut self, max_tickets: u32) -> Self {
        self.max_tickets = max_tickets;
        self
    }

    /// Override the price table
    #[must_use]
    pub const fn with_price_table(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// Bound each collaborator call by `timeout`
    #[must_use]
    pub const fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = Some(timeout);
        self
    }

    /// Load the policy from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `CINEMA_MAX_TICKETS` | 20 |
    /// | `CINEMA_PRICE_ADULT` | 20 |
    /// | `CINEMA_PRICE_CHILD` | 10 |
    /// | `CINEMA_PRICE_INFANT` | 0 |
    /// | `CINEMA_COLLABORATOR_TIMEOUT_MS` | unset |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a value that
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Load the policy using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a value does not parse.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let policy = Self {
            max_tickets: parse_or(&lookup, "CINEMA_MAX_TICKETS", defaults.max_tickets)?,
            prices: PriceTable {
                adult: Money::from_units(parse_or(
                    &lookup,
                    "CINEMA_PRICE_ADULT",
                    defaults.prices.adult.units(),
                )?),
                child: Money::from_units(parse_or(
                    &lookup,
                    "CINEMA_PRICE_CHILD",
                    defaults.prices.child.units(),
                )?),
                infant: Money::from_units(parse_or(
                    &lookup,
                    "CINEMA_PRICE_INFANT",
                    defaults.prices.infant.units(),
                )?),
            },
            collaborator_timeout: parse_opt::<u64, _>(&lookup, "CINEMA_COLLABORATOR_TIMEOUT_MS")?
                .map(Duration::from_millis),
        };

        tracing::debug!(
            max_tickets = policy.max_tickets,
            adult = %policy.prices.adult,
            child = %policy.prices.child,
            infant = %policy.prices.infant,
            "Purchase policy loaded"
        );

        Ok(policy)
    }
}

fn parse_opt<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}
