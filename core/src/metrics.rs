//! Purchase metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! installs a recorder (e.g. a Prometheus exporter).
//!
//! # Exported Metrics
//!
//! - `cinema_purchases_total{status, reason}` - Purchases by outcome
//! - `cinema_seats_reserved_total` - Seats reserved by completed purchases
//! - `cinema_revenue_units_total` - Amount charged by completed purchases

use crate::types::Money;
use metrics::describe_counter;

/// Register metric descriptions. Call once at startup.
pub fn register_purchase_metrics() {
    describe_counter!(
        "cinema_purchases_total",
        "Total number of purchase attempts by status (completed, rejected) and rejection reason"
    );
    describe_counter!(
        "cinema_seats_reserved_total",
        "Total number of seats reserved"
    );
    describe_counter!(
        "cinema_revenue_units_total",
        "Total amount charged for completed purchases, in whole currency units"
    );

    tracing::info!("Purchase metrics registered");
}

/// Record a completed purchase.
pub fn record_purchase_completed(seats: u32, amount: Money) {
    metrics::counter!("cinema_purchases_total", "status" => "completed").increment(1);
    metrics::counter!("cinema_seats_reserved_total").increment(u64::from(seats));
    metrics::counter!("cinema_revenue_units_total").increment(amount.units());
    tracing::debug!(seats, amount = amount.units(), "Recorded purchase_completed metric");
}

/// Record a rejected purchase.
///
/// # Arguments
///
/// * `reason` - Short, low-cardinality label (see `RejectionReason::label`)
pub fn record_purchase_rejected(reason: &'static str) {
    metrics::counter!("cinema_purchases_total", "status" => "rejected", "reason" => reason)
        .increment(1);
    tracing::debug!(reason, "Recorded purchase_rejected metric");
}
