//! Prometheus metrics for the ticket sales flow.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Checkout sessions created against the real provider.
pub const METRIC_CHECKOUT_CREATED: &str = "checkout_sessions_created_total";
/// Checkout sessions answered by the simulation stub.
pub const METRIC_CHECKOUT_SIMULATED: &str = "checkout_sessions_simulated_total";
/// Checkout sessions that failed.
pub const METRIC_CHECKOUT_FAILED: &str = "checkout_sessions_failed_total";
/// Payments saved counter metric name.
pub const METRIC_PAYMENTS_SAVED: &str = "payments_saved_total";
/// Tickets issued counter metric name.
pub const METRIC_TICKETS_ISSUED: &str = "tickets_issued_total";
/// Provider request latency metric name.
pub const METRIC_PROVIDER_LATENCY: &str = "provider_request_latency_ms";
/// Store write latency metric name.
pub const METRIC_STORE_WRITE_LATENCY: &str = "store_write_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_CHECKOUT_CREATED,
        "Total checkout sessions created against the payment provider"
    );
    describe_counter!(
        METRIC_CHECKOUT_SIMULATED,
        "Total checkout sessions answered in simulation mode"
    );
    describe_counter!(
        METRIC_CHECKOUT_FAILED,
        "Total checkout session requests that failed"
    );
    describe_counter!(METRIC_PAYMENTS_SAVED, "Total payments saved to the store");
    describe_counter!(METRIC_TICKETS_ISSUED, "Total ticket rows issued");

    describe_histogram!(
        METRIC_PROVIDER_LATENCY,
        "Payment provider request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STORE_WRITE_LATENCY,
        "Ticket store write latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment the real checkout sessions counter.
pub fn inc_checkout_created() {
    counter!(METRIC_CHECKOUT_CREATED).increment(1);
}

/// Increment the simulated checkout sessions counter.
pub fn inc_checkout_simulated() {
    counter!(METRIC_CHECKOUT_SIMULATED).increment(1);
}

/// Increment the failed checkout sessions counter.
pub fn inc_checkout_failed() {
    counter!(METRIC_CHECKOUT_FAILED).increment(1);
}

/// Increment the saved payments counter.
pub fn inc_payments_saved() {
    counter!(METRIC_PAYMENTS_SAVED).increment(1);
}

/// Add issued tickets to the tickets counter.
pub fn inc_tickets_issued(count: u64) {
    counter!(METRIC_TICKETS_ISSUED).increment(count);
}

/// Record payment provider request latency.
pub fn record_provider_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PROVIDER_LATENCY).record(latency_ms);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a store write.
pub fn timer_store_write() -> LatencyTimer {
    LatencyTimer::new(METRIC_STORE_WRITE_LATENCY)
}
