//! Payment provider integration.
//!
//! This module handles:
//! - Checkout request/session types
//! - The Stripe Checkout client
//! - The simulation stub used when no provider key is configured

pub mod simulation;
pub mod stripe;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::error::CheckoutError;

pub use simulation::SimulatedCheckout;
pub use stripe::StripeCheckout;
pub use types::{CheckoutRequest, CheckoutSession};

/// Redirect URL returned by the simulation stub.
pub const SIMULATION_URL: &str = "/success.html?simulation=true";

/// Capability to create a payment-checkout session for a purchase.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session and return its redirect URL. `origin` is the
    /// site origin used to build the success and cancel URLs.
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError>;

    /// Whether this provider is the simulation stub.
    fn is_simulation(&self) -> bool {
        false
    }
}

/// Select the provider implementation from configuration.
pub fn provider_from_config(config: &Config) -> Arc<dyn CheckoutProvider> {
    if config.is_simulation() {
        warn!("payment provider not configured, checkout runs in simulation mode");
        Arc::new(SimulatedCheckout::new())
    } else {
        Arc::new(StripeCheckout::new(config))
    }
}
