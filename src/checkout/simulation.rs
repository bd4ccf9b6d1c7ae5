//! Simulation stub used when no payment provider is configured.
//!
//! Returns a fixed redirect URL without any external call, so the purchase
//! flow stays testable end to end on an unconfigured machine.

use async_trait::async_trait;
use tracing::info;

use crate::error::CheckoutError;

use super::types::{CheckoutRequest, CheckoutSession};
use super::{CheckoutProvider, SIMULATION_URL};

/// Checkout stub that never contacts a provider.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCheckout;

impl SimulatedCheckout {
    /// Create the simulation stub.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CheckoutProvider for SimulatedCheckout {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        _origin: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        info!(
            tickets = request.tickets,
            amount = %request.amount,
            "simulation mode: skipping provider call"
        );
        Ok(CheckoutSession {
            id: None,
            url: SIMULATION_URL.to_string(),
        })
    }

    fn is_simulation(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn returns_simulation_url_without_io() {
        let provider = SimulatedCheckout::new();
        let request = CheckoutRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0600000000".to_string(),
            tickets: 2,
            amount: dec!(10),
            vendeur: None,
        };

        let session = provider
            .create_session(&request, "http://localhost:8000")
            .await
            .unwrap();
        assert_eq!(session.url, "/success.html?simulation=true");
        assert_eq!(session.id, None);
        assert!(provider.is_simulation());
    }
}
