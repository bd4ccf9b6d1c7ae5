//! Stripe Checkout API client.

use std::time::Instant;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::CheckoutError;
use crate::metrics;

use super::types::{CheckoutRequest, CheckoutSession};
use super::CheckoutProvider;

/// Stripe Checkout Session client.
#[derive(Debug, Clone)]
pub struct StripeCheckout {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Stripe API base URL.
    api_url: String,
    /// Secret key used as bearer token.
    secret_key: String,
    /// Checkout currency code.
    currency: String,
}

impl StripeCheckout {
    /// Create a Stripe client from config.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(5))
            .tcp_nodelay(true)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            api_url: config.stripe_api_url.clone(),
            secret_key: config.stripe_secret_key.clone().unwrap_or_default(),
            currency: config.currency.clone(),
        }
    }

    /// Form parameters for a Checkout Session: one line item covering the
    /// whole purchase, priced in minor currency units, with the buyer fields
    /// echoed into metadata.
    fn session_params(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<Vec<(String, String)>, CheckoutError> {
        let unit_amount = (request.amount * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .filter(|cents| *cents > 0)
            .ok_or(CheckoutError::InvalidAmount(request.amount))?;

        let plural = if request.tickets > 1 { "s" } else { "" };

        let mut params = vec![
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                self.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                format!("Tombola - {} ticket{plural}", request.tickets),
            ),
            (
                "line_items[0][price_data][product_data][description]".to_string(),
                "Raffle ticket purchase".to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                unit_amount.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("mode".to_string(), "payment".to_string()),
            (
                "success_url".to_string(),
                format!("{origin}/success.html?session_id={{CHECKOUT_SESSION_ID}}"),
            ),
            ("cancel_url".to_string(), format!("{origin}/?canceled=true")),
            ("customer_email".to_string(), request.email.clone()),
            ("metadata[tickets]".to_string(), request.tickets.to_string()),
            (
                "metadata[firstName]".to_string(),
                request.first_name.clone(),
            ),
            ("metadata[lastName]".to_string(), request.last_name.clone()),
            ("metadata[phone]".to_string(), request.phone.clone()),
        ];

        if let Some(vendeur) = &request.vendeur {
            params.push(("metadata[vendeur]".to_string(), vendeur.clone()));
        }

        Ok(params)
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    #[instrument(skip(self, request), fields(tickets = request.tickets, amount = %request.amount))]
    async fn create_session(
        &self,
        request: &CheckoutRequest,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        let params = self.session_params(request, origin)?;
        let url = format!("{}/v1/checkout/sessions", self.api_url);

        let start = Instant::now();
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;
        metrics::record_provider_latency(start);

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::SessionRejected { status, body });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| CheckoutError::ParseError(format!("checkout session body: {e}")))?;

        debug!(session_id = ?session.id, "checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_client() -> StripeCheckout {
        let mut config: Config = serde_json::from_value(serde_json::json!({})).unwrap();
        config.stripe_secret_key = Some("sk_test_abc123".to_string());
        StripeCheckout::new(&config)
    }

    fn request(tickets: u32, amount: Decimal) -> CheckoutRequest {
        CheckoutRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "0600000000".to_string(),
            tickets,
            amount,
            vendeur: None,
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing param {key}"))
    }

    #[test]
    fn amount_converts_to_minor_units() {
        let client = test_client();
        let params = client
            .session_params(&request(3, dec!(15)), "http://localhost:8000")
            .unwrap();
        assert_eq!(param(&params, "line_items[0][price_data][unit_amount]"), "1500");
        assert_eq!(param(&params, "line_items[0][quantity]"), "1");
        assert_eq!(param(&params, "line_items[0][price_data][currency]"), "eur");
    }

    #[test]
    fn product_name_pluralizes() {
        let client = test_client();
        let single = client
            .session_params(&request(1, dec!(5)), "http://localhost:8000")
            .unwrap();
        assert_eq!(
            param(&single, "line_items[0][price_data][product_data][name]"),
            "Tombola - 1 ticket"
        );

        let multi = client
            .session_params(&request(3, dec!(15)), "http://localhost:8000")
            .unwrap();
        assert_eq!(
            param(&multi, "line_items[0][price_data][product_data][name]"),
            "Tombola - 3 tickets"
        );
    }

    #[test]
    fn redirect_urls_derive_from_origin() {
        let client = test_client();
        let params = client
            .session_params(&request(1, dec!(5)), "https://raffle.example")
            .unwrap();
        assert_eq!(
            param(&params, "success_url"),
            "https://raffle.example/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(param(&params, "cancel_url"), "https://raffle.example/?canceled=true");
    }

    #[test]
    fn vendeur_is_echoed_into_metadata_when_present() {
        let client = test_client();
        let mut req = request(1, dec!(5));
        req.vendeur = Some("Sam".to_string());
        let params = client.session_params(&req, "http://localhost:8000").unwrap();
        assert_eq!(param(&params, "metadata[vendeur]"), "Sam");
        assert_eq!(param(&params, "metadata[firstName]"), "Ada");
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let client = test_client();
        let err = client
            .session_params(&request(1, dec!(0)), "http://localhost:8000")
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidAmount(_)));
    }
}
