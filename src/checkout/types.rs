//! Checkout request and session types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buyer and purchase details for a checkout session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Buyer first name.
    pub first_name: String,
    /// Buyer last name.
    pub last_name: String,
    /// Buyer email.
    pub email: String,
    /// Buyer phone number.
    pub phone: String,
    /// Number of tickets purchased.
    pub tickets: u32,
    /// Total purchase amount in major currency units.
    pub amount: Decimal,
    /// Optional seller attribution, echoed into session metadata.
    #[serde(default)]
    pub vendeur: Option<String>,
}

/// Created checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider session id; absent in simulation mode.
    #[serde(default)]
    pub id: Option<String>,
    /// Redirect URL the buyer is sent to.
    pub url: String,
}
