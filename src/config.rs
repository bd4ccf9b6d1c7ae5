//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Sample key shipped in `.env.example`; treated as unconfigured.
pub const KEY_PLACEHOLDER: &str = "sk_test_YOUR_SECRET_KEY_HERE";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Payment Provider ===
    /// Stripe secret key (starts with sk_). Absent means simulation mode.
    #[serde(default)]
    pub stripe_secret_key: Option<String>,

    /// Stripe API base URL.
    #[serde(default = "default_stripe_api_url")]
    pub stripe_api_url: String,

    /// Checkout currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    // === Storage ===
    /// Path of the JSON ticket store.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    // === Static Site ===
    /// Directory served for non-API GET requests.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Origin used for redirect URLs when the request has no Origin header.
    #[serde(default = "default_origin")]
    pub default_origin: String,

    // === Ticket Pricing ===
    /// Per-ticket price used when a payment carries no amount.
    #[serde(default = "default_ticket_price")]
    pub ticket_price: Decimal,

    // === Admin ===
    /// Password gating the admin import endpoint. Unset disables imports.
    #[serde(default)]
    pub admin_password: Option<String>,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    // === Metrics ===
    /// Enable the Prometheus exporter.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Prometheus exporter port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_stripe_api_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_database_path() -> String {
    "payments_database.json".to_string()
}

fn default_static_dir() -> String {
    ".".to_string()
}

fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_ticket_price() -> Decimal {
    Decimal::new(5, 0) // 5 EUR
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Whether checkout runs in simulation mode instead of calling Stripe.
    ///
    /// A missing, empty, or placeholder key degrades to simulation rather
    /// than failing startup.
    pub fn is_simulation(&self) -> bool {
        match self.stripe_secret_key.as_deref() {
            None | Some("") => true,
            Some(KEY_PLACEHOLDER) => true,
            Some(_) => false,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(key) = self.stripe_secret_key.as_deref() {
            if !key.is_empty() && key != KEY_PLACEHOLDER && !key.starts_with("sk_") {
                return Err("STRIPE_SECRET_KEY must start with sk_".to_string());
            }
        }

        if self.ticket_price <= Decimal::ZERO {
            return Err("TICKET_PRICE must be positive".to_string());
        }

        if self.currency.len() != 3 {
            return Err("CURRENCY must be a 3-letter code".to_string());
        }

        Ok(())
    }
}
