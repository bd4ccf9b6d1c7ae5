//! Unified error types for the ticket server.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the ticket server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Ticket store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Checkout session error.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ticket store read/write errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the store file.
    #[error("failed to read store {path}: {source}")]
    ReadFailed {
        /// Path of the store file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the store file.
    #[error("failed to write store {path}: {source}")]
    WriteFailed {
        /// Path of the store file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the store document.
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Payment provider errors.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Purchase amount does not convert to a positive minor-unit price.
    #[error("invalid checkout amount: {0}")]
    InvalidAmount(Decimal),

    /// The provider rejected the session request.
    #[error("checkout session rejected: HTTP {status} - {body}")]
    SessionRejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider response body.
        body: String,
    },

    /// Failed to parse the provider response.
    #[error("failed to parse provider response: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServerError>;
