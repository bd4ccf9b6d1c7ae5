//! Raffle ticket sales server.
//!
//! A small single-process HTTP service that sells raffle tickets: it creates
//! Stripe Checkout sessions for buyers, records completed purchases as
//! append-only rows in a JSON file store, and exposes admin endpoints for
//! listing tickets and computing per-seller revenue. When no provider key is
//! configured the checkout flow degrades to a simulation stub instead of
//! calling out.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`checkout`]: Payment provider integration (Stripe client and simulation stub)
//! - [`store`]: JSON file ticket store
//! - [`stats`]: Per-seller revenue aggregation
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod metrics;
pub mod stats;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServerError};
