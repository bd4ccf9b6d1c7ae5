//! Ticket persistence.
//!
//! This module handles:
//! - Ticket row types
//! - The JSON file store with serialized read-modify-write access

pub mod file;
pub mod types;

pub use file::TicketStore;
pub use types::{Ticket, TicketDraft, NO_VENDEUR};
