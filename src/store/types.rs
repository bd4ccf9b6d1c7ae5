//! Ticket row types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentinel seller label for purchases without attribution.
pub const NO_VENDEUR: &str = "None";

/// Per-ticket price assumed when a stored row carries no amount.
pub(crate) fn default_ticket_amount() -> Decimal {
    Decimal::new(5, 0)
}

fn default_vendeur() -> String {
    NO_VENDEUR.to_string()
}

/// One purchased raffle entry. A multi-ticket purchase produces one row per
/// unit, all sharing the buyer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Sequential ticket number, contiguous across the store.
    pub id: u64,
    /// Buyer first name.
    pub first_name: String,
    /// Buyer last name.
    pub last_name: String,
    /// Buyer email.
    pub email: String,
    /// Buyer phone number.
    pub phone: String,
    /// Seller attribution label.
    #[serde(default = "default_vendeur")]
    pub vendeur: String,
    /// Price of this single ticket.
    #[serde(default = "default_ticket_amount")]
    pub amount: Decimal,
    /// RFC 3339 timestamp assigned at save time.
    pub date: String,
}

/// Buyer data for a purchase before ticket numbers are assigned.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    /// Buyer first name.
    pub first_name: String,
    /// Buyer last name.
    pub last_name: String,
    /// Buyer email.
    pub email: String,
    /// Buyer phone number.
    pub phone: String,
    /// Seller attribution label.
    pub vendeur: String,
    /// Price of a single ticket.
    pub amount: Decimal,
}

impl TicketDraft {
    /// Materialize one ticket row with an assigned number and timestamp.
    pub fn ticket(&self, id: u64, date: String) -> Ticket {
        Ticket {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            vendeur: self.vendeur.clone(),
            amount: self.amount,
            date,
        }
    }
}
