//! Per-seller revenue aggregation for the admin dashboard.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::Ticket;

/// Dashboard statistics over the whole ticket store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of stored tickets.
    pub total_tickets: u64,
    /// Sum of per-ticket amounts.
    pub total_revenue: Decimal,
    /// Per-seller aggregates, sorted by descending revenue.
    pub vendeurs: Vec<VendeurStats>,
}

/// Ticket count and revenue attributed to one seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendeurStats {
    /// Seller label.
    pub nom: String,
    /// Number of tickets sold.
    pub tickets: u64,
    /// Revenue from those tickets.
    pub montant: Decimal,
}

/// Aggregate totals and per-seller revenue over the stored tickets.
///
/// Sellers sort by descending `montant`; ties break on name so the output is
/// deterministic.
pub fn compute_stats(tickets: &[Ticket]) -> Stats {
    let mut total_revenue = Decimal::ZERO;
    let mut per_vendeur: HashMap<&str, (u64, Decimal)> = HashMap::new();

    for ticket in tickets {
        total_revenue += ticket.amount;
        let entry = per_vendeur
            .entry(ticket.vendeur.as_str())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += ticket.amount;
    }

    let mut vendeurs: Vec<VendeurStats> = per_vendeur
        .into_iter()
        .map(|(nom, (tickets, montant))| VendeurStats {
            nom: nom.to_string(),
            tickets,
            montant,
        })
        .collect();
    vendeurs.sort_by(|a, b| b.montant.cmp(&a.montant).then_with(|| a.nom.cmp(&b.nom)));

    Stats {
        total_tickets: tickets.len() as u64,
        total_revenue,
        vendeurs,
    }
}
