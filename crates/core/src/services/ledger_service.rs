use chrono::{DateTime, Utc};

use crate::models::instrument::Catalog;
use crate::models::ledger::{HoldingValue, Ledger, Position};

/// Watchlist and portfolio mutation rules plus valuation.
///
/// Pure business logic, no I/O. All operations are total.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Remove `id` from the watchlist if present, otherwise add it.
    /// Returns `true` if the id is watched afterwards.
    pub fn toggle_watch(&self, ledger: &mut Ledger, id: &str) -> bool {
        if ledger.watchlist.remove(id) {
            false
        } else {
            ledger.watchlist.insert(id.to_string());
            true
        }
    }

    /// Open a position with amount 1, or add 1 to the existing one.
    /// `now` is only used when a new position is opened.
    /// Returns the amount held afterwards.
    pub fn add_position(&self, ledger: &mut Ledger, id: &str, now: DateTime<Utc>) -> f64 {
        match ledger.positions.iter_mut().find(|p| p.id == id) {
            Some(position) => {
                position.amount += 1.0;
                position.amount
            }
            None => {
                let position = Position::new(id, now);
                let amount = position.amount;
                ledger.positions.push(position);
                amount
            }
        }
    }

    /// Sum of price × amount over all positions.
    /// Positions whose id is missing from the catalog contribute 0.
    pub fn portfolio_value(&self, ledger: &Ledger, catalog: &Catalog) -> f64 {
        ledger
            .positions
            .iter()
            .map(|p| catalog.price_of(&p.id).map_or(0.0, |price| price * p.amount))
            .sum()
    }

    /// Current value of the first `limit` positions (in the order they were
    /// opened). Positions with no catalog match are skipped.
    pub fn allocation(&self, ledger: &Ledger, catalog: &Catalog, limit: usize) -> Vec<HoldingValue> {
        ledger
            .positions
            .iter()
            .take(limit)
            .filter_map(|p| {
                let instrument = catalog.get(&p.id)?;
                Some(HoldingValue {
                    id: p.id.clone(),
                    symbol: instrument.symbol.clone(),
                    amount: p.amount,
                    value: instrument.price * p.amount,
                })
            })
            .collect()
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
