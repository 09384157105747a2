use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A synthetic holding: an instrument id plus an accumulated amount.
/// There is no settlement, cost basis or price stored here; value is
/// always computed against the live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument id this position refers to
    pub id: String,

    /// Units held. Starts at 1, grows by 1 on each repeat add.
    pub amount: f64,

    /// When the position was first opened. Never updated.
    #[serde(rename = "addedAt", with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

impl Position {
    pub fn new(id: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            amount: 1.0,
            added_at,
        }
    }
}

/// Watched instrument ids, in the order they were added.
///
/// Serialized as a plain JSON array. Duplicates in decoded input collapse
/// onto their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Watchlist {
    ids: Vec<String>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, id: String) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`, keeping the order of the rest. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|w| w == id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|w| w == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<String>> for Watchlist {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<Watchlist> for Vec<String> {
    fn from(watchlist: Watchlist) -> Self {
        watchlist.ids
    }
}

impl FromIterator<String> for Watchlist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut watchlist = Self::new();
        for id in iter {
            watchlist.insert(id);
        }
        watchlist
    }
}

impl<'a> IntoIterator for &'a Watchlist {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Watchlist membership and portfolio positions.
///
/// Invariants: at most one position per instrument id; positions keep
/// the order in which they were opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub watchlist: Watchlist,
    pub positions: Vec<Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.watchlist.contains(id)
    }

    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn has_position(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.watchlist.is_empty() && self.positions.is_empty()
    }
}

/// Current value of one position, used for the vault allocation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValue {
    pub id: String,
    pub symbol: String,
    pub amount: f64,
    /// price × amount at the time of computation
    pub value: f64,
}
