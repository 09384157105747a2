use serde::{Deserialize, Serialize};

/// Market an instrument trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentCategory {
    /// Cryptocurrencies (BTC, ETH, etc.)
    Crypto,
    /// Currency pairs and metals quoted against USD (EUR/USD, XAU/USD, etc.)
    Forex,
}

impl InstrumentCategory {
    /// Decimal places used when rendering a price in this category.
    pub fn price_precision(&self) -> usize {
        match self {
            InstrumentCategory::Crypto => 2,
            InstrumentCategory::Forex => 4,
        }
    }
}

impl std::fmt::Display for InstrumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentCategory::Crypto => write!(f, "crypto"),
            InstrumentCategory::Forex => write!(f, "forex"),
        }
    }
}

/// One point of an instrument's rolling price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    /// Wall-clock label, e.g. "14:05:32" (seed samples use "0:00".."19:00").
    pub time: String,
    pub price: f64,
}

/// A tradable asset tracked by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable id (e.g., "bitcoin", "eurusd")
    pub id: String,

    /// Ticker symbol (e.g., "BTC", "EUR/USD")
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Current simulated price in USD
    pub price: f64,

    /// Running 24h change in percentage points. Accumulates every tick
    /// and is never re-based to a true 24-hour window.
    pub change_24h: f64,

    /// Free-form market-cap label, "N/A" when it doesn't apply
    pub market_cap: String,

    pub category: InstrumentCategory,

    /// Fixed-length history, oldest first.
    pub history: Vec<HistorySample>,
}

impl Instrument {
    /// Price formatted with the category's precision (2 for crypto, 4 for forex).
    pub fn display_price(&self) -> String {
        format!("{:.*}", self.category.price_precision(), self.price)
    }

    /// Signed 24h change, e.g. "+2.45%" or "-1.20%".
    pub fn display_change(&self) -> String {
        let sign = if self.change_24h >= 0.0 { "+" } else { "" };
        format!("{sign}{:.2}%", self.change_24h)
    }

    pub fn is_gaining(&self) -> bool {
        self.change_24h >= 0.0
    }

    /// Case-insensitive substring match against name or symbol.
    /// An empty needle matches everything.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.symbol.to_lowercase().contains(needle_lower)
    }
}

/// The full instrument list in its canonical (seed) order.
///
/// Append-only: instruments are created once at startup and mutated in
/// place, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

impl Catalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Current price of an instrument, `None` if the id is unknown.
    pub fn price_of(&self, id: &str) -> Option<f64> {
        self.get(id).map(|i| i.price)
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Instrument> {
        self.instruments.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}
