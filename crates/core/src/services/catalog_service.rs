use rand::Rng;

use crate::models::instrument::{Catalog, HistorySample, Instrument, InstrumentCategory};

/// Static seed row: (id, symbol, name, price, 24h change, market cap, category).
type SeedRow = (&'static str, &'static str, &'static str, f64, f64, &'static str, InstrumentCategory);

const SEED: &[SeedRow] = &[
    ("bitcoin", "BTC", "Bitcoin", 64231.50, 2.45, "1.2T", InstrumentCategory::Crypto),
    ("ethereum", "ETH", "Ethereum", 3452.12, -1.2, "412B", InstrumentCategory::Crypto),
    ("solana", "SOL", "Solana", 142.85, 5.8, "62B", InstrumentCategory::Crypto),
    ("shiba-inu", "SHIB", "Shiba Inu", 0.00002415, 12.4, "14.2B", InstrumentCategory::Crypto),
    ("dogecoin", "DOGE", "Dogecoin", 0.1624, -4.2, "23.1B", InstrumentCategory::Crypto),
    ("xrp", "XRP", "XRP Ripple", 0.5241, 0.8, "29B", InstrumentCategory::Crypto),
    ("cardano", "ADA", "Cardano", 0.4512, -2.1, "16B", InstrumentCategory::Crypto),
    ("avalanche", "AVAX", "Avalanche", 35.62, 3.4, "13.5B", InstrumentCategory::Crypto),
    ("polkadot", "DOT", "Polkadot", 7.12, -0.5, "10.2B", InstrumentCategory::Crypto),
    ("chainlink", "LINK", "Chainlink", 18.45, 6.2, "10.8B", InstrumentCategory::Crypto),
    ("polygon", "MATIC", "Polygon", 0.7245, -1.8, "7.1B", InstrumentCategory::Crypto),
    ("near-protocol", "NEAR", "NEAR Protocol", 6.84, 9.1, "7.3B", InstrumentCategory::Crypto),
    ("eurusd", "EUR/USD", "Euro / US Dollar", 1.0842, 0.05, "N/A", InstrumentCategory::Forex),
    ("gbpusd", "GBP/USD", "British Pound / US Dollar", 1.2654, -0.12, "N/A", InstrumentCategory::Forex),
    ("usdjpy", "USD/JPY", "US Dollar / Yen", 156.42, 0.24, "N/A", InstrumentCategory::Forex),
    ("gold", "XAU/USD", "Gold / US Dollar", 2321.40, 0.85, "14T", InstrumentCategory::Forex),
    ("silver", "XAG/USD", "Silver / US Dollar", 28.42, 1.15, "1.4T", InstrumentCategory::Forex),
];

/// Half-width of the band seed history is scattered in around the base price.
const SEED_HISTORY_SPREAD: f64 = 0.05;

/// Builds the startup catalog from static seed data.
pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        Self
    }

    /// Seed catalog with `history_len` synthetic samples per instrument.
    pub fn seed_catalog<R: Rng>(&self, rng: &mut R, history_len: usize) -> Catalog {
        let instruments = SEED
            .iter()
            .map(|&(id, symbol, name, price, change_24h, market_cap, category)| Instrument {
                id: id.to_string(),
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
                change_24h,
                market_cap: market_cap.to_string(),
                category,
                history: self.mock_history(rng, price, history_len),
            })
            .collect();
        Catalog::new(instruments)
    }

    /// `len` samples labelled "0:00", "1:00", ... scattered ±5% around `base`.
    pub fn mock_history<R: Rng>(
        &self,
        rng: &mut R,
        base: f64,
        len: usize,
    ) -> Vec<HistorySample> {
        (0..len)
            .map(|i| HistorySample {
                time: format!("{i}:00"),
                price: base * (1.0 + (rng.gen::<f64>() * 2.0 * SEED_HISTORY_SPREAD - SEED_HISTORY_SPREAD)),
            })
            .collect()
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}
