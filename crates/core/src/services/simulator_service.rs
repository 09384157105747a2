use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::config::SimulationConfig;
use crate::models::instrument::{Catalog, HistorySample};

/// Random-walk price simulator.
///
/// Each tick, every instrument independently gets a uniform delta in
/// `[-volatility/2, +volatility/2)`; price scales by `1 + delta`, the 24h
/// change accumulates `delta * 100`, and one history sample is appended
/// while the oldest is dropped.
pub struct PriceSimulator {
    rng: StdRng,
    volatility: f64,
    history_len: usize,
    ticks: u64,
}

impl std::fmt::Debug for PriceSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceSimulator")
            .field("volatility", &self.volatility)
            .field("history_len", &self.history_len)
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl PriceSimulator {
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            volatility: config.volatility,
            history_len: config.history_len,
            ticks: 0,
        }
    }

    /// Access to the simulator's RNG, used to seed the catalog history
    /// from the same stream so seeded sessions are fully reproducible.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    /// Number of ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Draw one delta: `(U[0,1) - 0.5) * volatility`.
    pub fn draw_delta(&mut self) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * self.volatility
    }

    /// Apply one tick to every instrument in the catalog.
    /// `time_label` becomes the label of the new history sample.
    pub fn tick(&mut self, catalog: &mut Catalog, time_label: &str) {
        for instrument in catalog.iter_mut() {
            let delta = self.draw_delta();
            let price = instrument.price * (1.0 + delta);

            instrument.price = price;
            // Not re-based to a real 24h window; it just keeps accumulating.
            instrument.change_24h += delta * 100.0;

            instrument.history.push(HistorySample {
                time: time_label.to_string(),
                price,
            });
            if instrument.history.len() > self.history_len {
                let excess = instrument.history.len() - self.history_len;
                instrument.history.drain(..excess);
            }
        }
        self.ticks += 1;
        tracing::debug!(tick = self.ticks, instruments = catalog.len(), "price tick applied");
    }
}

/// Fixed-period tick source for the simulator.
///
/// The first tick fires one full period after creation. Late ticks are
/// delayed, never burst to catch up.
pub struct SimulationClock {
    interval: Interval,
}

impl SimulationClock {
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.tick_interval())
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}
