pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use config::SessionConfig;
use errors::CoreError;
use models::{
    analysis::AnalysisState,
    instrument::{Catalog, Instrument},
    ledger::{HoldingValue, Ledger, Position},
    settings::{Language, Preferences, Theme},
    snapshot::PersistedSnapshot,
    view::{ViewFilter, ViewMode},
};
use providers::{gemini::GeminiProvider, traits::AnalysisProvider};
use services::{
    analysis_service::{AnalysisController, AnalysisOutcome, AnalysisTicket},
    catalog_service::CatalogService,
    ledger_service::LedgerService,
    simulator_service::{PriceSimulator, SimulationClock},
    view_service::ViewService,
};
use storage::{blob::BlobStore, manager::StorageManager};

/// Number of positions shown in the vault allocation panel.
pub const DEFAULT_ALLOCATION_LIMIT: usize = 3;

/// Main entry point for the Neon Exchange core library.
///
/// One session owns all mutable dashboard state: the catalog, the
/// watchlist/portfolio ledger, preferences, the view filter, the selected
/// instrument and the analysis panel. Mutations are applied one at a time
/// through `&mut self`; the snapshot is written back after every change
/// to the ledger or preferences.
#[must_use]
pub struct MarketSession {
    config: SessionConfig,
    catalog: Catalog,
    ledger: Ledger,
    preferences: Preferences,
    filter: ViewFilter,
    selected: Option<String>,
    simulator: PriceSimulator,
    analysis: AnalysisController,
    store: Box<dyn BlobStore>,
    ledger_service: LedgerService,
    view_service: ViewService,
}

impl std::fmt::Debug for MarketSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketSession")
            .field("instruments", &self.catalog.len())
            .field("watchlist", &self.ledger.watchlist.len())
            .field("positions", &self.ledger.positions.len())
            .field("preferences", &self.preferences)
            .field("filter", &self.filter)
            .field("selected", &self.selected)
            .field("ticks", &self.simulator.ticks())
            .field("provider", &self.analysis.provider_name())
            .finish()
    }
}

impl MarketSession {
    /// Open a session: seed the catalog and restore the saved snapshot.
    /// A missing or malformed snapshot is not an error; the session starts empty.
    pub fn open(
        config: SessionConfig,
        store: Box<dyn BlobStore>,
        provider: Arc<dyn AnalysisProvider>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let mut simulator = PriceSimulator::new(&config.simulation);
        let catalog = CatalogService::new()
            .seed_catalog(simulator.rng_mut(), config.simulation.history_len);

        let snapshot = StorageManager::load_or_default(store.as_ref(), &config.storage_key);
        let (ledger, preferences) = snapshot.into_parts();

        tracing::info!(
            instruments = catalog.len(),
            watchlist = ledger.watchlist.len(),
            positions = ledger.positions.len(),
            language = %preferences.language,
            provider = provider.name(),
            "market session opened"
        );

        let analysis = AnalysisController::new(provider, config.analysis.timeout());

        Ok(Self {
            config,
            catalog,
            ledger,
            preferences,
            filter: ViewFilter::default(),
            selected: None,
            simulator,
            analysis,
            store,
            ledger_service: LedgerService::new(),
            view_service: ViewService::new(),
        })
    }

    /// Open with the real generative-language provider built from `config.analysis`.
    pub fn open_with_gemini(config: SessionConfig, store: Box<dyn BlobStore>) -> Result<Self, CoreError> {
        let provider = Arc::new(GeminiProvider::with_config(&config.analysis));
        Self::open(config, store, provider)
    }

    /// Teardown: write the final snapshot and report whether it stuck.
    pub fn close(mut self) -> Result<(), CoreError> {
        let result = self.flush();
        tracing::info!(ticks = self.simulator.ticks(), ok = result.is_ok(), "market session closed");
        result
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ── Catalog & Simulation ────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn instrument(&self, id: &str) -> Option<&Instrument> {
        self.catalog.get(id)
    }

    /// Apply one simulation tick, labelling the new samples with local wall-clock time.
    pub fn tick(&mut self) {
        let label = chrono::Local::now().format("%H:%M:%S").to_string();
        self.tick_with_label(&label);
    }

    /// Apply one simulation tick with an explicit history label.
    pub fn tick_with_label(&mut self, label: &str) {
        self.simulator.tick(&mut self.catalog, label);
    }

    /// Number of ticks applied since the session opened.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.simulator.ticks()
    }

    /// A clock ticking at the configured simulation period.
    /// Drive it with `tokio::select!` alongside user input.
    pub fn simulation_clock(&self) -> SimulationClock {
        SimulationClock::from_config(&self.config.simulation)
    }

    // ── View / Filter ───────────────────────────────────────────────

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.filter.search
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.filter.mode = mode;
    }

    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.filter.mode
    }

    /// Instruments matching the current search and view, in catalog order.
    #[must_use]
    pub fn visible_instruments(&self) -> Vec<&Instrument> {
        self.view_service.visible(&self.catalog, &self.ledger, &self.filter)
    }

    // ── Watchlist & Portfolio ───────────────────────────────────────

    /// Flip watchlist membership. Returns `true` if now watched.
    pub fn toggle_watch(&mut self, id: &str) -> bool {
        let watched = self.ledger_service.toggle_watch(&mut self.ledger, id);
        self.persist();
        watched
    }

    #[must_use]
    pub fn is_watched(&self, id: &str) -> bool {
        self.ledger.is_watched(id)
    }

    #[must_use]
    pub fn watchlist(&self) -> Vec<&str> {
        self.ledger.watchlist.iter().map(String::as_str).collect()
    }

    /// Add one unit of `id` to the portfolio. Returns the amount now held.
    pub fn add_position(&mut self, id: &str) -> f64 {
        let amount = self
            .ledger_service
            .add_position(&mut self.ledger, id, chrono::Utc::now());
        self.persist();
        amount
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.ledger.positions
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Total value of all positions at current simulated prices.
    #[must_use]
    pub fn portfolio_value(&self) -> f64 {
        self.ledger_service.portfolio_value(&self.ledger, &self.catalog)
    }

    /// Current value of the first few positions, in the order they were opened.
    #[must_use]
    pub fn allocation(&self, limit: usize) -> Vec<HoldingValue> {
        self.ledger_service.allocation(&self.ledger, &self.catalog, limit)
    }

    // ── Preferences ─────────────────────────────────────────────────

    #[must_use]
    pub fn language(&self) -> Language {
        self.preferences.language
    }

    /// Change language. If an instrument is selected its analysis is
    /// re-requested in the new language and the ticket is returned.
    pub fn set_language(&mut self, language: Language) -> Option<AnalysisTicket> {
        if self.preferences.language == language {
            return None;
        }
        self.preferences.language = language;
        self.persist();
        self.retry_analysis()
    }

    pub fn toggle_language(&mut self) -> Option<AnalysisTicket> {
        self.set_language(self.preferences.language.toggled())
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.preferences.theme != theme {
            self.preferences.theme = theme;
            self.persist();
        }
    }

    // ── Selection & Analysis ────────────────────────────────────────

    /// Select an instrument and start its analysis.
    pub fn select_instrument(&mut self, id: &str) -> Result<AnalysisTicket, CoreError> {
        let instrument = self
            .catalog
            .get(id)
            .ok_or_else(|| CoreError::UnknownInstrument(id.to_string()))?;
        let ticket = self.analysis.begin(instrument, self.preferences.language);
        self.selected = Some(id.to_string());
        Ok(ticket)
    }

    /// Drop the selection; any request in flight becomes stale.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.analysis.reset();
    }

    #[must_use]
    pub fn selected_instrument(&self) -> Option<&Instrument> {
        self.selected.as_deref().and_then(|id| self.catalog.get(id))
    }

    /// Manual retry: re-enter loading for the selected instrument with its
    /// current price. `None` if nothing is selected.
    pub fn retry_analysis(&mut self) -> Option<AnalysisTicket> {
        let id = self.selected.as_deref()?;
        let instrument = self.catalog.get(id)?;
        Some(self.analysis.begin(instrument, self.preferences.language))
    }

    /// Apply a resolved ticket. Returns `false` if it was stale.
    pub fn apply_analysis(&mut self, outcome: AnalysisOutcome) -> bool {
        self.analysis.apply(outcome)
    }

    #[must_use]
    pub fn analysis_state(&self) -> &AnalysisState {
        self.analysis.state()
    }

    /// Name of the analysis provider requests go to.
    #[must_use]
    pub fn analysis_provider(&self) -> &str {
        self.analysis.provider_name()
    }

    /// Request, await and apply the analysis for the selected instrument.
    /// Blocks the session while pending; use tickets to stay interactive.
    pub async fn analyze_selected(&mut self) -> &AnalysisState {
        if let Some(ticket) = self.retry_analysis() {
            let outcome = ticket.resolve().await;
            self.analysis.apply(outcome);
        }
        self.analysis.state()
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// What would be written to the blob store right now.
    #[must_use]
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::capture(&self.ledger, &self.preferences)
    }

    /// Write the full snapshot, surfacing any storage error.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        let snapshot = self.snapshot();
        StorageManager::save(self.store.as_mut(), &self.config.storage_key, &snapshot)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Mirror state after a mutation. Failures are logged, not propagated.
    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(key = %self.config.storage_key, error = %e, "failed to persist snapshot");
        }
    }
}
