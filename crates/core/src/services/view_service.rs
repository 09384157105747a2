use crate::models::instrument::{Catalog, Instrument};
use crate::models::ledger::Ledger;
use crate::models::view::{ViewFilter, ViewMode};

/// Derives the displayed instrument subset.
///
/// Pure: no I/O, no caching. The result is always a subset of the
/// catalog, in catalog order.
pub struct ViewService;

impl ViewService {
    pub fn new() -> Self {
        Self
    }

    /// 1. keep instruments whose name or symbol contains the search text (case-insensitive);
    /// 2. restrict by view mode (portfolio → has a position, watchlist → watched).
    pub fn visible<'a>(
        &self,
        catalog: &'a Catalog,
        ledger: &Ledger,
        filter: &ViewFilter,
    ) -> Vec<&'a Instrument> {
        let needle = filter.search.to_lowercase();
        let visible: Vec<&Instrument> = catalog
            .iter()
            .filter(|i| i.matches(&needle))
            .filter(|i| match filter.mode {
                ViewMode::Portfolio => ledger.has_position(&i.id),
                ViewMode::Watchlist => ledger.is_watched(&i.id),
                ViewMode::Market | ViewMode::Analysis => true,
            })
            .collect();
        tracing::debug!(mode = %filter.mode, search = %filter.search, visible = visible.len(), "view derived");
        visible
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}
