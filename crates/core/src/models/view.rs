use serde::{Deserialize, Serialize};

/// Which instrument subset the dashboard is showing. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViewMode {
    /// All instruments
    #[default]
    Market,
    /// Instruments with an open position
    Portfolio,
    /// Instruments on the watchlist
    Watchlist,
    /// Detail view keyed by the selected instrument; lists like `Market`
    Analysis,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Market,
        ViewMode::Portfolio,
        ViewMode::Watchlist,
        ViewMode::Analysis,
    ];
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Market => write!(f, "MARKET"),
            ViewMode::Portfolio => write!(f, "PORTFOLIO"),
            ViewMode::Watchlist => write!(f, "WATCHLIST"),
            ViewMode::Analysis => write!(f, "ANALYSIS"),
        }
    }
}

/// Inputs of the view derivation besides the catalog and ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    /// Raw search text as typed; matching is case-insensitive.
    pub search: String,
    pub mode: ViewMode,
}

impl ViewFilter {
    pub fn new(search: impl Into<String>, mode: ViewMode) -> Self {
        Self {
            search: search.into(),
            mode,
        }
    }
}
