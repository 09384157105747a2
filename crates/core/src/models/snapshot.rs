use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::ledger::{Ledger, Position, Watchlist};
use super::settings::{Language, Preferences, Theme};

/// The full persisted state blob.
///
/// Wire shape: `{"watchlist": [id..], "portfolio": [{"id", "amount", "addedAt"}..],
/// "theme": "cyber", "language": "EN"}`. Each field is decoded on its own:
/// a missing, `null` or unreadable field falls back to its default without
/// taking the rest of the blob down with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(default, deserialize_with = "field_or_default")]
    pub watchlist: Watchlist,

    #[serde(default, deserialize_with = "field_or_default")]
    pub portfolio: Vec<Position>,

    #[serde(default, deserialize_with = "field_or_default")]
    pub theme: Theme,

    #[serde(default, deserialize_with = "field_or_default")]
    pub language: Language,
}

/// `null` or a value of the wrong shape decodes to `T::default()`.
/// Only a syntactically broken document fails the whole snapshot.
fn field_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable snapshot field");
        T::default()
    }))
}

impl PersistedSnapshot {
    pub fn capture(ledger: &Ledger, preferences: &Preferences) -> Self {
        Self {
            watchlist: ledger.watchlist.clone(),
            portfolio: ledger.positions.clone(),
            theme: preferences.theme,
            language: preferences.language,
        }
    }

    /// Split back into the session's ledger and preferences.
    /// Duplicate position ids (hand-edited blobs) are merged by summing amounts.
    pub fn into_parts(self) -> (Ledger, Preferences) {
        let mut positions: Vec<Position> = Vec::with_capacity(self.portfolio.len());
        for position in self.portfolio {
            match positions.iter_mut().find(|p| p.id == position.id) {
                Some(existing) => existing.amount += position.amount,
                None => positions.push(position),
            }
        }

        let ledger = Ledger {
            watchlist: self.watchlist,
            positions,
        };
        let preferences = Preferences {
            language: self.language,
            theme: self.theme,
        };
        (ledger, preferences)
    }
}
