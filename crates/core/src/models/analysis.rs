use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::instrument::Instrument;
use super::settings::Language;

/// Lowest and highest risk level a report can carry.
pub const RISK_LEVEL_MIN: u8 = 1;
pub const RISK_LEVEL_MAX: u8 = 10;

/// Everything the analysis service is told about an instrument.
/// A snapshot taken when the request begins; later ticks don't change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub instrument_id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub language: Language,
}

impl AnalysisRequest {
    pub fn for_instrument(instrument: &Instrument, language: Language) -> Self {
        Self {
            instrument_id: instrument.id.clone(),
            name: instrument.name.clone(),
            symbol: instrument.symbol.clone(),
            price: instrument.price,
            change_24h: instrument.change_24h,
            language,
        }
    }
}

/// Structured blurb returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Themed market mood, e.g. "Hyper-Bullish"
    pub sentiment: String,

    /// Short narrative prediction
    pub prediction: String,

    /// 1..=10
    #[serde(rename = "riskLevel", deserialize_with = "deserialize_risk_level")]
    pub risk_level: u8,

    /// Free-form "technical" explanation
    pub technobabble: String,
}

/// Accepts `7`, `7.4`, `"7"`, `"-2"` or `"7 - plasma drift"`; clamps into 1..=10.
fn deserialize_risk_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("riskLevel out of range: {n}")))?,
        serde_json::Value::String(s) => leading_number(s)
            .ok_or_else(|| D::Error::custom(format!("riskLevel has no leading number: {s:?}")))?,
        other => return Err(D::Error::custom(format!("riskLevel must be a number, got {other}"))),
    };
    if !raw.is_finite() {
        return Err(D::Error::custom("riskLevel must be finite"));
    }
    Ok(raw
        .round()
        .clamp(f64::from(RISK_LEVEL_MIN), f64::from(RISK_LEVEL_MAX)) as u8)
}

fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let unsigned = trimmed.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(trimmed);
    let end = trimmed.len() - unsigned.len()
        + unsigned
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(i, _)| i)
            .unwrap_or(unsigned.len());
    trimmed[..end].parse().ok()
}

/// Observable state of the analysis panel.
///
/// `Idle` → `Loading` on selection, language change or retry;
/// `Loading` → `Ready` on success, back to `Idle` on any failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading {
        request_id: Uuid,
        instrument_id: String,
    },
    Ready {
        instrument_id: String,
        report: AnalysisReport,
    },
}

impl AnalysisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AnalysisState::Loading { .. })
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Id of the request currently in flight, if any.
    pub fn pending_request(&self) -> Option<Uuid> {
        match self {
            AnalysisState::Loading { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}
