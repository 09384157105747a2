// ═══════════════════════════════════════════════════════════════════
// Model Tests — Instrument, Catalog, Ledger, Preferences, ViewMode,
// AnalysisReport, PersistedSnapshot
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};

use neon_exchange_core::models::analysis::{AnalysisReport, AnalysisRequest, AnalysisState};
use neon_exchange_core::models::instrument::{Catalog, Instrument, InstrumentCategory};
use neon_exchange_core::models::ledger::{Ledger, Position, Watchlist};
use neon_exchange_core::models::settings::{Language, Preferences, Theme};
use neon_exchange_core::models::snapshot::PersistedSnapshot;
use neon_exchange_core::models::view::{ViewFilter, ViewMode};

fn instrument(id: &str, category: InstrumentCategory, price: f64, change: f64) -> Instrument {
    Instrument {
        id: id.into(),
        symbol: id.to_uppercase(),
        name: id.into(),
        price,
        change_24h: change,
        market_cap: "N/A".into(),
        category,
        history: vec![],
    }
}

// ═══════════════════════════════════════════════════════════════════
// Instrument
// ═══════════════════════════════════════════════════════════════════

mod instrument_model {
    use super::*;

    #[test]
    fn crypto_price_two_decimals() {
        let i = instrument("btc", InstrumentCategory::Crypto, 64231.5, 0.0);
        assert_eq!(i.display_price(), "64231.50");
    }

    #[test]
    fn forex_price_four_decimals() {
        let i = instrument("eurusd", InstrumentCategory::Forex, 1.0842, 0.0);
        assert_eq!(i.display_price(), "1.0842");
    }

    #[test]
    fn change_has_sign() {
        assert_eq!(instrument("a", InstrumentCategory::Crypto, 1.0, 2.45).display_change(), "+2.45%");
        assert_eq!(instrument("a", InstrumentCategory::Crypto, 1.0, -1.2).display_change(), "-1.20%");
        assert_eq!(instrument("a", InstrumentCategory::Crypto, 1.0, 0.0).display_change(), "+0.00%");
    }

    #[test]
    fn zero_change_counts_as_gaining() {
        assert!(instrument("a", InstrumentCategory::Crypto, 1.0, 0.0).is_gaining());
        assert!(!instrument("a", InstrumentCategory::Crypto, 1.0, -0.01).is_gaining());
    }

    #[test]
    fn matches_name_or_symbol() {
        let i = Instrument {
            name: "Bitcoin".into(),
            symbol: "BTC".into(),
            ..instrument("bitcoin", InstrumentCategory::Crypto, 1.0, 0.0)
        };
        assert!(i.matches("bit"));
        assert!(i.matches("btc"));
        assert!(i.matches(""));
        assert!(!i.matches("eth"));
    }

    #[test]
    fn category_serde_lowercase() {
        assert_eq!(serde_json::to_string(&InstrumentCategory::Forex).unwrap(), "\"forex\"");
        let c: InstrumentCategory = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(c, InstrumentCategory::Crypto);
        assert_eq!(InstrumentCategory::Crypto.to_string(), "crypto");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════

mod catalog_model {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            instrument("bitcoin", InstrumentCategory::Crypto, 100.0, 0.0),
            instrument("gold", InstrumentCategory::Forex, 2321.4, 0.0),
        ])
    }

    #[test]
    fn lookup_by_id() {
        let c = catalog();
        assert_eq!(c.price_of("gold"), Some(2321.4));
        assert!(c.contains("bitcoin"));
        assert!(c.get("silver").is_none());
        assert_eq!(c.price_of("silver"), None);
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let c = catalog();
        let ids: Vec<&str> = c.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "gold"]);
    }

    #[test]
    fn default_is_empty() {
        let c = Catalog::default();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Ledger / Position
// ═══════════════════════════════════════════════════════════════════

mod ledger_model {
    use super::*;

    #[test]
    fn new_position_amount_one() {
        let p = Position::new("bitcoin", Utc::now());
        assert_eq!(p.amount, 1.0);
    }

    #[test]
    fn position_serializes_added_at_as_millis() {
        let at = Utc.timestamp_millis_opt(1_718_000_000_123).unwrap();
        let p = Position::new("bitcoin", at);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "bitcoin");
        assert_eq!(json["amount"], 1.0);
        assert_eq!(json["addedAt"], 1_718_000_000_123_i64);
    }

    #[test]
    fn position_deserializes_browser_shape() {
        let p: Position =
            serde_json::from_str(r#"{"id":"solana","amount":3,"addedAt":1718000000000}"#).unwrap();
        assert_eq!(p.id, "solana");
        assert_eq!(p.amount, 3.0);
        assert_eq!(p.added_at.timestamp_millis(), 1_718_000_000_000);
    }

    #[test]
    fn empty_ledger() {
        let l = Ledger::new();
        assert!(l.is_empty());
        assert!(!l.is_watched("bitcoin"));
        assert!(!l.has_position("bitcoin"));
    }

    #[test]
    fn watchlist_insert_remove_keeps_order() {
        let mut w = Watchlist::new();
        assert!(w.insert("solana".into()));
        assert!(w.insert("bitcoin".into()));
        assert!(w.insert("gold".into()));
        assert!(!w.insert("bitcoin".into()));
        assert!(w.remove("bitcoin"));
        assert!(!w.remove("bitcoin"));
        let ids: Vec<&str> = w.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["solana", "gold"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Preferences
// ═══════════════════════════════════════════════════════════════════

mod preferences_model {
    use super::*;

    #[test]
    fn language_defaults_to_english() {
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Preferences::default().language, Language::English);
    }

    #[test]
    fn language_toggle_is_two_valued() {
        assert_eq!(Language::English.toggled(), Language::Turkish);
        assert_eq!(Language::Turkish.toggled(), Language::English);
        assert_eq!(Language::English.toggled().toggled(), Language::English);
    }

    #[test]
    fn language_codes_and_names() {
        assert_eq!(Language::English.code(), "EN");
        assert_eq!(Language::Turkish.to_string(), "TR");
        assert_eq!(Language::Turkish.display_name(), "Turkish");
    }

    #[test]
    fn language_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Turkish).unwrap(), "\"TR\"");
        let l: Language = serde_json::from_str("\"EN\"").unwrap();
        assert_eq!(l, Language::English);
        assert!(serde_json::from_str::<Language>("\"DE\"").is_err());
    }

    #[test]
    fn theme_serde_lowercase() {
        assert_eq!(Theme::default(), Theme::Cyber);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }
}

// ═══════════════════════════════════════════════════════════════════
// ViewMode / ViewFilter
// ═══════════════════════════════════════════════════════════════════

mod view_model {
    use super::*;

    #[test]
    fn exactly_four_modes() {
        assert_eq!(ViewMode::ALL.len(), 4);
        assert_eq!(ViewMode::default(), ViewMode::Market);
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(ViewMode::Watchlist.to_string(), "WATCHLIST");
        assert_eq!(serde_json::to_string(&ViewMode::Portfolio).unwrap(), "\"PORTFOLIO\"");
    }

    #[test]
    fn filter_default() {
        let f = ViewFilter::default();
        assert!(f.search.is_empty());
        assert_eq!(f.mode, ViewMode::Market);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Analysis
// ═══════════════════════════════════════════════════════════════════

mod analysis_model {
    use super::*;

    fn parse(json: &str) -> Result<AnalysisReport, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn numeric_risk_level() {
        let r = parse(r#"{"sentiment":"Hyper-Bullish","prediction":"Up","riskLevel":7,"technobabble":"Flux"}"#)
            .unwrap();
        assert_eq!(r.sentiment, "Hyper-Bullish");
        assert_eq!(r.risk_level, 7);
    }

    #[test]
    fn string_risk_level_with_reason() {
        let r = parse(
            r#"{"sentiment":"s","prediction":"p","riskLevel":"8 - quantum decoherence in order books","technobabble":"t"}"#,
        )
        .unwrap();
        assert_eq!(r.risk_level, 8);
    }

    #[test]
    fn risk_level_is_clamped() {
        let high = parse(r#"{"sentiment":"s","prediction":"p","riskLevel":42,"technobabble":"t"}"#).unwrap();
        let low = parse(r#"{"sentiment":"s","prediction":"p","riskLevel":0,"technobabble":"t"}"#).unwrap();
        assert_eq!(high.risk_level, 10);
        assert_eq!(low.risk_level, 1);
    }

    #[test]
    fn signed_string_risk_level_is_clamped() {
        let low = parse(r#"{"sentiment":"s","prediction":"p","riskLevel":"-2 negative","technobabble":"t"}"#).unwrap();
        let plus = parse(r#"{"sentiment":"s","prediction":"p","riskLevel":"+4 stable","technobabble":"t"}"#).unwrap();
        assert_eq!(low.risk_level, 1);
        assert_eq!(plus.risk_level, 4);
        assert!(parse(r#"{"sentiment":"s","prediction":"p","riskLevel":"- none","technobabble":"t"}"#).is_err());
    }

    #[test]
    fn fractional_risk_level_rounds() {
        let r = parse(r#"{"sentiment":"s","prediction":"p","riskLevel":6.6,"technobabble":"t"}"#).unwrap();
        assert_eq!(r.risk_level, 7);
    }

    #[test]
    fn risk_level_without_number_is_rejected() {
        assert!(parse(r#"{"sentiment":"s","prediction":"p","riskLevel":"extreme","technobabble":"t"}"#).is_err());
        assert!(parse(r#"{"sentiment":"s","prediction":"p","riskLevel":null,"technobabble":"t"}"#).is_err());
    }

    #[test]
    fn missing_key_is_rejected() {
        assert!(parse(r#"{"sentiment":"s","riskLevel":3,"technobabble":"t"}"#).is_err());
    }

    #[test]
    fn request_snapshot_from_instrument() {
        let i = instrument("bitcoin", InstrumentCategory::Crypto, 64231.5, 2.45);
        let req = AnalysisRequest::for_instrument(&i, Language::Turkish);
        assert_eq!(req.instrument_id, "bitcoin");
        assert_eq!(req.price, 64231.5);
        assert_eq!(req.change_24h, 2.45);
        assert_eq!(req.language, Language::Turkish);
    }

    #[test]
    fn state_helpers() {
        assert!(!AnalysisState::Idle.is_loading());
        assert!(AnalysisState::Idle.report().is_none());
        assert!(AnalysisState::Idle.pending_request().is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// PersistedSnapshot
// ═══════════════════════════════════════════════════════════════════

mod snapshot_model {
    use super::*;

    #[test]
    fn wire_shape() {
        let mut ledger = Ledger::new();
        ledger.watchlist.insert("bitcoin".into());
        ledger
            .positions
            .push(Position::new("solana", Utc.timestamp_millis_opt(1_000).unwrap()));
        let prefs = Preferences {
            language: Language::Turkish,
            theme: Theme::Cyber,
        };

        let json = serde_json::to_value(PersistedSnapshot::capture(&ledger, &prefs)).unwrap();
        assert_eq!(json["watchlist"], serde_json::json!(["bitcoin"]));
        assert_eq!(json["portfolio"][0]["id"], "solana");
        assert_eq!(json["portfolio"][0]["addedAt"], 1_000);
        assert_eq!(json["theme"], "cyber");
        assert_eq!(json["language"], "TR");
    }

    #[test]
    fn missing_fields_default() {
        let s: PersistedSnapshot = serde_json::from_str(r#"{"language":"TR"}"#).unwrap();
        assert!(s.watchlist.is_empty());
        assert!(s.portfolio.is_empty());
        assert_eq!(s.theme, Theme::Cyber);
        assert_eq!(s.language, Language::Turkish);
    }

    #[test]
    fn duplicate_watch_ids_collapse() {
        let s: PersistedSnapshot =
            serde_json::from_str(r#"{"watchlist":["xrp","xrp","gold"]}"#).unwrap();
        let expected: Watchlist = ["xrp", "gold"].iter().map(|s| s.to_string()).collect();
        assert_eq!(s.watchlist, expected);
    }

    #[test]
    fn watchlist_keeps_insertion_order() {
        let s: PersistedSnapshot =
            serde_json::from_str(r#"{"watchlist":["solana","bitcoin","eurusd"]}"#).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["watchlist"], serde_json::json!(["solana", "bitcoin", "eurusd"]));
    }

    #[test]
    fn null_field_falls_back_alone() {
        let s: PersistedSnapshot = serde_json::from_str(
            r#"{"watchlist":null,"portfolio":[{"id":"bitcoin","amount":2,"addedAt":1700000000000}],"theme":null,"language":"TR"}"#,
        )
        .unwrap();
        assert!(s.watchlist.is_empty());
        assert_eq!(s.portfolio.len(), 1);
        assert_eq!(s.theme, Theme::Cyber);
        assert_eq!(s.language, Language::Turkish);
    }

    #[test]
    fn wrongly_typed_field_falls_back_alone() {
        let s: PersistedSnapshot =
            serde_json::from_str(r#"{"watchlist":"gold","portfolio":{},"language":"DE","theme":"dark"}"#)
                .unwrap();
        assert!(s.watchlist.is_empty());
        assert!(s.portfolio.is_empty());
        assert_eq!(s.language, Language::English);
        assert_eq!(s.theme, Theme::Dark);
    }

    #[test]
    fn duplicate_positions_merge() {
        let s: PersistedSnapshot = serde_json::from_str(
            r#"{"portfolio":[{"id":"xrp","amount":1,"addedAt":10},{"id":"xrp","amount":2,"addedAt":20}]}"#,
        )
        .unwrap();
        let (ledger, _) = s.into_parts();
        assert_eq!(ledger.positions.len(), 1);
        assert_eq!(ledger.positions[0].amount, 3.0);
        assert_eq!(ledger.positions[0].added_at.timestamp_millis(), 10);
    }

    #[test]
    fn capture_then_split_round_trips() {
        let mut ledger = Ledger::new();
        ledger.watchlist.insert("gold".into());
        ledger.positions.push(Position::new("bitcoin", Utc::now()));
        let prefs = Preferences {
            language: Language::Turkish,
            theme: Theme::Dark,
        };
        let (ledger2, prefs2) = PersistedSnapshot::capture(&ledger, &prefs).into_parts();
        assert_eq!(ledger2, ledger);
        assert_eq!(prefs2, prefs);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SessionConfig
// ═══════════════════════════════════════════════════════════════════

mod session_config {
    use neon_exchange_core::config::{AnalysisConfig, SessionConfig, DEFAULT_STORAGE_KEY};
    use neon_exchange_core::errors::CoreError;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.simulation.tick_interval(), Duration::from_millis(5000));
        assert_eq!(config.simulation.volatility, 0.005);
        assert_eq!(config.simulation.history_len, 20);
        assert_eq!(config.analysis.timeout(), Duration::from_secs(30));
        assert!(config.analysis.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unusable_values() {
        let cases: [fn(&mut SessionConfig); 6] = [
            |c| c.storage_key = "  ".into(),
            |c| c.simulation.tick_interval_ms = 0,
            |c| c.simulation.history_len = 0,
            |c| c.simulation.volatility = f64::NAN,
            |c| c.simulation.volatility = -0.1,
            |c| c.analysis.timeout_secs = 0,
        ];
        for (i, mutate) in cases.into_iter().enumerate() {
            let mut config = SessionConfig::default();
            mutate(&mut config);
            assert!(matches!(config.validate(), Err(CoreError::Config(_))), "case {i}");
        }
    }

    #[test]
    fn zero_volatility_is_allowed() {
        let mut config = SessionConfig::default();
        config.simulation.volatility = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"simulation":{"tick_interval_ms":1000,"volatility":0.01,"history_len":5}}"#)
                .unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.simulation.history_len, 5);
        assert!(config.simulation.seed.is_none());
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AnalysisConfig {
            api_key: Some("sk-live-123".into()),
            ..AnalysisConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-live-123"));
        assert!(debug.contains("<redacted>"));
    }
}
