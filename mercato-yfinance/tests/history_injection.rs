#![cfg(feature = "test-adapters")]

use std::sync::Arc;

use mercato_core::{FetchWindow, HistoryProvider, IndexCode};
use mercato_yfinance::{YfConnector, adapter};
use chrono::{TimeZone, Utc};
use paft::money::{Currency, IsoCurrency, Money};
use rust_decimal::Decimal;
use yfinance_rs as yf;

struct Combo {
    h: Arc<dyn adapter::YfHistory>,
}
impl adapter::CloneArcAdapters for Combo {
    fn clone_arc_history(&self) -> Arc<dyn adapter::YfHistory> {
        self.h.clone()
    }
}

fn usd(s: &str) -> Money {
    Money::from_canonical_str(s, Currency::Iso(IsoCurrency::USD)).unwrap()
}

#[tokio::test]
async fn history_uses_injected_adapter_and_maps_rows() {
    // Build a fake history adapter (no network).
    let hist = <dyn adapter::YfHistory>::from_fn(|symbol, req| {
        assert_eq!(symbol, "^GSPC");
        assert!(req.auto_adjust);
        let (start, end) = req.period.expect("lookback translated to a period");
        // 7d lookback: roughly seven days of span.
        assert_eq!((end - start) / 86_400, 7);

        let candles = vec![
            yf::Candle {
                ts: Utc.timestamp_opt(1, 0).unwrap(),
                open: usd("5000.25"),
                high: usd("5010"),
                low: usd("4990"),
                close: usd("5005.5"),
                close_unadj: None,
                volume: Some(1_000),
            },
            yf::Candle {
                ts: Utc.timestamp_opt(61, 0).unwrap(),
                open: usd("5005.5"),
                high: usd("5020"),
                low: usd("5001"),
                close: usd("5015"),
                close_unadj: None,
                volume: None,
            },
        ];
        Ok(yf::HistoryResponse {
            candles,
            actions: vec![],
            adjusted: true,
            meta: None,
        })
    });

    let connector = YfConnector::from_adapter(&Combo { h: hist });
    let window = FetchWindow {
        period: "7d".into(),
        interval: "1m".into(),
    };
    let rows = connector
        .history(IndexCode::Spx500, "^GSPC", &window)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].code, IndexCode::Spx500);
    assert_eq!(rows[0].open, Decimal::new(500_025, 2));
    assert_eq!(rows[0].volume, Some(1_000));
    assert_eq!(rows[1].volume, None);
    assert_eq!(rows[1].ts, Utc.timestamp_opt(61, 0).unwrap());
}

#[tokio::test]
async fn invalid_window_is_rejected_before_any_io() {
    let hist = <dyn adapter::YfHistory>::from_fn(|_, _| {
        panic!("adapter must not be reached for an invalid window");
    });
    let connector = YfConnector::from_adapter(&Combo { h: hist });

    let window = FetchWindow {
        period: "sevendays".into(),
        interval: "1m".into(),
    };
    let err = connector
        .history(IndexCode::Spx500, "^GSPC", &window)
        .await
        .unwrap_err();
    assert!(matches!(err, mercato_core::MercatoError::InvalidArg(_)));
}
