#![cfg(not(feature = "test-adapters"))]

use mercato_core::MercatoConnector;
use mercato_yfinance::YfConnector;

#[test]
fn advertises_history_and_news_only() {
    let c = YfConnector::new_default();
    assert_eq!(c.name(), "mercato-yfinance");
    assert_eq!(c.vendor(), "Yahoo Finance");
    assert!(c.as_history_provider().is_some());
    assert!(c.as_news_provider().is_some());
    assert!(c.as_snapshot_provider().is_none());
    assert!(c.as_technicals_provider().is_none());
    assert!(c.as_components_provider().is_none());
}
