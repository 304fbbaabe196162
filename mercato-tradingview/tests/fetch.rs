use httpmock::prelude::*;
use mercato_core::{ComponentsProvider, IndexCode, MercatoError};
use mercato_tradingview::TradingViewConnector;

const PAGE: &str = r#"
<div id="js-category-content">
<table><tbody>
<tr>
  <td><a class="tickerName">NVDA</a><sup>NVIDIA Corp.</sup></td>
  <td>2.2T</td><td>905.40</td><td>+2.05%</td><td>40.0M</td><td>1.31</td>
  <td>74.2</td><td>12.2</td><td>+120%</td><td>0.02%</td>
  <td>Electronic technology</td><td>Strong buy</td>
</tr>
</tbody></table>
</div>
"#;

#[tokio::test]
async fn components_fetches_the_index_page_and_parses() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/symbols/NASDAQ-NDX/components/");
        then.status(200).body(PAGE);
    });

    let connector = TradingViewConnector::with_base_url(&server.base_url()).unwrap();
    let rows = connector
        .components(IndexCode::Nas100, "NASDAQ-NDX", )
        .await
        .unwrap();

    mock.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "NVDA");
    assert_eq!(rows[0].name.as_deref(), Some("NVIDIA Corp."));
}

#[tokio::test]
async fn http_failure_is_tagged_with_the_connector_name() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/symbols/SPX/components/");
        then.status(404);
    });

    let connector = TradingViewConnector::with_base_url(&server.base_url()).unwrap();
    let err = connector
        .components(IndexCode::Spx500, "SPX")
        .await
        .unwrap_err();
    match err {
        MercatoError::Connector { connector, .. } => {
            assert_eq!(connector, "mercato-tradingview");
        }
        other => panic!("expected a connector error, got {other:?}"),
    }
}
