use httpmock::prelude::*;
use mercato_core::{IndexCode, MercatoError, NewsProvider, SnapshotProvider};
use mercato_investing::InvestingConnector;

const SNAPSHOT_PAGE: &str = r#"
<html><body>
<table class="datatable-v2_table__93S4Y"><tbody>
<tr><td>*</td><td>FTSE 100</td><td>7,650.10</td><td>7,700.00</td>
<td>7,600.00</td><td>+12.30</td><td>+0.16%</td><td>16:35:00</td></tr>
</tbody></table>
</body></html>
"#;

#[tokio::test]
async fn snapshots_fetches_and_parses_the_table() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/indices/major-indices");
        then.status(200).body(SNAPSHOT_PAGE);
    });

    let connector = InvestingConnector::with_base_url(&server.base_url()).unwrap();
    let rows = connector.snapshots().await.unwrap();

    mock.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "FTSE 100");
}

#[tokio::test]
async fn non_success_status_is_a_connector_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/indices/uk-100-news");
        then.status(503);
    });

    let connector = InvestingConnector::with_base_url(&server.base_url()).unwrap();
    let err = connector
        .news(IndexCode::Uk100, "uk-100", 10)
        .await
        .unwrap_err();
    match err {
        MercatoError::Connector { connector, msg } => {
            assert_eq!(connector, "mercato-investing");
            assert!(msg.contains("503"));
        }
        other => panic!("expected a connector error, got {other:?}"),
    }
}

#[tokio::test]
async fn news_respects_the_limit() {
    let server = MockServer::start();
    let body = r#"
<ul data-test="news-list">
  <li><article><a data-test="article-title-link" href="/a1">One</a></article></li>
  <li><article><a data-test="article-title-link" href="/a2">Two</a></article></li>
  <li><article><a data-test="article-title-link" href="/a3">Three</a></article></li>
</ul>
"#;
    server.mock(|when, then| {
        when.method(GET).path("/indices/us-spx-500-news");
        then.status(200).body(body);
    });

    let connector = InvestingConnector::with_base_url(&server.base_url()).unwrap();
    let items = connector
        .news(IndexCode::Spx500, "us-spx-500", 2)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.code == IndexCode::Spx500));
}
