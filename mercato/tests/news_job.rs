use std::path::PathBuf;
use std::sync::Arc;

use mercato::Mercato;
use mercato_core::AppConfig;
use mercato_mock::MockConnector;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mercato-news-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[tokio::test]
async fn news_job_writes_one_artifact_per_covered_code() {
    let dir = temp_dir("artifacts");
    let mut config = AppConfig::parse(include_str!("../../config.yaml")).unwrap();
    config.output_directory = dir.clone();

    let mercato = Mercato::builder()
        .config(config)
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let report = mercato.news(None).await.unwrap();

    // Three codes carry news fixtures; the other seven fail individually.
    assert_eq!(report.failures.len(), 7);
    assert!(report.failures.iter().all(|f| f.error.is_lookup_miss()));
    assert_eq!(report.written, 4); // 2 + 1 + 1 articles

    let spx = std::fs::read_to_string(dir.join("SPX500_news.csv")).unwrap();
    assert!(spx.contains("Title,Summary,URL,Published"));
    assert!(spx.contains("S&P 500 notches a fresh record close"));
    assert!(dir.join("GER40_news.csv").exists());
    assert!(dir.join("US30_news.csv").exists());
    assert!(!dir.join("UK100_news.csv").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
