use httpmock::prelude::*;
use mercato_core::{IndexCode, MercatoError, SentimentLabel};
use mercato_gemini::{
    GeminiClient, GeminiCredentials, SentimentClient, SentimentScorer, Summarizer,
};

fn creds(server: &MockServer) -> GeminiCredentials {
    GeminiCredentials {
        api_key: "test-key".into(),
        endpoint: Some(server.base_url()),
        sentiment_endpoint: None,
    }
}

#[tokio::test]
async fn summarize_posts_the_prompt_and_extracts_the_candidate_text() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .query_param("key", "test-key")
            .body_includes("concise 1-paragraph summary")
            .body_includes("Index slides on rate fears");
        then.status(200).json_body(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": " Markets weakened on rate fears. " }] }
            }]
        }));
    });

    let client = GeminiClient::new(&creds(&server)).unwrap();
    let summary = client
        .summarize(
            IndexCode::Spx500,
            &["Index slides on rate fears".to_string()],
        )
        .await
        .unwrap();

    mock.assert();
    assert_eq!(summary, "Markets weakened on rate fears.");
}

#[tokio::test]
async fn empty_candidate_text_is_a_data_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path_includes(":generateContent");
        then.status(200).json_body(serde_json::json!({ "candidates": [] }));
    });

    let client = GeminiClient::new(&creds(&server)).unwrap();
    let err = client
        .summarize(IndexCode::Us30, &["text".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, MercatoError::Data(_)));
}

#[tokio::test]
async fn nothing_to_summarize_fails_before_any_io() {
    let server = MockServer::start();
    let client = GeminiClient::new(&creds(&server)).unwrap();
    let err = client
        .summarize(IndexCode::Us30, &[" ".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, MercatoError::Data(_)));
}

#[tokio::test]
async fn sentiment_picks_the_top_scoring_label() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/classify");
        then.status(200).json_body(serde_json::json!([[
            { "label": "negative", "score": 0.08 },
            { "label": "positive", "score": 0.81 },
            { "label": "neutral", "score": 0.11 }
        ]]));
    });

    let client = SentimentClient::new(&server.url("/classify"), Some("tok".into())).unwrap();
    let sentiment = client.sentiment("Markets rallied strongly").await.unwrap();
    assert_eq!(sentiment.label, SentimentLabel::Positive);
    assert!((sentiment.confidence - 0.81).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unknown_label_vocabulary_is_a_data_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/classify");
        then.status(200)
            .json_body(serde_json::json!([[{ "label": "bullish", "score": 0.99 }]]));
    });

    let client = SentimentClient::new(&server.url("/classify"), None).unwrap();
    let err = client.sentiment("text").await.unwrap_err();
    assert!(matches!(err, MercatoError::Data(_)));
}

#[tokio::test]
async fn http_failures_are_tagged_connector_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path_includes(":generateContent");
        then.status(429);
    });

    let client = GeminiClient::new(&creds(&server)).unwrap();
    let err = client
        .summarize(IndexCode::Fra40, &["text".to_string()])
        .await
        .unwrap_err();
    match err {
        MercatoError::Connector { connector, msg } => {
            assert_eq!(connector, "mercato-gemini");
            assert!(msg.contains("429"));
        }
        other => panic!("expected connector error, got {other:?}"),
    }
}
