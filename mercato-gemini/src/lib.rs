//! mercato-gemini
//!
//! Thin REST clients for the two model services the digest job talks to:
//! the Gemini `generateContent` endpoint for one-paragraph news summaries,
//! and an HF-style text-classification endpoint for financial sentiment
//! (the FinBERT role). Both models run elsewhere; this crate only speaks
//! their wire formats.
#![warn(missing_docs)]

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use mercato_core::{IndexCode, MercatoError, Sentiment, SentimentLabel};

/// Role trait for producing a one-paragraph summary of news texts.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the given article texts for one index.
    async fn summarize(&self, code: IndexCode, texts: &[String]) -> Result<String, MercatoError>;
}

/// Role trait for scoring the sentiment of a text.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Classify `text` and return the top label with its confidence.
    async fn sentiment(&self, text: &str) -> Result<Sentiment, MercatoError>;
}

/// Credentials and endpoint overrides for the model services.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCredentials {
    /// API key for the generateContent endpoint.
    pub api_key: String,
    /// Optional endpoint override (tests, proxies).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Optional sentiment endpoint override.
    #[serde(default)]
    pub sentiment_endpoint: Option<String>,
}

impl GeminiCredentials {
    /// Load credentials from a JSON file.
    ///
    /// # Errors
    /// Returns [`MercatoError::Config`] when the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MercatoError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MercatoError::config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| MercatoError::config(e.to_string()))
    }
}

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from credentials, honoring an endpoint override.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the endpoint override is not a valid URL.
    pub fn new(creds: &GeminiCredentials) -> Result<Self, MercatoError> {
        let endpoint = creds.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint = Url::parse(endpoint)
            .map_err(|e| MercatoError::InvalidArg(format!("gemini endpoint: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: creds.api_key.clone(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the model id (default `gemini-2.0-flash`).
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn generate(&self, prompt: &str) -> Result<String, MercatoError> {
        let mut url = self
            .endpoint
            .join(&format!("/v1beta/models/{}:generateContent", self.model))
            .map_err(|e| MercatoError::InvalidArg(format!("gemini url: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MercatoError::connector("mercato-gemini", e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MercatoError::connector(
                "mercato-gemini",
                format!("generateContent status {status}"),
            ));
        }
        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| MercatoError::connector("mercato-gemini", e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(MercatoError::Data(
                "generateContent returned no text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, code: IndexCode, texts: &[String]) -> Result<String, MercatoError> {
        let joined = texts
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if joined.is_empty() {
            return Err(MercatoError::Data(format!(
                "no article texts to summarize for {code}"
            )));
        }
        let prompt = format!(
            "Generate a concise 1-paragraph summary of the following news articles:\n{joined}"
        );
        let summary = self.generate(&prompt).await?;
        tracing::info!(%code, chars = summary.len(), "summarized news");
        Ok(summary)
    }
}

#[derive(Deserialize)]
struct ClassificationScore {
    label: String,
    score: f64,
}

/// Client for an HF-style text-classification inference endpoint.
///
/// The endpoint answers `{"inputs": "..."}` with
/// `[[{"label": "positive", "score": 0.93}, ...]]`.
pub struct SentimentClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl SentimentClient {
    /// Build a client for the given inference endpoint.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `endpoint` is not a valid URL.
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, MercatoError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| MercatoError::InvalidArg(format!("sentiment endpoint: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            token,
        })
    }
}

#[async_trait]
impl SentimentScorer for SentimentClient {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, MercatoError> {
        let mut req = self
            .http
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| MercatoError::connector("mercato-sentiment", e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MercatoError::connector(
                "mercato-sentiment",
                format!("classification status {status}"),
            ));
        }
        let scores: Vec<Vec<ClassificationScore>> = resp
            .json()
            .await
            .map_err(|e| MercatoError::connector("mercato-sentiment", e.to_string()))?;

        let best = scores
            .into_iter()
            .flatten()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| MercatoError::Data("empty classification response".to_string()))?;
        let label: SentimentLabel = best.label.parse()?;
        Ok(Sentiment {
            label,
            confidence: best.score,
        })
    }
}
