//! Spreadsheet sink over the values REST API.
//!
//! Worksheets are created on demand and replaced wholesale on upload,
//! mirroring how the dashboard spreadsheet has always been refreshed.

use serde::Deserialize;
use url::Url;

use mercato_core::MercatoError;

use crate::credentials::SheetsCredentials;

const DEFAULT_ENDPOINT: &str = "https://sheets.googleapis.com";

fn sheets_err(e: impl std::fmt::Display) -> MercatoError {
    MercatoError::storage(format!("sheets: {e}"))
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Client for one spreadsheet document.
pub struct SheetsClient {
    http: reqwest::Client,
    base: Url,
    spreadsheet_id: String,
    token: String,
}

impl SheetsClient {
    /// Build a client from credentials, honoring an endpoint override.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the endpoint override is not a valid URL.
    pub fn new(creds: &SheetsCredentials) -> Result<Self, MercatoError> {
        let base = creds.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let base =
            Url::parse(base).map_err(|e| MercatoError::InvalidArg(format!("sheets endpoint: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            spreadsheet_id: creds.spreadsheet_id.clone(),
            token: creds.token.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, MercatoError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| MercatoError::InvalidArg("sheets endpoint is not a base".into()))?;
            path.extend(["v4", "spreadsheets"]);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, MercatoError> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(sheets_err(format!("{what} returned status {status}")))
        }
    }

    /// Ensure a worksheet with `title` exists, creating it when absent.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on API failures.
    pub async fn ensure_worksheet(&self, title: &str) -> Result<(), MercatoError> {
        let mut meta_url = self.url(&[&self.spreadsheet_id])?;
        meta_url
            .query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let resp = self
            .http
            .get(meta_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(sheets_err)?;
        let meta: SpreadsheetMeta = Self::check(resp, "spreadsheet metadata")
            .await?
            .json()
            .await
            .map_err(sheets_err)?;

        if meta.sheets.iter().any(|s| s.properties.title == title) {
            return Ok(());
        }

        let add_url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)])?;
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        let resp = self
            .http
            .post(add_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(sheets_err)?;
        Self::check(resp, "addSheet").await?;
        tracing::info!(title, "created worksheet");
        Ok(())
    }

    /// Replace the contents of a worksheet with `header` + `rows`.
    ///
    /// The worksheet is created if missing and cleared before writing, so
    /// the upload is a full refresh rather than an append.
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on API failures.
    pub async fn replace_rows(
        &self,
        title: &str,
        header: &[&str],
        rows: &[Vec<String>],
    ) -> Result<(), MercatoError> {
        self.ensure_worksheet(title).await?;

        let clear_url = self.url(&[
            &self.spreadsheet_id,
            "values",
            &format!("{title}:clear"),
        ])?;
        let resp = self
            .http
            .post(clear_url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(sheets_err)?;
        Self::check(resp, "values clear").await?;

        let mut values: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        values.push(header.iter().map(|h| (*h).to_string()).collect());
        values.extend(rows.iter().cloned());

        let range = format!("{title}!A1");
        let mut update_url = self.url(&[&self.spreadsheet_id, "values", &range])?;
        update_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "RAW");
        let body = serde_json::json!({ "range": range, "values": values });
        let resp = self
            .http
            .put(update_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(sheets_err)?;
        Self::check(resp, "values update").await?;
        tracing::info!(title, rows = rows.len(), "replaced worksheet contents");
        Ok(())
    }

    /// Read a worksheet back as rows of strings (header row included).
    ///
    /// # Errors
    /// Returns [`MercatoError::Storage`] on API failures.
    pub async fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, MercatoError> {
        let url = self.url(&[&self.spreadsheet_id, "values", title])?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(sheets_err)?;
        let range: ValueRange = Self::check(resp, "values read")
            .await?
            .json()
            .await
            .map_err(sheets_err)?;
        Ok(range.values)
    }
}
