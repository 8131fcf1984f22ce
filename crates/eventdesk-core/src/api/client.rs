//! HTTP client for the Google Sheets values API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the Sheets v4 API
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response body of `spreadsheets.values.get`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(rename = "majorDimension", default)]
    pub major_dimension: Option<String>,
    /// Omitted by the API when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Sheets client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SHEETS_BASE_URL)
    }

    /// Client against a different endpoint root (proxies, test servers)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid sheets base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Sheets base URL cannot carry a path: {}", self.base_url))?
            .extend([spreadsheet_id, "values", range]);
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Fetch the raw cell grid of `range` (usually the form responses tab)
    pub async fn fetch_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        api_key: &str,
    ) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range)?;
        debug!(spreadsheet = spreadsheet_id, range = range, "Fetching sheet values");

        let response = self
            .client
            .get(url)
            .query(&[("key", api_key), ("majorDimension", "ROWS")])
            .send()
            .await
            // The URL carries the API key, keep it out of error messages
            .map_err(|e| ApiError::from(e.without_url()))
            .context("Failed to send sheet values request")?;

        let response = Self::check_response(response).await?;

        let text = response
            .text()
            .await
            .context("Failed to read sheet values response body")?;
        let parsed: ValueRange = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .context("Failed to parse sheet values response")?;

        debug!(rows = parsed.values.len(), "Fetched sheet values");
        Ok(parsed.values)
    }
}

// ============================================================================
// Tests
// ============================================================================
