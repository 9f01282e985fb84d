//! Comtrade HTTP client.

use crate::config::ComtradeConfig;
use async_trait::async_trait;
use cbam_core::{Error, RawTradeRecord, Result, TradeQuery, TradeSource};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

/// Header carrying the Comtrade subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Body of a Comtrade `get` response; only `data` is used.
#[derive(Debug, Deserialize)]
struct ComtradeResponse {
    #[serde(default)]
    data: Option<Vec<RawTradeRecord>>,
}

/// Client for the Comtrade `get` endpoint.
#[derive(Debug, Clone)]
pub struct ComtradeClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ComtradeClient {
    /// Create a client with a default `reqwest::Client`.
    pub fn new(config: &ComtradeConfig) -> Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: &ComtradeConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::config(format!("invalid Comtrade base URL '{}': {e}", config.base_url))
        })?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Whether a subscription key will be sent.
    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full request URL for `query`.
    pub fn request_url(&self, query: &TradeQuery) -> Result<Url> {
        Url::parse_with_params(self.base_url.as_str(), query.params())
            .map_err(|e| Error::config(format!("could not build request URL: {e}")))
    }

    /// Fetch the raw records for `query`.
    pub async fn fetch_records(&self, query: &TradeQuery) -> Result<Vec<RawTradeRecord>> {
        let url = self.request_url(query)?;
        tracing::debug!(url = %url, "Requesting trade data");

        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport_with_source("Comtrade request failed", e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(|e| {
                Error::transport_with_source("could not read Comtrade error body", e)
            })?;
            tracing::warn!(status = status.as_u16(), "Comtrade rejected request");
            return Err(Error::upstream(status.as_u16(), body));
        }

        let payload: ComtradeResponse = response
            .json()
            .await
            .map_err(|e| Error::transport_with_source("could not decode Comtrade response", e))?;

        let records = payload.data.unwrap_or_default();
        tracing::debug!(records = records.len(), "Trade data received");
        if records.is_empty() {
            return Err(Error::NoData);
        }
        Ok(records)
    }
}

#[async_trait]
impl TradeSource for ComtradeClient {
    async fn fetch(&self, query: &TradeQuery) -> Result<Vec<RawTradeRecord>> {
        self.fetch_records(query).await
    }
}
