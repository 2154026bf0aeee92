//! HTTP client for the analysis service

use super::source::AnalysisSource;
use crate::config::RunnerConfig;
use crate::error::{AnalysisError, Result};
use crate::types::AnalysisResponse;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Analysis service client
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    service_url: String,
    timeout: Duration,
}

impl HttpAnalysisClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            service_url: config.service_url.clone(),
            timeout: config.request_timeout,
        })
    }

    /// Endpoint this client queries
    pub fn service_url(&self) -> &str {
        &self.service_url
    }
}

#[async_trait]
impl AnalysisSource for HttpAnalysisClient {
    async fn fetch(&self, symbol: &str) -> Result<AnalysisResponse> {
        let response = self
            .client
            .get(&self.service_url)
            .query(&[("tickers", symbol)])
            .send()
            .await
            .map_err(|e| AnalysisError::from_request(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::HttpStatus { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::from_request(e, self.timeout))?;

        let parsed: AnalysisResponse = serde_json::from_str(&body)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
