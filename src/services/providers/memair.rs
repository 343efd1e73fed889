/// Memair history provider
///
/// Memair is a GraphQL personal-data service; watched videos show up there as
/// `Recommendations` entries carrying the original video URL.
///
/// API Flow:
/// 1. History: `query { Recommendations(type: video, ...) { url } }`
/// 2. Teardown: `mutation {RevokeAccessToken{revoked}}`
///
/// The client is stateless. The user's access token is supplied per call and
/// travels in the `Authorization` header.
use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{HistoryEntry, HistoryProvider},
};

pub struct MemairClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl MemairClient {
    /// Creates a new Memair client
    ///
    /// Every request is bounded by `timeout`; requests are never retried, so
    /// a timeout surfaces to the caller as an external service error.
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Posts a GraphQL document and returns the raw response body
    async fn query(&self, access_token: &str, query: String) -> AppResult<serde_json::Value> {
        let response = self
            .http_client
            .post(&self.api_url)
            .header("Authorization", access_token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Memair request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Memair request failed");
            return Err(AppError::ExternalService(format!(
                "Memair returned status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid Memair response: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    data: Option<HistoryData>,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    #[serde(rename = "Recommendations")]
    recommendations: Option<Vec<HistoryEntry>>,
}

/// Extracts history entries from a Memair response body
///
/// A response without the expected `data.Recommendations` structure is a hard
/// error, not an empty history.
fn parse_history_response(body: serde_json::Value) -> AppResult<Vec<HistoryEntry>> {
    let response: HistoryResponse = serde_json::from_value(body)
        .map_err(|e| AppError::ExternalService(format!("Invalid Memair response: {}", e)))?;

    response
        .data
        .and_then(|data| data.recommendations)
        .ok_or_else(|| {
            AppError::ExternalService("Memair response missing Recommendations data".to_string())
        })
}

#[async_trait::async_trait]
impl HistoryProvider for MemairClient {
    async fn recent_watched(&self, access_token: &str, limit: u32) -> AppResult<Vec<HistoryEntry>> {
        let query = format!(
            "query {{ Recommendations(type: video, order: desc, order_by: timestamp, first: {}) {{ url }} }}",
            limit
        );

        let body = self.query(access_token, query).await?;
        let entries = parse_history_response(body)?;

        tracing::debug!(
            entries = entries.len(),
            provider = "memair",
            "Watch history fetched"
        );

        Ok(entries)
    }

    async fn revoke_token(&self, access_token: &str) -> AppResult<()> {
        self.query(
            access_token,
            "mutation {RevokeAccessToken{revoked}}".to_string(),
        )
        .await?;

        tracing::info!(provider = "memair", "Access token revoked");

        Ok(())
    }
}
