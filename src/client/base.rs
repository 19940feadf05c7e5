//! Shared HTTP plumbing for provider adapters.

use serde::Deserialize;

use super::DEFAULT_TIMEOUT;
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

pub(crate) fn default_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(Error::Network)
}

pub(crate) struct RequestExecutor;

impl RequestExecutor {
    pub async fn post_json(
        req: reqwest::RequestBuilder,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let response = req
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(std::time::Duration::from_secs);
            return Err(Error::RateLimit { retry_after });
        }

        let text = response.text().await.unwrap_or_default();
        let (message, error_type) = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => (envelope.error.message, envelope.error.error_type),
            Err(_) => (text, None),
        };

        Err(Error::Api {
            message,
            status: Some(status.as_u16()),
            error_type,
        })
    }
}
