use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::errors::ProviderError;
use crate::language::Lang;
use crate::providers::TranslationProvider;

/// Client for the public MyMemory translation API
#[derive(Debug, Clone)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Attempts beyond the first request
    retry_count: u32,
    /// Pause between attempts
    retry_backoff_ms: u64,
}

/// MyMemory response envelope
#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    /// Payload with the best match
    #[serde(rename = "responseData")]
    response_data: ResponseData,
    /// HTTP-like status code inside the body
    #[serde(rename = "responseStatus")]
    response_status: serde_json::Value,
}

/// Best-match payload
#[derive(Debug, Deserialize)]
struct ResponseData {
    /// The translated text
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl MyMemory {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        timeout_secs: u64,
        retry_count: u32,
        retry_backoff_ms: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            retry_count,
            retry_backoff_ms,
        }
    }

    async fn request_once(
        &self,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, ProviderError> {
        let base = format!("{}/get", self.endpoint.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &base,
            &[
                ("q", text),
                ("langpair", &format!("{}|{}", source.as_str(), target.as_str())),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::Unavailable(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("MyMemory API error ({}): {}", status, message);
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimitExceeded(message));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<MyMemoryResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        // MyMemory reports errors inside a 200 body; the status field is a
        // number on success and a quota message string on failure
        match parsed.response_status.as_i64() {
            Some(200) => Ok(parsed.response_data.translated_text),
            Some(code) => Err(ProviderError::ApiError {
                status_code: code.clamp(0, u16::MAX as i64) as u16,
                message: parsed.response_data.translated_text,
            }),
            None => Err(ProviderError::RateLimitExceeded(
                parsed.response_status.to_string(),
            )),
        }
    }

    /// Whether an attempt is worth repeating
    fn is_retryable(error: &ProviderError) -> bool {
        match error {
            ProviderError::Unavailable(_) | ProviderError::RequestFailed(_) => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            ProviderError::RateLimitExceeded(_) | ProviderError::ParseError(_) => false,
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemory {
    async fn translate(
        &self,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, ProviderError> {
        let mut last_error = None;

        for attempt in 0..=self.retry_count {
            if attempt > 0 {
                debug!(
                    "MyMemory retry {}/{} after {}ms",
                    attempt, self.retry_count, self.retry_backoff_ms
                );
                tokio::time::sleep(Duration::from_millis(self.retry_backoff_ms)).await;
            }

            match self.request_once(text, source, target).await {
                Ok(translated) => return Ok(translated),
                Err(e) if Self::is_retryable(&e) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Unavailable("no attempt was made".to_string())))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.request_once("hello", Lang::En, Lang::Ru).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mymemory"
    }
}
