use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language::Lang;
use crate::providers::TranslationProvider;

/// Client for a LibreTranslate server
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Server base URL
    endpoint: String,
    /// API key, empty when the instance is open
    api_key: String,
    /// Attempts beyond the first request
    retry_count: u32,
    /// Pause between attempts
    retry_backoff_ms: u64,
}

/// LibreTranslate request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Text to translate
    q: &'a str,
    /// Source language code
    source: &'a str,
    /// Target language code
    target: &'a str,
    /// Response format
    format: &'a str,
    /// API key, omitted when empty
    #[serde(skip_serializing_if = "str::is_empty")]
    api_key: &'a str,
}

/// LibreTranslate response body
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// The translated text
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslate {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
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
            api_key: api_key.into(),
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
        let api_url = format!("{}/translate", self.endpoint.trim_end_matches('/'));

        let body = TranslateRequest {
            q: text,
            source: source.as_str(),
            target: target.as_str(),
            format: "text",
            api_key: &self.api_key,
        };

        let response = self
            .client
            .post(&api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
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
            error!("LibreTranslate API error ({}): {}", status, message);
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimitExceeded(message));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(parsed.translated_text)
    }

    /// Whether an attempt is worth repeating
    fn is_retryable(error: &ProviderError) -> bool {
        match error {
            ProviderError::Unavailable(_)
            | ProviderError::RequestFailed(_)
            | ProviderError::RateLimitExceeded(_) => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            ProviderError::ParseError(_) => false,
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslate {
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
                    "LibreTranslate retry {}/{} after {}ms",
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
        "libretranslate"
    }
}
