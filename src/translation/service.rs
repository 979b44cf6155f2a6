/*!
 * The query translation service.
 *
 * Tries the primary provider, then the fallback, each under a bounded
 * timeout; when everything fails the query comes back unchanged. Callers
 * never handle translation failure - a degraded search is still a search.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::app_config::{TranslationConfig, TranslationProviderKind};
use crate::errors::ProviderError;
use crate::language::Lang;
use crate::providers::TranslationProvider;
use crate::providers::libretranslate::LibreTranslate;
use crate::providers::mymemory::MyMemory;
use crate::translation::cache::TranslationCache;

/// Expands queries into the other language via external providers
#[derive(Clone)]
pub struct QueryTranslationService {
    /// First provider tried
    primary: Arc<dyn TranslationProvider>,
    /// Second chance when the primary fails
    fallback: Option<Arc<dyn TranslationProvider>>,
    /// Session-scoped memoization
    cache: TranslationCache,
    /// Ceiling for one provider call, retries included
    timeout: Duration,
}

impl QueryTranslationService {
    /// Create a service from explicit providers (used by tests)
    pub fn new(
        primary: Arc<dyn TranslationProvider>,
        fallback: Option<Arc<dyn TranslationProvider>>,
        cache_enabled: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            cache: TranslationCache::new(cache_enabled),
            timeout,
        }
    }

    /// Build the provider chain described by the configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        let primary = Self::build_provider(config.provider, config);
        let fallback = config
            .fallback_provider
            .filter(|kind| *kind != config.provider)
            .map(|kind| Self::build_provider(kind, config));

        Self {
            primary,
            fallback,
            cache: TranslationCache::new(config.cache_enabled),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
        }
    }

    fn build_provider(
        kind: TranslationProviderKind,
        config: &TranslationConfig,
    ) -> Arc<dyn TranslationProvider> {
        match kind {
            TranslationProviderKind::LibreTranslate => Arc::new(LibreTranslate::new(
                config.libretranslate_endpoint.clone(),
                config.libretranslate_api_key.clone(),
                config.timeout_secs,
                config.retry_count,
                config.retry_backoff_ms,
            )),
            TranslationProviderKind::MyMemory => Arc::new(MyMemory::new(
                config.mymemory_endpoint.clone(),
                config.timeout_secs,
                config.retry_count,
                config.retry_backoff_ms,
            )),
        }
    }

    /// Translate a query into the other indexed language.
    ///
    /// Never fails: provider errors fall through the chain and end in the
    /// identity translation. Successful translations are memoized per
    /// (text, source language).
    pub async fn translate(&self, text: &str, source: Lang) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return text.to_string();
        }

        if let Some(cached) = self.cache.get(trimmed, source) {
            return cached;
        }

        let target = source.opposite();

        match self.call_provider(&self.primary, trimmed, source, target).await {
            Ok(translated) => {
                self.cache.store(trimmed, source, &translated);
                return translated;
            }
            Err(e) => {
                warn!("Primary provider {} failed: {}", self.primary.name(), e);
            }
        }

        if let Some(fallback) = &self.fallback {
            match self.call_provider(fallback, trimmed, source, target).await {
                Ok(translated) => {
                    self.cache.store(trimmed, source, &translated);
                    return translated;
                }
                Err(e) => {
                    warn!("Fallback provider {} failed: {}", fallback.name(), e);
                }
            }
        }

        // Both providers down: searching with the untranslated query still
        // returns the direct-language results
        debug!("Translation degraded to identity for '{}'", trimmed);
        text.to_string()
    }

    /// Access to the memoization cache (stats, clearing)
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    async fn call_provider(
        &self,
        provider: &Arc<dyn TranslationProvider>,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, provider.translate(text, source, target)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Unavailable(format!(
                "{} timed out after {:?}",
                provider.name(),
                self.timeout
            ))),
        }
    }
}
