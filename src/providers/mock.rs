/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Translates word-by-word from a fixed dictionary
 * - `MockProvider::failing()` - Always fails as unavailable
 * - `MockProvider::slow(ms)` - Delays before answering (for timeout testing)
 * - `MockProvider::intermittent(n)` - Fails every nth request
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::language::Lang;
use crate::providers::TranslationProvider;

/// Fixed word dictionary used by the working mock, (english, russian)
const MOCK_DICTIONARY: &[(&str, &str)] = &[
    ("love", "любовь"),
    ("life", "жизнь"),
    ("wisdom", "мудрость"),
    ("death", "смерть"),
    ("hope", "надежда"),
    ("freedom", "свобода"),
    ("truth", "истина"),
    ("happiness", "счастье"),
    ("time", "время"),
    ("war", "война"),
    ("peace", "мир"),
    ("work", "работа"),
];

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Translates word-by-word from the fixed dictionary
    Working,
    /// Fails intermittently (every nth request)
    Intermittent {
        /// Every nth request fails
        fail_every: usize,
    },
    /// Always fails as unavailable
    Failing,
    /// Delays before answering (for timeout testing)
    Slow {
        /// Delay before the response
        delay_ms: u64,
    },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Requests seen so far
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a slow mock provider
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of translate calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Handle to the request counter, usable after the provider is boxed
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.request_count.clone()
    }

    /// Word-by-word dictionary translation; unknown words pass through
    fn dictionary_translate(text: &str, target: Lang) -> String {
        text.split_whitespace()
            .map(|word| {
                let bare: String = word
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
                    .to_lowercase();
                let hit = MOCK_DICTIONARY.iter().find_map(|(en, ru)| match target {
                    Lang::Ru if *en == bare => Some(*ru),
                    Lang::En if *ru == bare => Some(*en),
                    _ => None,
                });
                hit.unwrap_or(word).to_string()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        _source: Lang,
        target: Lang,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(Self::dictionary_translate(text, target)),
            MockBehavior::Failing => Err(ProviderError::Unavailable(
                "mock provider is configured to fail".to_string(),
            )),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!(
                        "mock intermittent failure on request {}",
                        count
                    )))
                } else {
                    Ok(Self::dictionary_translate(text, target))
                }
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::dictionary_translate(text, target))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::Unavailable(
                "mock provider is configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
