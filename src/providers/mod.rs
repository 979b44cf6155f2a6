/*!
 * Provider implementations for query translation.
 *
 * This module contains client implementations for the external translation
 * services the search path can expand queries with:
 * - LibreTranslate: self-hosted translation server
 * - MyMemory: public translation memory API
 * - Mock: configurable in-process provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::language::Lang;

/// Common trait for all translation providers
///
/// This trait defines the interface every provider implements, allowing the
/// query translation service to chain them interchangeably.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate a text between the two indexed languages
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source` - Language of `text`
    /// * `target` - Language to translate into
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for log lines
    fn name(&self) -> &'static str;
}

pub mod libretranslate;
pub mod mymemory;
pub mod mock;
