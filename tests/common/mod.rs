/*!
 * Common test utilities for the aphorium test suite
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use aphorium::app_config::Config;
use aphorium::providers::mock::MockProvider;
use aphorium::search::SearchRanker;
use aphorium::store::Repository;
use aphorium::translation::QueryTranslationService;

/// Initialize test logging once; RUST_LOG controls verbosity
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A configuration suitable for tests: no provider retries, no fallback,
/// endpoints that fail fast
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.retry_count = 0;
    config.translation.retry_backoff_ms = 1;
    config.translation.timeout_secs = 1;
    config.translation.fallback_provider = None;
    config
}

/// Translation service backed by an explicit mock provider
pub fn mock_translator(primary: MockProvider) -> QueryTranslationService {
    QueryTranslationService::new(Arc::new(primary), None, true, Duration::from_millis(500))
}

/// Translation service with a primary and a fallback mock
pub fn mock_translator_with_fallback(
    primary: MockProvider,
    fallback: MockProvider,
) -> QueryTranslationService {
    QueryTranslationService::new(
        Arc::new(primary),
        Some(Arc::new(fallback)),
        true,
        Duration::from_millis(500),
    )
}

/// Search ranker over the given repository using the mock dictionary
/// translator
pub fn ranker_over(repo: Repository, primary: MockProvider) -> SearchRanker {
    SearchRanker::new(repo, mock_translator(primary), test_config().search)
}
