use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Every component receives
/// its section at construction time; nothing reads configuration from
/// global state.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Path to the SQLite database file; defaults to the platform data dir
    #[serde(default)]
    pub database_path: Option<String>,

    /// Quote validator thresholds
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Bilingual linker thresholds and parallelism
    #[serde(default)]
    pub linker: LinkerConfig,

    /// Search and ranking limits
    #[serde(default)]
    pub search: SearchConfig,

    /// Query translation provider settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level used by the stderr logger
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProviderKind {
    /// Self-hosted LibreTranslate instance
    #[default]
    LibreTranslate,
    /// Public MyMemory translation API
    MyMemory,
}

impl TranslationProviderKind {
    /// Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::LibreTranslate => "LibreTranslate",
            Self::MyMemory => "MyMemory",
        }
    }
}

impl std::fmt::Display for TranslationProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LibreTranslate => write!(f, "libretranslate"),
            Self::MyMemory => write!(f, "mymemory"),
        }
    }
}

impl std::str::FromStr for TranslationProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libretranslate" => Ok(Self::LibreTranslate),
            "mymemory" => Ok(Self::MyMemory),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Quote validator thresholds
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidatorConfig {
    /// Minimum trimmed length for any quote
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Unterminated text shorter than this is rejected
    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: usize,

    /// Below this length a borderline text needs a positive indicator
    #[serde(default = "default_borderline_length")]
    pub borderline_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            secondary_threshold: default_secondary_threshold(),
            borderline_length: default_borderline_length(),
        }
    }
}

/// Bilingual linker thresholds and parallelism
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinkerConfig {
    /// Minimum shared content-word stems for a candidate pair
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,

    /// Alternative acceptance cutoff on the normalized overlap ratio
    #[serde(default = "default_min_ratio")]
    pub min_ratio: f64,

    /// Minimum confidence (0-100) to persist a link
    #[serde(default = "default_min_confidence")]
    pub min_confidence: u8,

    /// Number of authors linked concurrently
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
            min_ratio: default_min_ratio(),
            min_confidence: default_min_confidence(),
            worker_count: default_worker_count(),
        }
    }
}

/// Search and ranking limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Result limit applied when the caller does not pass one
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,

    /// Hard ceiling on the caller-supplied limit
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Timeout for each per-language full-text query
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_max_limit(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

/// Query translation provider settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Primary provider
    #[serde(default)]
    pub provider: TranslationProviderKind,

    /// Fallback provider tried when the primary fails
    #[serde(default = "default_fallback_provider")]
    pub fallback_provider: Option<TranslationProviderKind>,

    /// LibreTranslate endpoint URL
    #[serde(default = "default_libretranslate_endpoint")]
    pub libretranslate_endpoint: String,

    /// LibreTranslate API key, if the instance requires one
    #[serde(default = "String::new")]
    pub libretranslate_api_key: String,

    /// MyMemory endpoint URL
    #[serde(default = "default_mymemory_endpoint")]
    pub mymemory_endpoint: String,

    /// Timeout for a single provider call
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries per provider before falling through
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff between retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Whether to memoize translated queries in-process
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProviderKind::default(),
            fallback_provider: default_fallback_provider(),
            libretranslate_endpoint: default_libretranslate_endpoint(),
            libretranslate_api_key: String::new(),
            mymemory_endpoint: default_mymemory_endpoint(),
            timeout_secs: default_translation_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            cache_enabled: default_cache_enabled(),
        }
    }
}

fn default_min_length() -> usize { 30 }
fn default_secondary_threshold() -> usize { 150 }
fn default_borderline_length() -> usize { 60 }
fn default_min_overlap() -> usize { 4 }
fn default_min_ratio() -> f64 { 0.5 }
fn default_min_confidence() -> u8 { 50 }
fn default_worker_count() -> usize { 4 }
fn default_search_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }
fn default_query_timeout_ms() -> u64 { 2000 }
fn default_fallback_provider() -> Option<TranslationProviderKind> {
    Some(TranslationProviderKind::MyMemory)
}
fn default_libretranslate_endpoint() -> String {
    "http://localhost:5000".to_string()
}
fn default_mymemory_endpoint() -> String {
    "https://api.mymemory.translated.net".to_string()
}
fn default_translation_timeout_secs() -> u64 { 5 }
fn default_retry_count() -> u32 { 2 }
fn default_retry_backoff_ms() -> u64 { 500 }
fn default_cache_enabled() -> bool { true }

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If the file does not exist, a default configuration is written there
    /// first so the user has something to edit.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.validator.min_length == 0 {
            return Err(anyhow!("validator.min_length must be greater than zero"));
        }
        if self.validator.secondary_threshold < self.validator.min_length {
            return Err(anyhow!(
                "validator.secondary_threshold must be at least validator.min_length"
            ));
        }
        if self.linker.worker_count == 0 {
            return Err(anyhow!("linker.worker_count must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.linker.min_ratio) {
            return Err(anyhow!("linker.min_ratio must be between 0.0 and 1.0"));
        }
        if self.linker.min_confidence > 100 {
            return Err(anyhow!("linker.min_confidence must be between 0 and 100"));
        }
        if self.search.max_limit == 0 || self.search.default_limit == 0 {
            return Err(anyhow!("search limits must be greater than zero"));
        }
        if self.search.default_limit > self.search.max_limit {
            return Err(anyhow!("search.default_limit must not exceed search.max_limit"));
        }
        if self.translation.provider == TranslationProviderKind::LibreTranslate
            && self.translation.libretranslate_endpoint.is_empty()
        {
            return Err(anyhow!("libretranslate endpoint must not be empty"));
        }
        Ok(())
    }
}
