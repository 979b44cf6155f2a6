/*!
 * # Aphorium - Bilingual Aphorism Index
 *
 * A Rust library for indexing short attributed texts in English and Russian
 * and searching them across the language gap.
 *
 * ## Features
 *
 * - Classify raw scraped fragments as genuine quotes versus citation noise
 * - Link quotes that express the same aphorism across languages
 * - Full-text search in either language with cross-language query expansion
 * - Results paired with their known translation, ranked deterministically
 * - SQLite persistence with FTS5 ranking
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `validator`: Quote/noise classification of scraped fragments
 * - `store`: Persistence for authors, sources, quotes and links:
 *   - `store::connection`: SQLite connection handling
 *   - `store::repository`: Typed store operations
 * - `linker`: Cross-language equivalence discovery:
 *   - `linker::union_find`: Equivalence classes over quote ids
 *   - `linker::similarity`: Content-word overlap scoring
 * - `translation`: Query translation with provider fallback and caching
 * - `providers`: Client implementations for translation services:
 *   - `providers::libretranslate`: LibreTranslate API client
 *   - `providers::mymemory`: MyMemory API client
 * - `search`: Per-language search and bilingual pair ranking
 * - `app_controller`: Main application controller
 * - `language`: The two-language model and detection
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language;
pub mod linker;
pub mod providers;
pub mod search;
pub mod store;
pub mod text_utils;
pub mod translation;
pub mod validator;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError, StorageError};
pub use language::{Lang, LanguageFilter};
pub use linker::BilingualLinker;
pub use search::{BilingualPair, SearchRanker};
pub use store::Repository;
pub use translation::QueryTranslationService;
pub use validator::{QuoteValidator, Verdict};
