/*!
 * Query translation for bilingual search.
 *
 * Search queries are expanded into the other language so one query can hit
 * both sides of the corpus. This module is a thin adapter over external
 * translation providers:
 *
 * - `cache`: in-process memoization of translated queries
 * - `service`: the provider chain (primary, fallback, identity)
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::service::QueryTranslationService;

// Submodules
pub mod cache;
pub mod service;
