/*!
 * Quote store: SQLite-backed persistence for the bilingual corpus.
 *
 * This module provides storage for:
 * - Authors, sources and quotes in both languages
 * - Translation links and bilingual group membership
 * - A word-level EN/RU dictionary used by the linker's similarity scoring
 * - Full-text search over quote texts (FTS5, bm25 ranking)
 */

// Allow dead code and unused imports - store types are for library consumers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
