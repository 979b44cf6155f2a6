/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for all database tables, the FTS5
 * full-text index over quote texts, and the seed data for the word-level
 * translation dictionary. Schema migrations for version upgrades live here
 * too.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Seed rows for the EN/RU word dictionary.
///
/// A starter vocabulary of frequent quote topics; the linker's similarity
/// scoring uses it to map Russian content words into English stem space.
/// Extend it at runtime through the repository.
const WORD_SEED: &[(&str, &str)] = &[
    ("love", "любовь"),
    ("life", "жизнь"),
    ("wisdom", "мудрость"),
    ("death", "смерть"),
    ("hope", "надежда"),
    ("freedom", "свобода"),
    ("truth", "истина"),
    ("beauty", "красота"),
    ("happiness", "счастье"),
    ("sorrow", "печаль"),
    ("time", "время"),
    ("dream", "мечта"),
    ("soul", "душа"),
    ("heart", "сердце"),
    ("mind", "ум"),
    ("word", "слово"),
    ("book", "книга"),
    ("art", "искусство"),
    ("poetry", "поэзия"),
    ("poet", "поэт"),
    ("writer", "писатель"),
    ("author", "автор"),
    ("man", "человек"),
    ("woman", "женщина"),
    ("friend", "друг"),
    ("enemy", "враг"),
    ("war", "война"),
    ("peace", "мир"),
    ("god", "бог"),
    ("faith", "вера"),
    ("nature", "природа"),
    ("sea", "море"),
    ("sky", "небо"),
    ("sun", "солнце"),
    ("moon", "луна"),
    ("star", "звезда"),
    ("night", "ночь"),
    ("day", "день"),
    ("morning", "утро"),
    ("evening", "вечер"),
    ("spring", "весна"),
    ("summer", "лето"),
    ("autumn", "осень"),
    ("winter", "зима"),
    ("work", "работа"),
    ("way", "путь"),
    ("world", "мир"),
    ("knowledge", "знание"),
    ("power", "сила"),
    ("difficulty", "трудность"),
    ("opportunity", "возможность"),
    ("middle", "посреди"),
    ("lie", "лежать"),
    ("great", "великий"),
    ("happy", "счастливый"),
];

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Check current schema version
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        // Fresh database - create all tables
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        seed_word_dictionary(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        // Need to migrate
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    // Check if the schema_version table exists
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // Enable WAL mode for better concurrency and crash recovery
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Enable foreign keys
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    // Create schema version table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Create authors table. Identity key is (name, language): the same
    // person appears once per name language.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            language TEXT NOT NULL,
            bio TEXT,
            created_at TEXT NOT NULL,
            UNIQUE(name, language)
        );

        CREATE INDEX IF NOT EXISTS idx_authors_name ON authors(name);
        "#,
    )?;

    // Create sources table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            language TEXT NOT NULL,
            author_id INTEGER REFERENCES authors(id),
            source_type TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sources_author ON sources(author_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_sources_identity
            ON sources(title, language, ifnull(author_id, 0));
        "#,
    )?;

    // Create quotes table. text_hash is the dedup key over
    // (normalized text, language, author); bilingual_group_id groups
    // cross-language equivalents.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS quotes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            text_hash TEXT NOT NULL,
            language TEXT NOT NULL,
            author_id INTEGER REFERENCES authors(id),
            source_id INTEGER REFERENCES sources(id),
            bilingual_group_id INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_quotes_language ON quotes(language);
        CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author_id, language);
        CREATE INDEX IF NOT EXISTS idx_quotes_group ON quotes(bilingual_group_id);
        CREATE INDEX IF NOT EXISTS idx_quotes_group_language ON quotes(bilingual_group_id, language);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_quotes_dedup
            ON quotes(text_hash, language, ifnull(author_id, 0));
        "#,
    )?;

    // Create quote_translations table. One row per unordered pair: the
    // unique index over (min, max) rejects the reversed duplicate.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS quote_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quote_id INTEGER NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
            translated_quote_id INTEGER NOT NULL REFERENCES quotes(id) ON DELETE CASCADE,
            confidence INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            CHECK (quote_id <> translated_quote_id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_translation_pair
            ON quote_translations(min(quote_id, translated_quote_id), max(quote_id, translated_quote_id));
        CREATE INDEX IF NOT EXISTS idx_translation_quote ON quote_translations(quote_id);
        CREATE INDEX IF NOT EXISTS idx_translation_translated ON quote_translations(translated_quote_id);
        "#,
    )?;

    // Create word_translations dictionary
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS word_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_en TEXT NOT NULL UNIQUE,
            word_ru TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_word_ru ON word_translations(word_ru);
        "#,
    )?;

    // Full-text index over quote texts, kept in sync by triggers
    conn.execute_batch(
        r#"
        CREATE VIRTUAL TABLE IF NOT EXISTS quotes_fts USING fts5(
            text,
            content='quotes',
            content_rowid='id'
        );

        CREATE TRIGGER IF NOT EXISTS quotes_fts_insert AFTER INSERT ON quotes BEGIN
            INSERT INTO quotes_fts(rowid, text) VALUES (new.id, new.text);
        END;

        CREATE TRIGGER IF NOT EXISTS quotes_fts_delete AFTER DELETE ON quotes BEGIN
            INSERT INTO quotes_fts(quotes_fts, rowid, text) VALUES ('delete', old.id, old.text);
        END;

        CREATE TRIGGER IF NOT EXISTS quotes_fts_update AFTER UPDATE OF text ON quotes BEGIN
            INSERT INTO quotes_fts(quotes_fts, rowid, text) VALUES ('delete', old.id, old.text);
            INSERT INTO quotes_fts(rowid, text) VALUES (new.id, new.text);
        END;
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}

/// Load the starter word dictionary into a fresh database
fn seed_word_dictionary(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO word_translations (word_en, word_ru, created_at) VALUES (?1, ?2, datetime('now'))",
    )?;
    for (en, ru) in WORD_SEED {
        stmt.execute([en, ru])?;
    }
    debug!("Seeded {} word translations", WORD_SEED.len());
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < SCHEMA_VERSION {
        match current {
            // Add migration steps here as schema evolves
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown schema version: {}. Cannot migrate.",
                    current
                ));
            }
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}

/// Drop all tables (for testing purposes only)
#[cfg(test)]
pub fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS quotes_fts;
        DROP TABLE IF EXISTS quote_translations;
        DROP TABLE IF EXISTS word_translations;
        DROP TABLE IF EXISTS quotes;
        DROP TABLE IF EXISTS sources;
        DROP TABLE IF EXISTS authors;
        DROP TABLE IF EXISTS schema_version;
        "#,
    )?;
    Ok(())
}
