/*!
 * Repository layer for store operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access. All
 * methods surface `StorageError`; callers decide whether a failure is
 * fatal for their operation.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use super::connection::{DatabaseConnection, DatabaseStats};
use super::models::{Author, Quote, Source, SourceType, TranslationLink};
use crate::errors::StorageError;
use crate::language::Lang;
use crate::text_utils::normalize_text;

/// A translation link the linker wants persisted
#[derive(Debug, Clone)]
pub struct NewLink {
    /// One side of the pair
    pub quote_id: i64,
    /// The other side of the pair
    pub translated_quote_id: i64,
    /// Matching confidence, 0-100
    pub confidence: u8,
}

/// One equivalence class the linker wants a group id applied to
#[derive(Debug, Clone)]
pub struct GroupAssignment {
    /// Reuse this id when set; allocate a fresh one otherwise
    pub group_id: Option<i64>,
    /// Quote ids belonging to the class
    pub members: Vec<i64>,
}

/// Outcome of one transactional link batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBatchResult {
    /// Translation link rows actually inserted
    pub links_created: usize,
    /// Quotes that received a bilingual_group_id
    pub groups_assigned: usize,
}

/// Repository for store operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self, StorageError> {
        let db = DatabaseConnection::new_default().map_err(StorageError::from_db)?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let db = DatabaseConnection::new_in_memory().map_err(StorageError::from_db)?;
        Ok(Self::new(db))
    }

    /// Store-wide statistics
    pub fn stats(&self) -> Result<DatabaseStats, StorageError> {
        self.db.stats().map_err(StorageError::from_db)
    }

    // =========================================================================
    // Author Operations
    // =========================================================================

    /// Get an author by (name, language), creating the row if missing
    pub async fn get_or_create_author(
        &self,
        name: &str,
        language: Lang,
        bio: Option<&str>,
    ) -> Result<Author, StorageError> {
        let name = name.trim().to_string();
        let bio = bio.map(|b| b.to_string());

        self.db
            .execute_async(move |conn| {
                if let Some(author) = Self::author_by_name_sync(conn, &name, language)? {
                    return Ok(author);
                }

                conn.execute(
                    "INSERT INTO authors (name, language, bio, created_at) VALUES (?1, ?2, ?3, ?4)",
                    params![name, language.as_str(), bio, now()],
                )?;
                let id = conn.last_insert_rowid();

                Self::author_by_id_sync(conn, id)?
                    .ok_or_else(|| anyhow::anyhow!("Author row vanished after insert"))
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Get an author by ID
    pub async fn get_author(&self, author_id: i64) -> Result<Option<Author>, StorageError> {
        self.db
            .execute_async(move |conn| Self::author_by_id_sync(conn, author_id))
            .await
            .map_err(StorageError::from_db)
    }

    /// All author rows sharing a name, in either language
    pub async fn find_authors_by_name(&self, name: &str) -> Result<Vec<Author>, StorageError> {
        let name = name.trim().to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, language, bio, created_at FROM authors WHERE name = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([&name], Self::map_author)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Ids of authors that have quotes in both languages
    pub async fn authors_in_both_languages(&self) -> Result<Vec<i64>, StorageError> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT author_id FROM quotes
                    WHERE author_id IS NOT NULL
                    GROUP BY author_id
                    HAVING COUNT(DISTINCT language) >= 2
                    ORDER BY author_id
                    "#,
                )?;
                let ids = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<i64>>>()?;
                Ok(ids)
            })
            .await
            .map_err(StorageError::from_db)
    }

    fn author_by_name_sync(
        conn: &Connection,
        name: &str,
        language: Lang,
    ) -> Result<Option<Author>> {
        let author = conn
            .query_row(
                "SELECT id, name, language, bio, created_at FROM authors WHERE name = ?1 AND language = ?2",
                params![name, language.as_str()],
                Self::map_author,
            )
            .optional()?;
        Ok(author)
    }

    fn author_by_id_sync(conn: &Connection, author_id: i64) -> Result<Option<Author>> {
        let author = conn
            .query_row(
                "SELECT id, name, language, bio, created_at FROM authors WHERE id = ?1",
                [author_id],
                Self::map_author,
            )
            .optional()?;
        Ok(author)
    }

    fn map_author(row: &rusqlite::Row) -> rusqlite::Result<Author> {
        Ok(Author {
            id: row.get(0)?,
            name: row.get(1)?,
            language: row.get::<_, String>(2)?.parse().unwrap_or(Lang::En),
            bio: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    // =========================================================================
    // Source Operations
    // =========================================================================

    /// Get a source by (title, language, author), creating the row if missing
    pub async fn get_or_create_source(
        &self,
        title: &str,
        language: Lang,
        author_id: Option<i64>,
        source_type: Option<SourceType>,
    ) -> Result<Source, StorageError> {
        let title = title.trim().to_string();

        self.db
            .execute_async(move |conn| {
                let existing = conn
                    .query_row(
                        "SELECT id, title, language, author_id, source_type, created_at
                         FROM sources
                         WHERE title = ?1 AND language = ?2 AND ifnull(author_id, 0) = ?3",
                        params![title, language.as_str(), author_id.unwrap_or(0)],
                        Self::map_source,
                    )
                    .optional()?;

                if let Some(source) = existing {
                    return Ok(source);
                }

                conn.execute(
                    "INSERT INTO sources (title, language, author_id, source_type, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        title,
                        language.as_str(),
                        author_id,
                        source_type.map(|t| t.to_string()),
                        now()
                    ],
                )?;
                let id = conn.last_insert_rowid();

                conn.query_row(
                    "SELECT id, title, language, author_id, source_type, created_at FROM sources WHERE id = ?1",
                    [id],
                    Self::map_source,
                )
                .map_err(Into::into)
            })
            .await
            .map_err(StorageError::from_db)
    }

    fn map_source(row: &rusqlite::Row) -> rusqlite::Result<Source> {
        Ok(Source {
            id: row.get(0)?,
            title: row.get(1)?,
            language: row.get::<_, String>(2)?.parse().unwrap_or(Lang::En),
            author_id: row.get(3)?,
            source_type: row
                .get::<_, Option<String>>(4)?
                .and_then(|t| t.parse().ok()),
            created_at: row.get(5)?,
        })
    }

    // =========================================================================
    // Quote Operations
    // =========================================================================

    /// Create a quote, or return the existing row for an exact duplicate.
    ///
    /// The dedup key is (normalized text, language, author). The boolean in
    /// the result is true when a new row was inserted.
    pub async fn create_quote(
        &self,
        text: &str,
        language: Lang,
        author_id: Option<i64>,
        source_id: Option<i64>,
    ) -> Result<(Quote, bool), StorageError> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return Err(StorageError::Query("Quote text must not be empty".into()));
        }
        let hash = dedup_hash(&normalized, language, author_id);

        self.db
            .execute_async(move |conn| {
                let existing = conn
                    .query_row(
                        &format!("{} WHERE text_hash = ?1 AND language = ?2 AND ifnull(author_id, 0) = ?3", SELECT_QUOTE),
                        params![hash, language.as_str(), author_id.unwrap_or(0)],
                        Self::map_quote,
                    )
                    .optional()?;

                if let Some(quote) = existing {
                    debug!("Duplicate quote resolved to existing row {}", quote.id);
                    return Ok((quote, false));
                }

                conn.execute(
                    "INSERT INTO quotes (text, text_hash, language, author_id, source_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![normalized, hash, language.as_str(), author_id, source_id, now()],
                )?;
                let id = conn.last_insert_rowid();

                let quote = Self::quote_by_id_sync(conn, id)?
                    .ok_or_else(|| anyhow::anyhow!("Quote row vanished after insert"))?;
                Ok((quote, true))
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Get a quote by ID
    pub async fn get_quote(&self, quote_id: i64) -> Result<Option<Quote>, StorageError> {
        self.db
            .execute_async(move |conn| Self::quote_by_id_sync(conn, quote_id))
            .await
            .map_err(StorageError::from_db)
    }

    /// All quotes belonging to a bilingual group, ordered by id
    pub async fn quotes_by_group(&self, group_id: i64) -> Result<Vec<Quote>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE bilingual_group_id = ?1 ORDER BY id",
                    SELECT_QUOTE
                ))?;
                let rows = stmt
                    .query_map([group_id], Self::map_quote)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// All quotes by one author in one language, ordered by id
    pub async fn quotes_for_author(
        &self,
        author_id: i64,
        language: Lang,
    ) -> Result<Vec<Quote>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE author_id = ?1 AND language = ?2 ORDER BY id",
                    SELECT_QUOTE
                ))?;
                let rows = stmt
                    .query_map(params![author_id, language.as_str()], Self::map_quote)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Every quote in the store, ordered by id (used by the cleanup pass)
    pub async fn all_quotes(&self) -> Result<Vec<Quote>, StorageError> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_QUOTE))?;
                let rows = stmt
                    .query_map([], Self::map_quote)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Rewrite a quote's text (citation-suffix cleanup). The dedup hash is
    /// recomputed; the FTS index follows via triggers.
    pub async fn update_quote_text(
        &self,
        quote_id: i64,
        new_text: &str,
    ) -> Result<(), StorageError> {
        let normalized = normalize_text(new_text);
        if normalized.is_empty() {
            return Err(StorageError::Query("Quote text must not be empty".into()));
        }

        self.db
            .execute_async(move |conn| {
                let quote = Self::quote_by_id_sync(conn, quote_id)?
                    .ok_or_else(|| anyhow::anyhow!("No quote with id {}", quote_id))?;

                let hash = dedup_hash(&normalized, quote.language, quote.author_id);
                conn.execute(
                    "UPDATE quotes SET text = ?1, text_hash = ?2 WHERE id = ?3",
                    params![normalized, hash, quote_id],
                )?;
                Ok(())
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Delete a quote. Translation links referencing it go with it.
    pub async fn delete_quote(&self, quote_id: i64) -> Result<(), StorageError> {
        self.db
            .execute_async(move |conn| {
                conn.execute("DELETE FROM quotes WHERE id = ?1", [quote_id])?;
                Ok(())
            })
            .await
            .map_err(StorageError::from_db)
    }

    fn quote_by_id_sync(conn: &Connection, quote_id: i64) -> Result<Option<Quote>> {
        let quote = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_QUOTE),
                [quote_id],
                Self::map_quote,
            )
            .optional()?;
        Ok(quote)
    }

    fn map_quote(row: &rusqlite::Row) -> rusqlite::Result<Quote> {
        Ok(Quote {
            id: row.get(0)?,
            text: row.get(1)?,
            language: row.get::<_, String>(2)?.parse().unwrap_or(Lang::En),
            author_id: row.get(3)?,
            source_id: row.get(4)?,
            bilingual_group_id: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    // =========================================================================
    // Full-Text Search
    // =========================================================================

    /// Full-text search in one language.
    ///
    /// Returns (quote, relevance) pairs, best first. The relevance score is
    /// the negated bm25 rank, so higher is better; scores are only
    /// comparable between hits of the same query.
    pub async fn search_quotes(
        &self,
        query: &str,
        language: Lang,
        limit: usize,
    ) -> Result<Vec<(Quote, f64)>, StorageError> {
        let Some(match_expr) = build_match_expression(query) else {
            return Ok(Vec::new());
        };

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT q.id, q.text, q.language, q.author_id, q.source_id,
                           q.bilingual_group_id, q.created_at, bm25(quotes_fts) AS rank
                    FROM quotes_fts
                    JOIN quotes q ON q.id = quotes_fts.rowid
                    WHERE quotes_fts MATCH ?1 AND q.language = ?2
                    ORDER BY rank ASC, q.id ASC
                    LIMIT ?3
                    "#,
                )?;
                let rows = stmt
                    .query_map(
                        params![match_expr, language.as_str(), limit as i64],
                        |row| {
                            let quote = Self::map_quote(row)?;
                            let rank: f64 = row.get(7)?;
                            Ok((quote, -rank))
                        },
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    // =========================================================================
    // Translation Links & Groups
    // =========================================================================

    /// Existing links between quotes of one author
    pub async fn links_for_author(
        &self,
        author_id: i64,
    ) -> Result<Vec<TranslationLink>, StorageError> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT t.id, t.quote_id, t.translated_quote_id, t.confidence, t.created_at
                    FROM quote_translations t
                    JOIN quotes q ON q.id = t.quote_id
                    WHERE q.author_id = ?1
                    ORDER BY t.id
                    "#,
                )?;
                let rows = stmt
                    .query_map([author_id], Self::map_link)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Insert a single translation link unless the unordered pair exists.
    /// Returns true when a row was inserted.
    pub async fn create_translation_link(
        &self,
        quote_id: i64,
        translated_quote_id: i64,
        confidence: u8,
    ) -> Result<bool, StorageError> {
        self.db
            .execute_async(move |conn| {
                let changed = conn.execute(
                    "INSERT OR IGNORE INTO quote_translations
                         (quote_id, translated_quote_id, confidence, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![quote_id, translated_quote_id, confidence, now()],
                )?;
                Ok(changed > 0)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Apply one author's linking decisions in a single transaction.
    ///
    /// Links are inserted with INSERT OR IGNORE semantics; group ids are
    /// only ever written onto quotes that have none yet, so re-running a
    /// batch cannot reassign a group. Fresh group ids are allocated inside
    /// the transaction to keep concurrent author batches from colliding.
    pub async fn apply_link_batch(
        &self,
        links: Vec<NewLink>,
        groups: Vec<GroupAssignment>,
    ) -> Result<LinkBatchResult, StorageError> {
        self.db
            .transaction_async(move |tx| {
                let mut result = LinkBatchResult::default();

                for link in &links {
                    let changed = tx.execute(
                        "INSERT OR IGNORE INTO quote_translations
                             (quote_id, translated_quote_id, confidence, created_at)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![link.quote_id, link.translated_quote_id, link.confidence, now()],
                    )?;
                    result.links_created += changed;
                }

                for group in &groups {
                    let group_id = match group.group_id {
                        Some(id) => id,
                        None => tx.query_row(
                            "SELECT COALESCE(MAX(bilingual_group_id), 0) + 1 FROM quotes",
                            [],
                            |row| row.get(0),
                        )?,
                    };

                    for member in &group.members {
                        let changed = tx.execute(
                            "UPDATE quotes SET bilingual_group_id = ?1
                             WHERE id = ?2 AND bilingual_group_id IS NULL",
                            params![group_id, member],
                        )?;
                        result.groups_assigned += changed;
                    }
                }

                Ok(result)
            })
            .await
            .map_err(StorageError::from_db)
    }

    fn map_link(row: &rusqlite::Row) -> rusqlite::Result<TranslationLink> {
        Ok(TranslationLink {
            id: row.get(0)?,
            quote_id: row.get(1)?,
            translated_quote_id: row.get(2)?,
            confidence: row.get::<_, i64>(3)?.clamp(0, 100) as u8,
            created_at: row.get(4)?,
        })
    }

    // =========================================================================
    // Word Dictionary
    // =========================================================================

    /// Every (english, russian) pair in the word dictionary
    pub async fn word_pairs(&self) -> Result<Vec<(String, String)>, StorageError> {
        self.db
            .execute_async(|conn| {
                let mut stmt =
                    conn.prepare("SELECT word_en, word_ru FROM word_translations ORDER BY id")?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
            .map_err(StorageError::from_db)
    }

    /// Insert or update one dictionary pair, keyed by the English word
    pub async fn upsert_word_pair(&self, word_en: &str, word_ru: &str) -> Result<(), StorageError> {
        let word_en = word_en.trim().to_lowercase();
        let word_ru = word_ru.trim().to_lowercase();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "INSERT INTO word_translations (word_en, word_ru, created_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(word_en) DO UPDATE SET word_ru = excluded.word_ru",
                    params![word_en, word_ru, now()],
                )?;
                Ok(())
            })
            .await
            .map_err(StorageError::from_db)
    }
}

/// Shared SELECT column list for quote rows
const SELECT_QUOTE: &str = "SELECT id, text, language, author_id, source_id, bilingual_group_id, created_at FROM quotes";

/// Current timestamp in RFC 3339
fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Dedup key over (normalized text, language, author)
fn dedup_hash(normalized_text: &str, language: Lang, author_id: Option<i64>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(language.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(author_id.unwrap_or(0).to_le_bytes());
    hasher.update(b"\n");
    hasher.update(normalized_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Turn a free-form query into an FTS5 MATCH expression.
///
/// Tokens are quoted so user punctuation cannot inject FTS syntax, and
/// joined with OR so any matching word produces a (bm25-ranked) hit.
/// Returns None when the query holds no searchable tokens.
fn build_match_expression(query: &str) -> Option<String> {
    let tokens: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", t))
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" OR "))
    }
}
