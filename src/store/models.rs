/*!
 * Store entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::Lang;

/// Kind of literary source a quote belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// A book or novel
    Book,
    /// A stage play
    Play,
    /// A poem
    Poem,
    /// A speech or address
    Speech,
    /// An essay or article
    Essay,
    /// Anything else
    Other,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Book => write!(f, "book"),
            SourceType::Play => write!(f, "play"),
            SourceType::Poem => write!(f, "poem"),
            SourceType::Speech => write!(f, "speech"),
            SourceType::Essay => write!(f, "essay"),
            SourceType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "book" => Ok(SourceType::Book),
            "play" => Ok(SourceType::Play),
            "poem" => Ok(SourceType::Poem),
            "speech" => Ok(SourceType::Speech),
            "essay" => Ok(SourceType::Essay),
            "other" => Ok(SourceType::Other),
            _ => Err(anyhow::anyhow!("Invalid source type: {}", s)),
        }
    }
}

/// Author record. Identity key is (name, language).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Database ID
    pub id: i64,
    /// Author name in its own language
    pub name: String,
    /// Language of the name
    pub language: Lang,
    /// Short biography, when the scraper found one
    pub bio: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

/// Literary source record (book, play, poem, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Database ID
    pub id: i64,
    /// Work title
    pub title: String,
    /// Language of the title
    pub language: Lang,
    /// Author the work belongs to, if known
    pub author_id: Option<i64>,
    /// Kind of work
    pub source_type: Option<SourceType>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

/// Quote record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Database ID
    pub id: i64,
    /// Normalized quote text
    pub text: String,
    /// Quote language, fixed at creation
    pub language: Lang,
    /// Author, if known
    pub author_id: Option<i64>,
    /// Source work, if known
    pub source_id: Option<i64>,
    /// Equivalence class of cross-language versions, once linked
    pub bilingual_group_id: Option<i64>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl Quote {
    /// Short preview of the text for log lines
    pub fn preview(&self) -> String {
        const MAX: usize = 50;
        if self.text.chars().count() <= MAX {
            self.text.clone()
        } else {
            let cut: String = self.text.chars().take(MAX).collect();
            format!("{}...", cut)
        }
    }
}

/// Link between two quotes that express the same aphorism
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationLink {
    /// Database ID
    pub id: i64,
    /// One side of the unordered pair
    pub quote_id: i64,
    /// The other side of the unordered pair
    pub translated_quote_id: i64,
    /// Matching-algorithm certainty, 0-100; not user-verified
    pub confidence: u8,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl TranslationLink {
    /// The pair in (low, high) id order
    pub fn ordered_pair(&self) -> (i64, i64) {
        if self.quote_id <= self.translated_quote_id {
            (self.quote_id, self.translated_quote_id)
        } else {
            (self.translated_quote_id, self.quote_id)
        }
    }
}

/// One scraped fragment as delivered by the (external) scraping layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedFragment {
    /// Raw fragment text
    pub text: String,
    /// Language the page was scraped in
    pub language: Lang,
    /// Author the page belongs to
    pub author: String,
    /// Section heading the fragment was found under, if any
    #[serde(default)]
    pub source: Option<String>,
    /// Kind of work the section describes
    #[serde(default)]
    pub source_type: Option<SourceType>,
}
