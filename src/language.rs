/*!
 * Language handling for the bilingual corpus.
 *
 * Aphorium indexes exactly two languages, English and Russian. This module
 * provides the `Lang` enum used throughout the crate, Cyrillic-based
 * detection for raw text, and ISO 639-1 validation for codes arriving from
 * the CLI or from scraped input files.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two indexed languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    En,
    /// Russian
    Ru,
}

impl Lang {
    /// ISO 639-1 code for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }

    /// The other indexed language
    pub fn opposite(&self) -> Lang {
        match self {
            Lang::En => Lang::Ru,
            Lang::Ru => Lang::En,
        }
    }

    /// English display name, via isolang
    pub fn display_name(&self) -> &'static str {
        Language::from_639_1(self.as_str())
            .map(|l| l.to_name())
            .unwrap_or("unknown")
    }

    /// Both indexed languages, in a fixed order
    pub fn both() -> [Lang; 2] {
        [Lang::En, Lang::Ru]
    }

    /// Detect the language of a text fragment.
    ///
    /// Any Cyrillic character marks the text as Russian; everything else is
    /// treated as English. Good enough for a corpus restricted to these two
    /// scripts.
    pub fn detect(text: &str) -> Lang {
        let has_cyrillic = text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c));
        if has_cyrillic { Lang::Ru } else { Lang::En }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Lang {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_lowercase();
        // Validate against the ISO registry first so a typo like "enn" fails
        // with a clear message rather than silently defaulting.
        if code.len() == 2 && Language::from_639_1(&code).is_none() {
            return Err(anyhow!("Invalid ISO 639-1 language code: {}", s));
        }
        match code.as_str() {
            "en" => Ok(Lang::En),
            "ru" => Ok(Lang::Ru),
            _ => Err(anyhow!("Unsupported language: {} (expected 'en' or 'ru')", s)),
        }
    }
}

/// Language filter for the caller-facing search contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilter {
    /// English results only
    En,
    /// Russian results only
    Ru,
    /// Results from both languages, paired where possible
    #[default]
    Both,
}

impl LanguageFilter {
    /// The languages this filter selects
    pub fn languages(&self) -> &'static [Lang] {
        match self {
            LanguageFilter::En => &[Lang::En],
            LanguageFilter::Ru => &[Lang::Ru],
            LanguageFilter::Both => &[Lang::En, Lang::Ru],
        }
    }

    /// Whether the filter spans both languages
    pub fn is_bilingual(&self) -> bool {
        matches!(self, LanguageFilter::Both)
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFilter::En => write!(f, "en"),
            LanguageFilter::Ru => write!(f, "ru"),
            LanguageFilter::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for LanguageFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(LanguageFilter::En),
            "ru" => Ok(LanguageFilter::Ru),
            "both" | "" => Ok(LanguageFilter::Both),
            _ => Err(anyhow!("Invalid language filter: {} (expected 'en', 'ru' or 'both')", s)),
        }
    }
}
