/*!
 * Cross-language similarity scoring.
 *
 * Two quotes in different languages share no literal tokens, so the score
 * works in English stem space: English content words are stemmed directly,
 * Russian content words are mapped through the store's word dictionary
 * first. The overlap of the two stem sets drives the confidence value.
 */

use std::collections::{HashMap, HashSet};

use crate::language::Lang;
use crate::text_utils::{content_stems, stem};

/// Russian-to-English stem mapping built from the word dictionary
#[derive(Debug, Default, Clone)]
pub struct WordMap {
    /// stem(russian word) -> stem(english word)
    ru_to_en: HashMap<String, String>,
}

impl WordMap {
    /// Build the mapping from (english, russian) dictionary pairs.
    ///
    /// Both sides are stemmed so inflected corpus tokens still hit the
    /// dictionary's base forms.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut ru_to_en = HashMap::new();
        for (en, ru) in pairs {
            let en_stem = stem(&en.as_ref().to_lowercase(), Lang::En);
            let ru_stem = stem(&ru.as_ref().to_lowercase(), Lang::Ru);
            ru_to_en.insert(ru_stem, en_stem);
        }
        Self { ru_to_en }
    }

    /// Number of dictionary entries
    pub fn len(&self) -> usize {
        self.ru_to_en.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.ru_to_en.is_empty()
    }

    /// Map a Russian stem into English stem space.
    ///
    /// Stems without a dictionary entry come back unchanged: proper names
    /// and latin-script tokens inside Russian text still align with their
    /// English counterparts that way.
    fn map_stem<'a>(&'a self, ru_stem: &'a str) -> &'a str {
        self.ru_to_en.get(ru_stem).map(String::as_str).unwrap_or(ru_stem)
    }
}

/// Result of scoring one EN/RU candidate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    /// Number of shared content-word stems
    pub overlap: usize,
    /// Overlap normalized by the smaller stem set
    pub ratio: f64,
    /// 0-100 certainty derived from the ratio
    pub confidence: u8,
}

/// Score an English/Russian text pair by shared content-word stems.
pub fn score_pair(en_text: &str, ru_text: &str, words: &WordMap) -> SimilarityScore {
    let en_stems = content_stems(en_text, Lang::En);
    let ru_stems: HashSet<String> = content_stems(ru_text, Lang::Ru)
        .iter()
        .map(|s| words.map_stem(s).to_string())
        .collect();

    let overlap = en_stems.intersection(&ru_stems).count();
    let smaller = en_stems.len().min(ru_stems.len());
    let ratio = if smaller == 0 {
        0.0
    } else {
        overlap as f64 / smaller as f64
    };
    let confidence = (ratio * 100.0).round().min(100.0) as u8;

    SimilarityScore {
        overlap,
        ratio,
        confidence,
    }
}
