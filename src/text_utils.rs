/*!
 * Text normalization and content-word extraction.
 *
 * Quote texts arrive from scrapers with inconsistent whitespace, decorative
 * quotation marks and punctuation. This module normalizes them for storage
 * and breaks them into content-word stems for the similarity scoring used
 * by the bilingual linker.
 */

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::language::Lang;

/// English stopwords skipped during content-word extraction
static STOPWORDS_EN: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "if", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during",
        "to", "from", "in", "on", "off", "over", "under", "again", "then",
        "once", "here", "there", "all", "any", "both", "each", "few", "more",
        "most", "other", "some", "such", "no", "nor", "not", "only", "own",
        "same", "so", "than", "too", "very", "can", "will", "just", "should",
        "now", "is", "are", "was", "were", "be", "been", "being", "have",
        "has", "had", "do", "does", "did", "it", "its", "this", "that",
        "these", "those", "i", "you", "he", "she", "we", "they", "them",
        "his", "her", "their", "our", "your", "my", "me", "him", "us", "what",
        "which", "who", "whom", "as",
    ]
    .into_iter()
    .collect()
});

/// Russian stopwords skipped during content-word extraction
static STOPWORDS_RU: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "и", "в", "во", "не", "что", "он", "на", "я", "с", "со", "как", "а",
        "то", "все", "она", "так", "его", "но", "да", "ты", "к", "у", "же",
        "вы", "за", "бы", "по", "ее", "её", "мне", "было", "вот", "от",
        "меня", "еще", "ещё", "нет", "о", "из", "ему", "теперь", "когда",
        "даже", "ну", "ли", "если", "уже", "или", "ни", "быть", "был",
        "него", "до", "вас", "нибудь", "уж", "вам", "ведь", "там", "потом",
        "себя", "ничего", "ей", "может", "они", "тут", "где", "есть",
        "надо", "ней", "для", "мы", "тебя", "их", "чем", "была", "сам",
        "чтоб", "без", "будто", "чего", "раз", "тоже", "себе", "под",
        "будет", "тогда", "кто", "этот", "того", "какой", "при", "это",
        "чтобы", "мой", "эти",
    ]
    .into_iter()
    .collect()
});

/// English suffixes stripped by the light stemmer, longest first
const SUFFIXES_EN: &[&str] = &[
    "ations", "ation", "ingly", "iness", "ness", "ments", "ment", "ings",
    "ing", "edly", "ies", "ers", "est", "ed", "ly", "er", "es", "s", "e",
];

/// Russian suffixes stripped by the light stemmer, longest first
const SUFFIXES_RU: &[&str] = &[
    "остей", "остям", "иями", "ости", "ость", "ями", "ами", "ыми", "ими",
    "ого", "его", "ому", "ему", "ешь", "ишь", "ете", "ите", "ала", "ила",
    "ать", "ить", "еть", "ует", "ах", "ях", "ам", "ям", "ов", "ев", "ей",
    "ом", "ем", "ой", "ая", "яя", "ое", "ее", "ые", "ие", "ый", "ий", "ет",
    "ит", "ла", "ть", "а", "я", "о", "е", "у", "ю", "ы", "и", "ь",
];

/// Normalize a raw quote text for storage and comparison.
///
/// Collapses internal whitespace, trims, and removes one layer of enclosing
/// quotation marks when the whole text is wrapped in them.
pub fn normalize_text(text: &str) -> String {
    let mut normalized: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    // Strip one pair of matching enclosing quote marks
    const QUOTE_PAIRS: &[(char, char)] = &[
        ('"', '"'),
        ('\'', '\''),
        ('\u{201C}', '\u{201D}'), // curly double quotes
        ('\u{00AB}', '\u{00BB}'), // guillemets
    ];
    for &(open, close) in QUOTE_PAIRS {
        if normalized.len() >= 2 && normalized.starts_with(open) && normalized.ends_with(close) {
            normalized = normalized[open.len_utf8()..normalized.len() - close.len_utf8()]
                .trim()
                .to_string();
            break;
        }
    }

    normalized
}

/// Split a text into lowercase word tokens, dropping punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Whether a lowercase token is a stopword in the given language
pub fn is_stopword(token: &str, lang: Lang) -> bool {
    match lang {
        Lang::En => STOPWORDS_EN.contains(token),
        Lang::Ru => STOPWORDS_RU.contains(token),
    }
}

/// Reduce a lowercase token to a crude stem.
///
/// This is intentionally a light suffix-stripper, not a full morphological
/// stemmer: it only needs to make inflected forms of the same content word
/// collide for overlap counting. Stems shorter than three characters are
/// left untouched.
pub fn stem(token: &str, lang: Lang) -> String {
    let suffixes = match lang {
        Lang::En => SUFFIXES_EN,
        Lang::Ru => SUFFIXES_RU,
    };

    for suffix in suffixes {
        if let Some(stripped) = token.strip_suffix(suffix) {
            if stripped.chars().count() >= 3 {
                return stripped.to_string();
            }
        }
    }

    token.to_string()
}

/// Extract the set of content-word stems from a text.
///
/// Tokens are lowercased, stopwords removed, and the remainder stemmed.
/// Single-character leftovers are dropped.
pub fn content_stems(text: &str, lang: Lang) -> HashSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stopword(t, lang))
        .map(|t| stem(&t, lang))
        .filter(|s| s.chars().count() > 1)
        .collect()
}
