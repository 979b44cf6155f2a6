/*!
 * Pattern tables for the quote validator.
 *
 * Each language gets its own table of negative rules (fragment shapes that
 * mark citation/reference noise), a set of positive indicators (shapes that
 * mark genuine quoted speech) and a list of trailing-citation patterns used
 * for best-effort suffix cleanup. Adding a language means adding tables
 * here, not new control flow in the pipeline.
 *
 * The pattern corpus reflects the noise classes seen in real WikiQuote
 * scrapes: play references ("Act III, scene ii"), chapter and part
 * headings, publisher names, publication citations with dates, footnote
 * arrows and "see also"-style cross references.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::Lang;

/// A named rejection pattern
pub struct NegativeRule {
    /// Short rule name used in audit logs
    pub name: &'static str,
    pattern: Regex,
}

impl NegativeRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("invalid negative rule pattern"),
        }
    }

    /// Whether the rule matches the fragment
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A trailing-citation pattern with its replacement
struct SuffixRule {
    pattern: Regex,
    replacement: &'static str,
}

impl SuffixRule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid suffix rule pattern"),
            replacement,
        }
    }
}

static NEGATIVE_EN: Lazy<Vec<NegativeRule>> = Lazy::new(|| {
    vec![
        // "Can Socialists Be Happy?", Tribune (20 December 1943)
        NegativeRule::new(
            "publication-citation",
            r#"^"[^"]+",\s*[A-Z][^()]*\([^)]*\d{4}[^)]*\)\s*$"#,
        ),
        // "The English People" (written Spring 1944, published 1947)[2]
        NegativeRule::new(
            "reference-with-footnote",
            r#"^"[^"]+"\s*\([^)]*(?:written|published)[^)]*\)\s*\[\d+\]\s*$"#,
        ),
        // Letter to Thomas Beard (11 January 1835), in ...
        NegativeRule::new(
            "letter-citation",
            r"(?i)^letter\s+to\s+[^,(]+[,\s]*\([^)]+\),?\s*(?:in\b|as\s+quoted)",
        ),
        // Comment on the budget (1 March 1937), as quoted in ...
        NegativeRule::new(
            "comment-citation",
            r"(?i)^comment\s+(?:while|on)[^,(]+[,\s]*\([^)]+\),?\s*as\s+quoted",
        ),
        // Title, (Date), in Publication
        NegativeRule::new(
            "citation-clause",
            r#"^["A-Z][^.!?]*,\s*\([^)]+\),\s*(?:in\b|as\s+(?:quoted|cited))"#,
        ),
        NegativeRule::new("footnote-arrow", r"^\u{2191}"),
        NegativeRule::new("see-marker", r"(?i)^see\s+also\b"),
        NegativeRule::new("category-marker", r"(?i)^category:"),
        NegativeRule::new("bare-url", r"(?i)^(?:https?://|www\.)\S+\s*$"),
        // Act III, scene ii / Title, Act 1, Scene 2
        NegativeRule::new(
            "act-scene-marker",
            r"(?i)(?:^|,\s*)act\s+[ivxlc\d]+(?:\s*,\s*scene\s+[ivxlc\d]+)?\s*$",
        ),
        NegativeRule::new(
            "chapter-marker",
            r"(?i)(?:^|[,;]\s*)ch(?:apter)?\.?\s*[ivxlc\d]+\s*(?:[:\-].*)?$",
        ),
        NegativeRule::new(
            "part-marker",
            r"(?i)^part\s+(?:[ivxlc]+|\d+|one|two|three|four|five|[a-z])\s*(?:[:\-].*)?$|,\s*[Pp]art\s+(?:[IVXLC]+|\d+)\s*$",
        ),
        NegativeRule::new(
            "section-marker",
            r"(?i)^(?:section|article)\s+(?:[ivxlc]+|\d+)\s*(?:[:\-].*)?$|,\s*(?:[Ss]ection|[Aa]rticle)\s+(?:[IVXLC]+|\d+)\s*$",
        ),
        NegativeRule::new("volume-marker", r"(?i)\bvol(?:ume)?\.?\s*\d+\b"),
        NegativeRule::new(
            "publisher-name",
            r"(?i)\b(?:penguin\s+books|random house|harpercollins|simon & schuster|macmillan|hachette|scholastic|(?:oxford|cambridge|harvard|princeton|yale)\s+university\s+press|university press|publishers|publishing)\b",
        ),
        NegativeRule::new("published-by", r"(?i)\bpublished\s+(?:as|by)\b"),
        // In the Title (1943) shape with no sentence punctuation
        NegativeRule::new(
            "bare-dated-title",
            r"^[A-Z][^.!?]{0,150}\([^)]*\d{4}[^)]*\)\s*$",
        ),
        NegativeRule::new("year-range", r"\(\d{4}\s*[\u{2014}\u{2013}-]\s*\d{4}\)"),
        // Title: Subtitle / Title, Subtitle with no sentence punctuation
        NegativeRule::new(
            "title-subtitle",
            r"^[A-Z][^.!?]{10,150}[:,]\s*[A-Z][^.!?]{5,50}$",
        ),
        // trailing "by Author Name" attribution
        NegativeRule::new(
            "by-author-suffix",
            r"\bby\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\s*$",
        ),
    ]
});

static NEGATIVE_RU: Lazy<Vec<NegativeRule>> = Lazy::new(|| {
    vec![
        NegativeRule::new("footnote-arrow", r"^\u{2191}"),
        // см. / См. cross references, anywhere in the fragment
        NegativeRule::new("see-marker", r"[Сс]м\."),
        NegativeRule::new("category-marker", r"(?i)^категория:"),
        NegativeRule::new("bare-url", r"(?i)^(?:https?://|www\.)\S+\s*$"),
        NegativeRule::new(
            "part-marker",
            r"^Часть\s+(?:[IVXLC]+|\d+|[А-Яа-яЁё]+)\s*(?:[:\-].*)?$|,\s*Часть\s+(?:[IVXLC]+|\d+)\s*$",
        ),
        NegativeRule::new(
            "chapter-marker",
            r"(?:^|[,;]\s*)Гл(?:\.|ава)\s*\d+\s*(?:[:\-].*)?$",
        ),
        NegativeRule::new(
            "section-marker",
            r"^(?:Раздел|Секция|Статья)\s+\d+\s*(?:[:\-].*)?$|,\s*(?:Раздел|Секция|Статья)\s+\d+\s*$",
        ),
        NegativeRule::new("volume-marker", r"\bТом\.?\s*\d+\b"),
        NegativeRule::new(
            "publisher-name",
            r"\b(?:Издательство|Издатель)\b",
        ),
        NegativeRule::new(
            "author-marker",
            r"автор[а-яё]*:\s*[А-ЯЁ]",
        ),
        // Заглавие (1943) with no sentence punctuation
        NegativeRule::new(
            "bare-dated-title",
            r"^[А-ЯЁ][^.!?]{0,150}\([^)]*\d{4}[^)]*\)\s*$",
        ),
        NegativeRule::new("year-range", r"\(\d{4}\s*[\u{2014}\u{2013}-]\s*\d{4}\)"),
        // dated citation anywhere: (20 декабря 1943)
        NegativeRule::new(
            "dated-citation",
            r"\(\d{1,2}\s+(?:января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)\s+\d{4}\)",
        ),
        NegativeRule::new(
            "title-subtitle",
            r"^[А-ЯЁ][^.!?]{10,150}[:,]\s*[А-ЯЁ][^.!?]{5,50}$",
        ),
    ]
});

static POSITIVE_EN: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // a substantial quoted span
        Regex::new(r#""[^"]{20,}""#).expect("invalid indicator pattern"),
        // attribution dash followed by a capitalized name
        Regex::new(r"\s[\u{2014}\u{2013}-]\s*[A-Z][a-z]+").expect("invalid indicator pattern"),
        // quote-reporting verbs
        Regex::new(r"(?i)\b(?:said|says|wrote|writes|remarked|declared|stated|replied)\b")
            .expect("invalid indicator pattern"),
    ]
});

static POSITIVE_RU: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"«[^»]{20,}»").expect("invalid indicator pattern"),
        Regex::new(r#""[^"]{20,}""#).expect("invalid indicator pattern"),
        Regex::new(r"\s[\u{2014}\u{2013}-]\s*[А-ЯЁ][а-яё]+").expect("invalid indicator pattern"),
        Regex::new(r"\b(?:сказал|сказала|писал|писала|говорил|говорила|заметил|ответил|утверждал)\b")
            .expect("invalid indicator pattern"),
    ]
});

static SUFFIX_EN: Lazy<Vec<SuffixRule>> = Lazy::new(|| {
    vec![
        // ; as quoted in The Observer / , as cited in ...
        SuffixRule::new(r"(?i)[;,]\s*as\s+(?:quoted|cited)\s+in\s+.*$", ""),
        // (Date), in Publication ...
        SuffixRule::new(r"\s*\([^)]+\),\s*(?:in|as)\b.*$", ""),
        // , Publisher (Date), p. 12
        SuffixRule::new(r",\s+[A-Z][^,()]*\([^)]+\)(?:,\s*(?i:p{1,2})\.?\s*\d+.*)?\s*$", ""),
        // , p. 123 / , pp. 12-14
        SuffixRule::new(r"(?i),\s*p{1,2}\.?\s*\d+(?:\s*[\-\u{2013}]\s*\d+)?\s*$", ""),
        // trailing footnote marks [3]
        SuffixRule::new(r"\s*\[\d+\]\s*$", ""),
        // trailing , Ch. 3 / , Chapter 3
        SuffixRule::new(r"(?i),\s*ch(?:apter)?\.?\s*\d+\s*$", ""),
        // trailing bare date with no sentence mark before it
        SuffixRule::new(r"([^.!?])\s*\(\d{1,2}\s+\w+\s+\d{4}\)\s*$", "$1"),
        SuffixRule::new(r"([^.!?])\s*\(\d{4}\)\s*$", "$1"),
    ]
});

static SUFFIX_RU: Lazy<Vec<SuffixRule>> = Lazy::new(|| {
    vec![
        // цит. по: Источник
        SuffixRule::new(r"[;,]?\s*цит\.\s*по\b.*$", ""),
        // см. Источник and everything after
        SuffixRule::new(r"\s*[Сс]м\..*$", ""),
        SuffixRule::new(r"\s*\[\d+\]\s*$", ""),
        SuffixRule::new(r",\s*Гл(?:\.|ава)\s*\d+\s*$", ""),
        SuffixRule::new(
            r"([^.!?])\s*\(\d{1,2}\s+(?:января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)\s+\d{4}\)\s*$",
            "$1",
        ),
        SuffixRule::new(r"([^.!?])\s*\(\d{4}\)\s*$", "$1"),
    ]
});

/// Negative rule table for a language
pub fn negative_rules(lang: Lang) -> &'static [NegativeRule] {
    match lang {
        Lang::En => &NEGATIVE_EN,
        Lang::Ru => &NEGATIVE_RU,
    }
}

/// Whether the text carries at least one positive quote indicator
pub fn has_positive_indicator(text: &str, lang: Lang) -> bool {
    let indicators = match lang {
        Lang::En => &*POSITIVE_EN,
        Lang::Ru => &*POSITIVE_RU,
    };
    indicators.iter().any(|p| p.is_match(text))
}

/// Strip a trailing citation clause from an accepted quote.
///
/// Best effort only: patterns are applied to a fixpoint and the caller
/// decides whether the shortened text is still usable. Returns `None` when
/// nothing was stripped.
pub fn strip_citation_suffix(text: &str, lang: Lang) -> Option<String> {
    let rules = match lang {
        Lang::En => &*SUFFIX_EN,
        Lang::Ru => &*SUFFIX_RU,
    };

    let mut current = text.to_string();
    // A handful of passes is enough; stacked suffixes like `[3] (1943)` are rare.
    for _ in 0..4 {
        let mut changed = false;
        for rule in rules {
            let replaced = rule.pattern.replace(&current, rule.replacement);
            if replaced != current {
                current = replaced.trim().to_string();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    if current != text { Some(current) } else { None }
}
