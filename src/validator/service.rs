/*!
 * The quote classification pipeline.
 *
 * Classification runs a fixed sequence of checks; the first rejection wins.
 * Accepted fragments may come back with a trailing citation clause stripped.
 */

use std::fmt;

use crate::app_config::ValidatorConfig;
use crate::language::Lang;
use crate::validator::rules;

/// Sentence-ending marks accepted as quote terminators
const TERMINAL_MARKS: &[char] = &['.', '!', '?', '\u{2026}'];

/// Closing punctuation skipped when looking for the terminal mark
const TRAILING_CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{00BB}', ')', ']'];

/// Classification outcome for one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The fragment is a quote; `text` may have a citation suffix stripped
    Accept {
        /// Cleaned quote text
        text: String,
    },
    /// The fragment is citation/metadata noise
    Reject {
        /// Why the fragment was rejected
        reason: RejectReason,
    },
}

impl Verdict {
    /// Whether this verdict accepts the fragment
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept { .. })
    }
}

/// Named rejection reasons, used in audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Below the minimum quote length
    TooShort {
        /// Character count of the trimmed fragment
        length: usize,
    },
    /// No terminal sentence mark and too short to tolerate that
    Unterminated {
        /// Character count of the trimmed fragment
        length: usize,
    },
    /// Looks like a title-cased heading rather than a sentence
    TitleCaseHeading,
    /// Matched a language-specific negative pattern
    Noise {
        /// Name of the matching rule
        rule: &'static str,
    },
    /// Borderline fragment with no positive quote indicator
    NoQuoteIndicator,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooShort { length } => write!(f, "too short ({} chars)", length),
            RejectReason::Unterminated { length } => {
                write!(f, "no terminal sentence mark ({} chars)", length)
            }
            RejectReason::TitleCaseHeading => write!(f, "title-case heading"),
            RejectReason::Noise { rule } => write!(f, "matched noise pattern '{}'", rule),
            RejectReason::NoQuoteIndicator => write!(f, "no positive quote indicator"),
        }
    }
}

/// Classifies raw scraped fragments as quote or noise
#[derive(Debug, Clone)]
pub struct QuoteValidator {
    config: ValidatorConfig,
}

impl QuoteValidator {
    /// Create a validator with the given thresholds
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Classify a raw text fragment.
    ///
    /// Pure and infallible: every input produces a verdict. The ordered
    /// checks are length, terminal mark, title-case shape, the negative
    /// pattern table for the language, and an indicator requirement for
    /// borderline fragments. Accepted text has trailing citation clauses
    /// stripped on a best-effort basis.
    pub fn classify(&self, text: &str, lang: Lang) -> Verdict {
        let mut working = text.trim().to_string();
        let length = working.chars().count();

        if length < self.config.min_length {
            return Verdict::Reject {
                reason: RejectReason::TooShort { length },
            };
        }

        // Salvage attempt: a quote followed by a citation clause has no
        // terminal mark at the end of the raw fragment. If stripping the
        // clause uncovers one, judge the stripped text instead.
        let mut has_terminal = has_terminal_mark(&working);
        if !has_terminal {
            if let Some(cleaned) = rules::strip_citation_suffix(&working, lang) {
                if has_terminal_mark(&cleaned)
                    && cleaned.chars().count() >= self.config.min_length
                {
                    working = cleaned;
                    has_terminal = true;
                }
            }
        }

        if !has_terminal && working.chars().count() < self.config.secondary_threshold {
            return Verdict::Reject {
                reason: RejectReason::Unterminated {
                    length: working.chars().count(),
                },
            };
        }

        if !has_terminal && is_title_case(&working) {
            return Verdict::Reject {
                reason: RejectReason::TitleCaseHeading,
            };
        }

        for rule in rules::negative_rules(lang) {
            if rule.matches(&working) {
                return Verdict::Reject {
                    reason: RejectReason::Noise { rule: rule.name },
                };
            }
        }

        // A clean negative check is not enough for borderline fragments:
        // anything unterminated or shorter than the borderline length also
        // needs a positive signal. The terminal mark itself counts as one.
        let borderline = !has_terminal || working.chars().count() < self.config.borderline_length;
        let has_indicator = has_terminal || rules::has_positive_indicator(&working, lang);
        if borderline && !has_indicator {
            return Verdict::Reject {
                reason: RejectReason::NoQuoteIndicator,
            };
        }

        match rules::strip_citation_suffix(&working, lang) {
            Some(cleaned) if cleaned.chars().count() >= self.config.min_length => {
                Verdict::Accept { text: cleaned }
            }
            _ => Verdict::Accept { text: working },
        }
    }
}

/// Whether the text ends with a sentence mark, ignoring closing quotes and
/// brackets after it.
fn has_terminal_mark(text: &str) -> bool {
    text.trim_end_matches(TRAILING_CLOSERS)
        .trim_end()
        .ends_with(TERMINAL_MARKS)
}

/// Whether every alphabetic word starts with an uppercase letter.
///
/// Single-word fragments are not considered title case; they are handled by
/// the length checks.
fn is_title_case(text: &str) -> bool {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_alphabetic()))
        .collect();

    words.len() >= 2
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::ValidatorConfig;

    fn validator() -> QuoteValidator {
        QuoteValidator::new(ValidatorConfig::default())
    }

    #[test]
    fn test_classify_withPublicationCitation_shouldReject() {
        let verdict = validator().classify(
            r#""Can Socialists Be Happy?", Tribune (20 December 1943)"#,
            Lang::En,
        );
        assert!(!verdict.is_accept());
    }

    #[test]
    fn test_classify_withTerminatedQuote_shouldAccept() {
        let verdict = validator().classify(
            "The only way to do great work is to love what you do.",
            Lang::En,
        );
        assert_eq!(
            verdict,
            Verdict::Accept {
                text: "The only way to do great work is to love what you do.".to_string()
            }
        );
    }

    #[test]
    fn test_classify_withShortFragment_shouldRejectTooShort() {
        let verdict = validator().classify("To be or not to be.", Lang::En);
        assert_eq!(
            verdict,
            Verdict::Reject {
                reason: RejectReason::TooShort { length: 19 }
            }
        );
    }

    #[test]
    fn test_classify_withShortUnterminatedText_shouldReject() {
        let verdict = validator().classify("Politics and the English Language essay", Lang::En);
        assert!(matches!(
            verdict,
            Verdict::Reject {
                reason: RejectReason::Unterminated { .. }
            }
        ));
    }

    #[test]
    fn test_classify_withTitleCaseHeading_shouldReject() {
        // Long enough to pass the length gates but shaped like a book title
        let text = "The Collected Essays Journalism And Letters Of George Orwell Volume One An Age Like This Nineteen Twenty To Nineteen Forty And Other Assorted Writings Here";
        let verdict = validator().classify(text, Lang::En);
        assert!(matches!(
            verdict,
            Verdict::Reject {
                reason: RejectReason::TitleCaseHeading
            }
        ));
    }

    #[test]
    fn test_classify_withLongUnterminatedQuotedSpeech_shouldAccept() {
        let text = "and then he turned to the crowd saying \"the future belongs to those who believe in the beauty of their dreams\" before walking off the stage into the evening air without another word";
        let verdict = validator().classify(text, Lang::En);
        assert!(verdict.is_accept());
    }

    #[test]
    fn test_classify_withLongUnterminatedListNoise_shouldReject() {
        // Over the secondary threshold, no terminal mark, no indicator
        let text = "collected essays and journalism from the early period including letters to friends notes on the spanish war reviews of contemporary novels and assorted political commentary from tribune";
        let verdict = validator().classify(text, Lang::En);
        assert_eq!(
            verdict,
            Verdict::Reject {
                reason: RejectReason::NoQuoteIndicator
            }
        );
    }

    #[test]
    fn test_classify_withFootnoteSuffix_shouldAcceptStripped() {
        let verdict = validator().classify(
            "All animals are equal, but some animals are more equal than others. [3]",
            Lang::En,
        );
        assert_eq!(
            verdict,
            Verdict::Accept {
                text: "All animals are equal, but some animals are more equal than others."
                    .to_string()
            }
        );
    }

    #[test]
    fn test_classify_withRussianQuote_shouldAccept() {
        let verdict = validator().classify("Посреди трудностей лежит возможность, и мы найдём её.", Lang::Ru);
        assert!(verdict.is_accept());
    }

    #[test]
    fn test_classify_withRussianSeeReference_shouldReject() {
        let verdict = validator().classify(
            "См. также полный список произведений автора на отдельной странице",
            Lang::Ru,
        );
        assert!(matches!(
            verdict,
            Verdict::Reject {
                reason: RejectReason::Noise { rule: "see-marker" }
            }
        ));
    }

    #[test]
    fn test_classify_withBareUrl_shouldReject() {
        let verdict = validator().classify(
            "https://en.wikiquote.org/wiki/Special:RecentChanges?hidebots=1",
            Lang::En,
        );
        assert!(!verdict.is_accept());
    }

    #[test]
    fn test_hasTerminalMark_shouldSkipClosingQuotes() {
        assert!(has_terminal_mark("He said it was over.\""));
        assert!(has_terminal_mark("Так говорил он…"));
        assert!(!has_terminal_mark("An Age Like This (1940)"));
    }

    #[test]
    fn test_isTitleCase_shouldDetectHeadings() {
        assert!(is_title_case("Animal Farm A Fairy Story"));
        assert!(!is_title_case("The only way out is through"));
        assert!(!is_title_case("Одно слово"));
    }
}
