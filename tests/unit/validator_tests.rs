/*!
 * Tests for the quote validator pipeline
 */

use aphorium::app_config::ValidatorConfig;
use aphorium::language::Lang;
use aphorium::validator::{QuoteValidator, RejectReason, Verdict};

fn validator() -> QuoteValidator {
    QuoteValidator::new(ValidatorConfig::default())
}

#[test]
fn test_classify_withCitationLine_shouldReject() {
    let verdict = validator().classify(
        r#""Can Socialists Be Happy?", Tribune (20 December 1943)"#,
        Lang::En,
    );
    assert!(!verdict.is_accept());
}

#[test]
fn test_classify_withRealQuote_shouldAccept() {
    let verdict = validator().classify(
        "The only way to do great work is to love what you do.",
        Lang::En,
    );
    assert!(verdict.is_accept());
}

#[test]
fn test_classify_withAnyShortText_shouldReject() {
    let validator = validator();
    let short_fragments = [
        "Hello.",
        "Ch. 4",
        "A short line here!",
        "Мало слов.",
        "",
        "   ",
    ];

    for text in short_fragments {
        let verdict = validator.classify(text, Lang::En);
        assert!(
            matches!(
                verdict,
                Verdict::Reject {
                    reason: RejectReason::TooShort { .. }
                }
            ),
            "expected TooShort for {:?}, got {:?}",
            text,
            verdict
        );
    }
}

#[test]
fn test_classify_withCitationShapes_shouldRejectRegardlessOfLength() {
    let validator = validator();
    let citations = [
        // play reference
        "Romeo and Juliet, the famous balcony dialogue between the lovers, Act II, scene ii",
        // letter citation
        "Letter to Thomas Beard (11 January 1835), in The Letters of Charles Dickens volume one",
        // bare dated title
        "The Road to Wigan Pier and other early documentary writing from the north of England (1937)",
        // publisher metadata
        "Collected and reprinted by Oxford University Press in the centennial anthology of essays",
    ];

    for text in citations {
        let verdict = validator.classify(text, Lang::En);
        assert!(!verdict.is_accept(), "expected reject for {:?}", text);
    }
}

#[test]
fn test_classify_withRussianCitationShapes_shouldReject() {
    let validator = validator();
    let citations = [
        "См. также полный список произведений автора на отдельной странице",
        "Война и мир, Часть 2",
        "Категория: Русские писатели девятнадцатого века",
        "Преступление и наказание, издательство Азбука, Том 1",
    ];

    for text in citations {
        let verdict = validator.classify(text, Lang::Ru);
        assert!(!verdict.is_accept(), "expected reject for {:?}", text);
    }
}

#[test]
fn test_classify_withTitleCaseHeading_shouldReject() {
    let text = "The Collected Essays Journalism And Letters Of George Orwell Volume One An Age Like This Nineteen Twenty To Nineteen Forty And Other Assorted Writings Here";
    let verdict = validator().classify(text, Lang::En);
    assert_eq!(
        verdict,
        Verdict::Reject {
            reason: RejectReason::TitleCaseHeading
        }
    );
}

#[test]
fn test_classify_withTrailingFootnote_shouldStripIt() {
    let verdict = validator().classify(
        "All animals are equal, but some animals are more equal than others. [7]",
        Lang::En,
    );
    assert_eq!(
        verdict,
        Verdict::Accept {
            text: "All animals are equal, but some animals are more equal than others.".to_string()
        }
    );
}

#[test]
fn test_classify_withQuotedSpeechIndicator_shouldAcceptLongUnterminated() {
    let text = "and then she rose to address the assembly saying \"those who would give up essential liberty deserve neither liberty nor safety\" while the hall slowly fell silent around her";
    assert!(validator().classify(text, Lang::En).is_accept());
}

#[test]
fn test_classify_isPure_sameInputGivesSameVerdict() {
    let validator = validator();
    let text = "Свобода это право говорить людям то, что они не хотят слышать.";
    let first = validator.classify(text, Lang::Ru);
    let second = validator.classify(text, Lang::Ru);
    assert_eq!(first, second);
    assert!(first.is_accept());
}

#[test]
fn test_classify_withCustomMinLength_shouldUseConfiguredThreshold() {
    let config = ValidatorConfig {
        min_length: 10,
        ..Default::default()
    };
    let validator = QuoteValidator::new(config);

    // 19 chars: rejected by defaults, accepted with min_length 10
    let verdict = validator.classify("To be or not to be.", Lang::En);
    assert!(verdict.is_accept());
}
