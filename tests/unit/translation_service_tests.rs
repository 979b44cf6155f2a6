/*!
 * Tests for the query translation service fallback chain
 */

use aphorium::language::Lang;
use aphorium::providers::mock::MockProvider;

use crate::common::{mock_translator, mock_translator_with_fallback};

#[tokio::test]
async fn test_translate_withWorkingPrimary_shouldNotTouchFallback() {
    let primary = MockProvider::working();
    let fallback = MockProvider::working();
    let fallback_counter = fallback.counter();

    let service = mock_translator_with_fallback(primary, fallback);
    let result = service.translate("wisdom", Lang::En).await;

    assert_eq!(result, "мудрость");
    assert_eq!(fallback_counter.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_translate_withFailingPrimary_shouldFallThrough() {
    let service = mock_translator_with_fallback(MockProvider::failing(), MockProvider::working());
    let result = service.translate("love", Lang::En).await;
    assert_eq!(result, "любовь");
}

#[tokio::test]
async fn test_translate_withEverythingDown_shouldReturnIdentity() {
    let service = mock_translator_with_fallback(MockProvider::failing(), MockProvider::failing());
    let query = "свобода и истина";
    let result = service.translate(query, Lang::Ru).await;
    assert_eq!(result, query);
}

#[tokio::test]
async fn test_translate_withoutFallback_shouldStillDegradeGracefully() {
    let service = mock_translator(MockProvider::failing());
    let result = service.translate("hope", Lang::En).await;
    assert_eq!(result, "hope");
}

#[tokio::test]
async fn test_translate_repeatedQueries_shouldBeMemoized() {
    let primary = MockProvider::working();
    let counter = primary.counter();
    let service = mock_translator(primary);

    for _ in 0..5 {
        let result = service.translate("peace", Lang::En).await;
        assert_eq!(result, "мир");
    }

    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);

    let (hits, misses, _) = service.cache().stats();
    assert_eq!(hits, 4);
    assert_eq!(misses, 1);
}

#[tokio::test]
async fn test_translate_bothDirections_shouldUseOppositeLanguage() {
    let service = mock_translator(MockProvider::working());

    assert_eq!(service.translate("war", Lang::En).await, "война");
    assert_eq!(service.translate("война", Lang::Ru).await, "war");
}

#[tokio::test]
async fn test_translate_slowProvider_shouldTimeOutIntoIdentity() {
    // 2s delay against the 500ms service timeout
    let service = mock_translator(MockProvider::slow(2_000));
    let result = service.translate("truth", Lang::En).await;
    assert_eq!(result, "truth");
}
