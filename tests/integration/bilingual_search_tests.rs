/*!
 * End-to-end tests: ingest scraped fragments, link the corpus, search it
 */

use aphorium::app_controller::Controller;
use aphorium::language::{Lang, LanguageFilter};
use aphorium::linker::BilingualLinker;
use aphorium::providers::mock::MockProvider;
use aphorium::store::Repository;
use aphorium::store::models::ScrapedFragment;

use crate::common::{init_test_logging, ranker_over, test_config};

fn fragment(text: &str, language: Lang, author: &str, source: Option<&str>) -> ScrapedFragment {
    ScrapedFragment {
        text: text.to_string(),
        language,
        author: author.to_string(),
        source: source.map(|s| s.to_string()),
        source_type: None,
    }
}

/// Scrape-shaped input: real quotes mixed with citation noise, in both
/// languages, for one author
fn einstein_fragments() -> Vec<ScrapedFragment> {
    vec![
        fragment(
            "In the middle of difficulty lies opportunity.",
            Lang::En,
            "Albert Einstein",
            Some("The World As I See It"),
        ),
        fragment(
            "Посреди трудностей лежит возможность.",
            Lang::Ru,
            "Albert Einstein",
            None,
        ),
        // Noise the validator must keep out
        fragment(
            r#""Can Socialists Be Happy?", Tribune (20 December 1943)"#,
            Lang::En,
            "Albert Einstein",
            None,
        ),
        fragment("Chapter 12", Lang::En, "Albert Einstein", None),
        fragment(
            "См. также статью о теории относительности",
            Lang::Ru,
            "Albert Einstein",
            None,
        ),
    ]
}

#[tokio::test]
async fn test_fullFlow_ingestLinkSearch_shouldReturnLinkedPair() {
    init_test_logging();
    let repo = Repository::new_in_memory().unwrap();
    let config = test_config();
    let controller = Controller::with_repository(config.clone(), repo.clone());

    // Ingest: noise stays out
    let report = controller.ingest_fragments(einstein_fragments()).await.unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 3);

    // Link: the EN/RU pair shares enough content-word stems
    let linker = BilingualLinker::new(repo.clone(), config.linker.clone());
    let link_report = linker.link_all().await.unwrap();
    assert_eq!(link_report.links_created, 1);

    // Search: the mock dictionary expands "difficulty" to "трудность",
    // but the pair surfaces through the direct EN hit and its group link
    let ranker = ranker_over(repo, MockProvider::working());
    let pairs = ranker
        .search("difficulty", LanguageFilter::Both, true, Some(10))
        .await;

    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert!(pair.is_bilingual());
    assert!(pair.is_translated, "RU side arrived via the group link only");
    assert_eq!(
        pair.english.as_ref().unwrap().text,
        "In the middle of difficulty lies opportunity."
    );
    assert_eq!(
        pair.russian.as_ref().unwrap().text,
        "Посреди трудностей лежит возможность."
    );
}

#[tokio::test]
async fn test_fullFlow_searchFromRussianSide_shouldFindSamePair() {
    let repo = Repository::new_in_memory().unwrap();
    let config = test_config();
    let controller = Controller::with_repository(config.clone(), repo.clone());
    controller.ingest_fragments(einstein_fragments()).await.unwrap();
    BilingualLinker::new(repo.clone(), config.linker.clone())
        .link_all()
        .await
        .unwrap();

    let ranker = ranker_over(repo, MockProvider::working());
    let pairs = ranker
        .search("возможность", LanguageFilter::Both, true, Some(10))
        .await;

    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].is_bilingual());
    assert!(pairs[0].russian.is_some());
    assert!(pairs[0].english.is_some());
}

#[tokio::test]
async fn test_fullFlow_repeatedLinkRuns_shouldNotChangeSearchResults() {
    let repo = Repository::new_in_memory().unwrap();
    let config = test_config();
    let controller = Controller::with_repository(config.clone(), repo.clone());
    controller.ingest_fragments(einstein_fragments()).await.unwrap();

    let linker = BilingualLinker::new(repo.clone(), config.linker.clone());
    linker.link_all().await.unwrap();
    let second = linker.link_all().await.unwrap();
    assert_eq!(second.links_created, 0);

    let ranker = ranker_over(repo, MockProvider::working());
    let pairs = ranker
        .search("difficulty", LanguageFilter::Both, true, Some(10))
        .await;
    assert_eq!(pairs.len(), 1);
}

#[tokio::test]
async fn test_fullFlow_withProviderDown_shouldDegradeToSingleLanguage() {
    let repo = Repository::new_in_memory().unwrap();
    let config = test_config();
    let controller = Controller::with_repository(config.clone(), repo.clone());
    controller
        .ingest_fragments(vec![
            fragment(
                "Мудрость жизни всегда глубже и обширнее мудрости людей.",
                Lang::Ru,
                "Максим Горький",
                None,
            ),
            fragment(
                "Wisdom alone is the science of all other sciences combined.",
                Lang::En,
                "Plato",
                None,
            ),
        ])
        .await
        .unwrap();

    let ranker = ranker_over(repo, MockProvider::failing());
    let pairs = ranker
        .search("мудрость", LanguageFilter::Both, true, Some(10))
        .await;

    // Only the direct-language hits; no error, no EN side
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].russian.is_some());
    assert!(pairs[0].english.is_none());
}
