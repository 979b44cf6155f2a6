/*!
 * Tests for the search ranker merging and ordering contract
 */

use aphorium::language::{Lang, LanguageFilter};
use aphorium::providers::mock::MockProvider;
use aphorium::store::Repository;
use aphorium::store::repository::{GroupAssignment, NewLink};

use crate::common::ranker_over;

/// EN quote matching "love" whose RU group-mate does not independently
/// match, plus an unlinked EN quote matching "love"
async fn pair_corpus() -> (Repository, i64, i64, i64) {
    let repo = Repository::new_in_memory().unwrap();

    let (en, _) = repo
        .create_quote(
            "The only way to do great work is to love what you do.",
            Lang::En,
            None,
            None,
        )
        .await
        .unwrap();
    let (ru, _) = repo
        .create_quote(
            "Единственный способ делать великое дело, обожать его всем сердцем.",
            Lang::Ru,
            None,
            None,
        )
        .await
        .unwrap();
    repo.apply_link_batch(
        vec![NewLink {
            quote_id: en.id,
            translated_quote_id: ru.id,
            confidence: 85,
        }],
        vec![GroupAssignment {
            group_id: None,
            members: vec![en.id, ru.id],
        }],
    )
    .await
    .unwrap();

    let (lone, _) = repo
        .create_quote(
            "Love all, trust a few, do wrong to none of them.",
            Lang::En,
            None,
            None,
        )
        .await
        .unwrap();

    (repo, en.id, ru.id, lone.id)
}

#[tokio::test]
async fn test_search_linkedCounterpart_shouldBeTranslatedAndRankedFirst() {
    let (repo, en_id, ru_id, lone_id) = pair_corpus().await;
    let ranker = ranker_over(repo, MockProvider::working());

    let pairs = ranker
        .search("love", LanguageFilter::Both, true, Some(10))
        .await;

    assert!(pairs.len() >= 2);

    // The bilingual pair leads; its RU side arrived only via the group link
    let top = &pairs[0];
    assert_eq!(top.english.as_ref().unwrap().id, en_id);
    assert_eq!(top.russian.as_ref().unwrap().id, ru_id);
    assert!(top.is_translated);

    // The unmatched single-language hit trails it
    let lone = pairs
        .iter()
        .find(|p| p.english.as_ref().is_some_and(|q| q.id == lone_id))
        .expect("single-language pair missing");
    assert!(lone.russian.is_none());
    assert!(!lone.is_translated);
}

#[tokio::test]
async fn test_search_counterpartAlsoMatchingDirectly_shouldCombineByMax() {
    let repo = Repository::new_in_memory().unwrap();

    // Both sides contain their language's query variant ("love"/"любовь")
    let (en, _) = repo
        .create_quote(
            "Love is the answer to almost every question we ask.",
            Lang::En,
            None,
            None,
        )
        .await
        .unwrap();
    let (ru, _) = repo
        .create_quote(
            "Любовь есть ответ почти на каждый наш вопрос.",
            Lang::Ru,
            None,
            None,
        )
        .await
        .unwrap();
    repo.apply_link_batch(
        vec![NewLink {
            quote_id: en.id,
            translated_quote_id: ru.id,
            confidence: 90,
        }],
        vec![GroupAssignment {
            group_id: None,
            members: vec![en.id, ru.id],
        }],
    )
    .await
    .unwrap();

    let en_score = repo.search_quotes("love", Lang::En, 10).await.unwrap()[0].1;
    let ru_score = repo.search_quotes("любовь", Lang::Ru, 10).await.unwrap()[0].1;

    let ranker = ranker_over(repo, MockProvider::working());
    let pairs = ranker
        .search("love", LanguageFilter::Both, true, Some(10))
        .await;

    assert_eq!(pairs.len(), 1);
    let pair = &pairs[0];
    assert!(pair.is_bilingual());
    // Both members matched their own language directly
    assert!(!pair.is_translated);
    // Documented combination: the max of the two member scores
    assert!((pair.score - en_score.max(ru_score)).abs() < 1e-9);
}

#[tokio::test]
async fn test_search_withProviderDown_shouldReturnDirectLanguageOnly() {
    let repo = Repository::new_in_memory().unwrap();
    repo.create_quote(
        "Мудрость приходит с опытом, а опыт приходит с ошибками.",
        Lang::Ru,
        None,
        None,
    )
    .await
    .unwrap();
    repo.create_quote(
        "Wisdom is knowing what to do next and doing it well.",
        Lang::En,
        None,
        None,
    )
    .await
    .unwrap();

    let ranker = ranker_over(repo, MockProvider::failing());
    let pairs = ranker
        .search("мудрость", LanguageFilter::Both, true, Some(10))
        .await;

    // RU hits survive; the EN side is absent, not an error
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].russian.is_some());
    assert!(pairs[0].english.is_none());
}

#[tokio::test]
async fn test_search_tiedScores_shouldKeepAscendingIdOrder() {
    let repo = Repository::new_in_memory().unwrap();
    // Identical texts except for a trailing token, yielding equal bm25
    // scores for the query term
    for suffix in ["alpha", "beta", "gamma", "delta"] {
        repo.create_quote(
            &format!("Freedom is worth defending every single day {}.", suffix),
            Lang::En,
            None,
            None,
        )
        .await
        .unwrap();
    }

    let ranker = ranker_over(repo, MockProvider::working());

    let mut previous: Option<Vec<i64>> = None;
    for _ in 0..3 {
        let pairs = ranker
            .search("freedom", LanguageFilter::En, true, Some(10))
            .await;
        let ids: Vec<i64> = pairs.iter().map(|p| p.tie_break_id()).collect();

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted, "tied pairs must come back in ascending id order");

        if let Some(previous_ids) = &previous {
            assert_eq!(previous_ids, &ids, "repeated runs must not reorder");
        }
        previous = Some(ids);
    }
}

#[tokio::test]
async fn test_search_groupWithMultipleMembersPerLanguage_shouldYieldOnePair() {
    let repo = Repository::new_in_memory().unwrap();

    // Two alternate EN phrasings and one RU phrasing share a group
    let (en_a, _) = repo
        .create_quote("Brevity is the soul of wit, nothing more to say.", Lang::En, None, None)
        .await
        .unwrap();
    let (en_b, _) = repo
        .create_quote("Wit has brevity for its very soul, they say.", Lang::En, None, None)
        .await
        .unwrap();
    let (ru, _) = repo
        .create_quote("Краткость есть душа остроумия, ничего больше.", Lang::Ru, None, None)
        .await
        .unwrap();
    repo.apply_link_batch(
        vec![
            NewLink {
                quote_id: en_a.id,
                translated_quote_id: ru.id,
                confidence: 80,
            },
            NewLink {
                quote_id: en_b.id,
                translated_quote_id: ru.id,
                confidence: 70,
            },
        ],
        vec![GroupAssignment {
            group_id: None,
            members: vec![en_a.id, en_b.id, ru.id],
        }],
    )
    .await
    .unwrap();

    let ranker = ranker_over(repo, MockProvider::working());
    let pairs = ranker
        .search("brevity", LanguageFilter::Both, true, Some(10))
        .await;

    // One pair for the whole group, not one per member
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].is_bilingual());
    assert_eq!(pairs[0].russian.as_ref().unwrap().id, ru.id);
}
