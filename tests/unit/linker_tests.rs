/*!
 * Tests for the bilingual linker
 */

use aphorium::app_config::LinkerConfig;
use aphorium::language::Lang;
use aphorium::linker::BilingualLinker;
use aphorium::store::Repository;

async fn pushkin_corpus() -> (Repository, i64, i64, i64) {
    let repo = Repository::new_in_memory().expect("Failed to create repository");
    let author = repo
        .get_or_create_author("Пушкин", Lang::Ru, None)
        .await
        .unwrap();

    let (en, _) = repo
        .create_quote(
            "In the middle of difficulty lies opportunity.",
            Lang::En,
            Some(author.id),
            None,
        )
        .await
        .unwrap();
    let (ru, _) = repo
        .create_quote(
            "Посреди трудностей лежит возможность.",
            Lang::Ru,
            Some(author.id),
            None,
        )
        .await
        .unwrap();

    (repo, author.id, en.id, ru.id)
}

#[tokio::test]
async fn test_linkAuthor_withOverlappingStems_shouldLinkWithConfidence() {
    let (repo, author_id, en_id, ru_id) = pushkin_corpus().await;
    let config = LinkerConfig::default();
    let linker = BilingualLinker::new(repo.clone(), config.clone());

    let result = linker.link_author(author_id).await.unwrap();
    assert_eq!(result.links_created, 1);

    let links = repo.links_for_author(author_id).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].ordered_pair(), (en_id.min(ru_id), en_id.max(ru_id)));
    assert!(
        links[0].confidence >= config.min_confidence,
        "confidence {} below threshold {}",
        links[0].confidence,
        config.min_confidence
    );

    let en = repo.get_quote(en_id).await.unwrap().unwrap();
    let ru = repo.get_quote(ru_id).await.unwrap().unwrap();
    assert!(en.bilingual_group_id.is_some());
    assert_eq!(en.bilingual_group_id, ru.bilingual_group_id);
}

#[tokio::test]
async fn test_linkAll_runTwice_shouldCreateNothingNew() {
    let (repo, _, en_id, _) = pushkin_corpus().await;
    let linker = BilingualLinker::new(repo.clone(), LinkerConfig::default());

    let first = linker.link_all().await.unwrap();
    assert_eq!(first.links_created, 1);
    let group_before = repo.get_quote(en_id).await.unwrap().unwrap().bilingual_group_id;

    let second = linker.link_all().await.unwrap();
    assert_eq!(second.links_created, 0);
    assert_eq!(second.groups_assigned, 0);

    let group_after = repo.get_quote(en_id).await.unwrap().unwrap().bilingual_group_id;
    assert_eq!(group_before, group_after);
}

#[tokio::test]
async fn test_groupLookup_fromEitherSide_shouldReturnBothQuotes() {
    let (repo, author_id, en_id, ru_id) = pushkin_corpus().await;
    let linker = BilingualLinker::new(repo.clone(), LinkerConfig::default());
    linker.link_author(author_id).await.unwrap();

    let en_group = repo
        .get_quote(en_id)
        .await
        .unwrap()
        .unwrap()
        .bilingual_group_id
        .unwrap();
    let ru_group = repo
        .get_quote(ru_id)
        .await
        .unwrap()
        .unwrap()
        .bilingual_group_id
        .unwrap();
    assert_eq!(en_group, ru_group);

    let members = repo.quotes_by_group(en_group).await.unwrap();
    let ids: Vec<i64> = members.iter().map(|q| q.id).collect();
    assert!(ids.contains(&en_id));
    assert!(ids.contains(&ru_id));
}

#[tokio::test]
async fn test_linkAuthor_withLowOverlap_shouldNotLink() {
    let repo = Repository::new_in_memory().unwrap();
    let author = repo.get_or_create_author("Гёте", Lang::Ru, None).await.unwrap();

    repo.create_quote(
        "Whatever you can do or dream you can, begin it now today.",
        Lang::En,
        Some(author.id),
        None,
    )
    .await
    .unwrap();
    repo.create_quote(
        "Посреди трудностей лежит возможность, сказал однажды мудрец.",
        Lang::Ru,
        Some(author.id),
        None,
    )
    .await
    .unwrap();

    let linker = BilingualLinker::new(repo.clone(), LinkerConfig::default());
    let result = linker.link_author(author.id).await.unwrap();

    assert_eq!(result.links_created, 0);
    assert_eq!(result.groups_assigned, 0);
}

#[tokio::test]
async fn test_linkAuthor_withRaisedThresholds_shouldBecomeStricter() {
    let (repo, author_id, _, _) = pushkin_corpus().await;

    let strict = LinkerConfig {
        min_overlap: 10,
        min_ratio: 1.1, // unreachable on purpose
        min_confidence: 100,
        ..Default::default()
    };
    // min_ratio above 1.0 never passes validation in real config files;
    // here it just disables the ratio acceptance path
    let linker = BilingualLinker::new(repo.clone(), strict);
    let result = linker.link_author(author_id).await.unwrap();

    assert_eq!(result.links_created, 0);
}

#[tokio::test]
async fn test_linkAuthor_calledConcurrently_shouldNotDuplicateRows() {
    let (repo, author_id, _, _) = pushkin_corpus().await;
    let linker = BilingualLinker::new(repo.clone(), LinkerConfig::default());

    let (a, b) = tokio::join!(linker.link_author(author_id), linker.link_author(author_id));
    let total = a.unwrap().links_created + b.unwrap().links_created;

    // However the two runs interleave, the unordered-pair constraint keeps
    // exactly one row
    let links = repo.links_for_author(author_id).await.unwrap();
    assert_eq!(links.len(), 1);
    assert!(total >= 1);
}
