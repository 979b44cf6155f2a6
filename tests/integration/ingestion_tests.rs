/*!
 * Ingestion and cleanup workflow tests
 */

use aphorium::app_controller::Controller;
use aphorium::language::Lang;
use aphorium::store::Repository;

use crate::common::{create_temp_dir, create_test_file, test_config};

const FRAGMENT_FILE: &str = r#"[
  {
    "text": "The only way to do great work is to love what you do.",
    "language": "en",
    "author": "Steve Jobs",
    "source": "Stanford Commencement Address",
    "source_type": "speech"
  },
  {
    "text": "Посреди трудностей лежит возможность.",
    "language": "ru",
    "author": "Альберт Эйнштейн"
  },
  {
    "text": "\"Can Socialists Be Happy?\", Tribune (20 December 1943)",
    "language": "en",
    "author": "George Orwell"
  },
  {
    "text": "https://en.wikiquote.org/wiki/George_Orwell",
    "language": "en",
    "author": "George Orwell"
  }
]"#;

fn controller() -> Controller {
    let repo = Repository::new_in_memory().expect("Failed to create repository");
    Controller::with_repository(test_config(), repo)
}

#[tokio::test]
async fn test_ingestFile_shouldStoreQuotesWithAuthorsAndSources() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "fragments.json", FRAGMENT_FILE).unwrap();

    let controller = controller();
    let report = controller.ingest_file(&path).await.unwrap();

    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected, 2);
    assert_eq!(report.duplicates, 0);

    let stats = controller.stats().unwrap();
    assert_eq!(stats.quote_count_en, 1);
    assert_eq!(stats.quote_count_ru, 1);
    assert_eq!(stats.author_count, 2);
    assert_eq!(stats.source_count, 1);
}

#[tokio::test]
async fn test_ingestFile_runTwice_shouldOnlyCountDuplicates() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "fragments.json", FRAGMENT_FILE).unwrap();

    let controller = controller();
    controller.ingest_file(&path).await.unwrap();
    let second = controller.ingest_file(&path).await.unwrap();

    assert_eq!(second.accepted, 0);
    assert_eq!(second.duplicates, 2);

    let stats = controller.stats().unwrap();
    assert_eq!(stats.quote_count_en + stats.quote_count_ru, 2);
}

#[tokio::test]
async fn test_ingestFile_withMissingFile_shouldFail() {
    let controller = controller();
    assert!(controller.ingest_file("no/such/file.json").await.is_err());
}

#[tokio::test]
async fn test_ingestFile_withMalformedJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "broken.json", "[{]").unwrap();

    let controller = controller();
    assert!(controller.ingest_file(&path).await.is_err());
}

#[tokio::test]
async fn test_cleanup_afterRuleTightening_shouldPurgeOldNoise() {
    let controller = controller();

    // Rows planted directly, as if stored by an older, laxer rule set
    controller
        .repository()
        .create_quote(
            "Собрание сочинений, Издательство Художественная литература",
            Lang::Ru,
            None,
            None,
        )
        .await
        .unwrap();
    controller
        .repository()
        .create_quote(
            "The only way to do great work is to love what you do.",
            Lang::En,
            None,
            None,
        )
        .await
        .unwrap();

    let dry = controller.cleanup(true).await.unwrap();
    assert_eq!(dry.examined, 2);
    assert_eq!(dry.deleted, 1);

    // Dry run left both rows in place
    assert_eq!(controller.repository().all_quotes().await.unwrap().len(), 2);

    let executed = controller.cleanup(false).await.unwrap();
    assert_eq!(executed.deleted, 1);
    assert_eq!(controller.repository().all_quotes().await.unwrap().len(), 1);
}
