/*!
 * Tests for application configuration functionality
 */

use aphorium::app_config::{Config, TranslationProviderKind};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_config_fromFile_withMissingFile_shouldCreateDefault() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::from_file(&path).unwrap();

    assert!(path.exists(), "default config file should be written");
    assert_eq!(config.validator.min_length, 30);
    assert_eq!(config.search.default_limit, 20);
}

#[test]
fn test_config_fromFile_shouldRoundTripThroughSave() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.linker.min_overlap = 6;
    config.translation.provider = TranslationProviderKind::MyMemory;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.linker.min_overlap, 6);
    assert_eq!(loaded.translation.provider, TranslationProviderKind::MyMemory);
}

#[test]
fn test_config_fromFile_withPartialJson_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        &dir.path().to_path_buf(),
        "partial.json",
        r#"{"search": {"max_limit": 50}}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.search.max_limit, 50);
    assert_eq!(config.search.default_limit, 20);
    assert_eq!(config.validator.secondary_threshold, 150);
    assert!(config.translation.cache_enabled);
}

#[test]
fn test_config_fromFile_withInvalidValues_shouldFailValidation() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        &dir.path().to_path_buf(),
        "invalid.json",
        r#"{"linker": {"worker_count": 0}}"#,
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_config_fromFile_withMalformedJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(&dir.path().to_path_buf(), "broken.json", "{not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}
