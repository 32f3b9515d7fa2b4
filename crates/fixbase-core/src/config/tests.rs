use std::collections::HashMap;

use tempfile::tempdir;

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_use_local_storage_under_root() {
    let config = AppConfig::defaults("/tmp/fixbase-root");
    assert_eq!(config.storage, StorageKind::Local);
    assert_eq!(config.top_limit, DEFAULT_TOP_LIMIT);
    assert_eq!(
        config.database_path(),
        PathBuf::from("/tmp/fixbase-root").join(DATABASE_FILE_NAME)
    );
    assert!(!config.seed_on_start);
}

#[test]
fn env_overrides_file_values() {
    let mut config = AppConfig::defaults("root");
    config
        .apply_toml(
            r#"
            storage = "local"
            top_limit = 8

            [remote]
            url = "https://file.example.test"
            timeout_ms = 900
            "#,
        )
        .expect("toml");
    assert_eq!(config.top_limit, 8);

    config
        .apply_env(&env_from(&[
            (STORAGE_ENV, "remote"),
            (REMOTE_URL_ENV, "https://env.example.test/"),
            (REMOTE_API_KEY_ENV, "anon"),
            (SEED_ENV, "yes"),
            (TOP_LIMIT_ENV, "0"),
        ]))
        .expect("env");

    assert_eq!(config.storage, StorageKind::Remote);
    assert_eq!(config.top_limit, 8, "zero limit is ignored");
    assert!(config.seed_on_start);

    let remote = config.remote_config().expect("remote config");
    assert_eq!(remote.base_url, "https://env.example.test");
    assert_eq!(remote.api_key.as_deref(), Some("anon"));
    assert_eq!(remote.timeout_ms, 900);
}

#[test]
fn unknown_storage_kind_is_a_config_error() {
    let mut config = AppConfig::defaults("root");
    let err = config
        .apply_env(&env_from(&[(STORAGE_ENV, "floppy")]))
        .expect_err("must reject");
    assert_eq!(err.code(), "CONFIG_ERROR");
}

#[test]
fn remote_without_url_is_rejected() {
    let config = AppConfig::defaults("root").with_storage(StorageKind::Remote);
    assert!(matches!(
        config.remote_config(),
        Err(FixbaseError::Config(_))
    ));
}

#[test]
fn load_reads_config_file_from_root() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join(CONFIG_FILE_NAME), "seed = true\ntop_limit = 3\n")
        .expect("write config");

    let mut config = AppConfig::defaults(temp.path());
    config
        .apply_file(&temp.path().join(CONFIG_FILE_NAME))
        .expect("apply file");
    assert!(config.seed_on_start);
    assert_eq!(config.top_limit, 3);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut config = AppConfig::defaults("root");
    assert!(config.apply_toml("colour = \"blue\"").is_err());
}
