mod common;

use common::ENV_LOCK;
use fakturoid_mcp::config::{Config, ConfigError};
use fakturoid_mcp::fakturoid::Endpoints;
use std::path::PathBuf;

const KEYS: &[&str] = &[
    "FAKTUROID_CLIENT_ID",
    "FAKTUROID_CLIENT_SECRET",
    "FAKTUROID_SLUG",
    "FAKTUROID_BASE_URL",
    "FAKTUROID_TOKEN_URL",
    "FAKTUROID_CONFIG_PATH",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

fn temp_config(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("fakturoid-config-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn file_values_are_used_when_env_is_empty() {
    let _guard = ENV_LOCK.lock().await;
    clear_env();
    let path = temp_config(
        r#"{"client_id":"file-id","client_secret":"file-secret","slug":"acme"}"#,
    );
    std::env::set_var("FAKTUROID_CONFIG_PATH", &path);

    let config = Config::load().unwrap();
    assert_eq!(config.credentials.client_id, "file-id");
    assert_eq!(config.credentials.slug, "acme");
    assert_eq!(config.endpoints, Endpoints::default());
    assert_eq!(config.source_path, path);

    clear_env();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn environment_overrides_file_and_endpoints() {
    let _guard = ENV_LOCK.lock().await;
    clear_env();
    let path = temp_config(
        r#"{"client_id":"file-id","client_secret":"file-secret","slug":"acme"}"#,
    );
    std::env::set_var("FAKTUROID_CONFIG_PATH", &path);
    std::env::set_var("FAKTUROID_SLUG", "other");
    std::env::set_var("FAKTUROID_BASE_URL", "http://localhost:8080/api/v3/");

    let config = Config::load().unwrap();
    assert_eq!(config.credentials.slug, "other");
    assert_eq!(config.credentials.client_secret, "file-secret");
    assert_eq!(config.endpoints.base_url, "http://localhost:8080/api/v3");

    clear_env();
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn missing_credentials_are_fatal() {
    let _guard = ENV_LOCK.lock().await;
    clear_env();
    let path = std::env::temp_dir().join(format!("fakturoid-absent-{}.json", uuid::Uuid::new_v4()));
    std::env::set_var("FAKTUROID_CONFIG_PATH", &path);
    std::env::set_var("FAKTUROID_SLUG", "acme");

    let err = Config::load().unwrap_err();
    assert!(matches!(err, ConfigError::MissingCredentials { .. }));
    assert!(err.to_string().contains("FAKTUROID_CLIENT_ID"));

    clear_env();
}

#[tokio::test]
async fn broken_config_file_is_reported() {
    let _guard = ENV_LOCK.lock().await;
    clear_env();
    let path = temp_config("client_id = nope");
    std::env::set_var("FAKTUROID_CONFIG_PATH", &path);
    std::env::set_var("FAKTUROID_CLIENT_ID", "id");
    std::env::set_var("FAKTUROID_CLIENT_SECRET", "secret");
    std::env::set_var("FAKTUROID_SLUG", "acme");

    let err = Config::load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFile { .. }));

    clear_env();
    let _ = std::fs::remove_file(&path);
}
