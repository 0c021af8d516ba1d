//! End-to-end tests against a fake `op` shell script.
//!
//! The script stands in for the real CLI so the process bridge, path
//! resolution and error classification run together without 1Password.

#![cfg(unix)]

use oplaunch::{Config, OpClient, OplaunchError, PreferenceStore};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const FAKE_OP: &str = r#"#!/bin/sh
case "$*" in
  "--version")
    echo "2.30.0" ;;
  "whoami" | "whoami --format=json")
    echo '{"url":"my.1password.com","email":"jo@example.com","user_uuid":"U1","account_uuid":"A1","user_type":"HUMAN"}' ;;
  "vault list --format=json")
    echo '[{"id":"v2","name":"work"},{"id":"v1","name":"Private"}]' ;;
  "items list --long --vault=Private --format=json")
    echo '[{"id":"i2","title":"zoom","category":"LOGIN"},{"id":"i1","title":"Amazon","category":"LOGIN"}]' ;;
  "item get github --fields password --reveal")
    echo "hunter2" ;;
  "item get github --otp")
    echo "123456" ;;
  "item get ghost --format=json")
    echo "[ERROR] 2024/05/01 09:00:00 \"ghost\" isn't an item. Specify the item with its UUID, name, or domain." >&2
    exit 1 ;;
  "item get github --fields pin --reveal")
    echo "[ERROR] 2024/05/01 09:00:00 item github does not have a field pin" >&2
    exit 1 ;;
  "signin")
    echo "signed in via $0" ;;
  *)
    echo "[ERROR] 2024/05/01 09:00:00 unknown command: $*" >&2
    exit 1 ;;
esac
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn setup() -> (TempDir, OpClient) {
    let dir = tempdir().unwrap();
    let op = write_script(dir.path(), "op", FAKE_OP);
    let config = Config::default()
        .with_cli_path(op.to_string_lossy())
        .with_cli_fallbacks(Vec::new())
        .with_shell_path("/bin/sh")
        .with_shell_fallbacks(Vec::new());
    (dir, OpClient::new(config))
}

#[tokio::test]
async fn test_status_and_whoami() {
    let (_dir, client) = setup();

    assert!(client.check_cli().await);
    assert_eq!(client.cli_version().await.unwrap(), "2.30.0");
    assert!(client.is_signed_in().await);

    let user = client.whoami().await.unwrap();
    assert_eq!(user.email, "jo@example.com");
    assert_eq!(user.user_type.as_deref(), Some("HUMAN"));
}

#[tokio::test]
async fn test_listings_are_sorted() {
    let (_dir, client) = setup();

    let vaults = client.list_vaults().await.unwrap();
    let names: Vec<_> = vaults.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Private", "work"]);

    let items = client
        .list_items(&["--vault=Private".to_string()])
        .await
        .unwrap();
    assert_eq!(items[0].title, "Amazon");
    assert_eq!(items[1].title, "zoom");
}

#[tokio::test]
async fn test_fields_and_otp() {
    let (_dir, client) = setup();

    assert_eq!(client.get_field("github", "password").await.unwrap(), "hunter2");
    assert_eq!(client.get_otp("github").await.unwrap(), "123456");
}

#[tokio::test]
async fn test_cli_errors_are_classified() {
    let (_dir, client) = setup();

    let err = client.get_item("ghost", false).await.unwrap_err();
    assert!(matches!(err.root(), OplaunchError::NotFound));
    assert_eq!(err.title(), "Item not found on 1Password.");

    let err = client.get_field("github", "pin").await.unwrap_err();
    match err.root() {
        OplaunchError::MissingField(field) => assert_eq!(field, "pin"),
        other => panic!("expected missing field, got {:?}", other),
    }

    let err = client.list_accounts().await.unwrap_err();
    assert!(matches!(err.root(), OplaunchError::Extension(_)));
}

#[tokio::test]
async fn test_sign_in_runs_through_shell() {
    let (_dir, client) = setup();

    let output = client.sign_in(None).await.unwrap();
    assert!(output.starts_with("signed in via"));
}

#[tokio::test]
async fn test_missing_cli() {
    let dir = tempdir().unwrap();
    let client = OpClient::new(
        Config::default()
            .with_cli_path(dir.path().join("op").to_string_lossy())
            .with_cli_fallbacks(Vec::new()),
    );

    assert!(!client.check_cli().await);
    assert!(!client.is_signed_in().await);
    let err = client.list_vaults().await.unwrap_err();
    assert!(err.is_setup_error());
}

#[tokio::test]
async fn test_preferences_select_cli() {
    let (dir, _client) = setup();
    let store = PreferenceStore::open(dir.path().join("state/preferences.json"))
        .await
        .unwrap();

    let mut prefs = store.load().await.unwrap();
    prefs.cli_path = dir.path().join("op").to_string_lossy().into_owned();
    store.save(&prefs).await.unwrap();

    let prefs = store.load().await.unwrap();
    let client = OpClient::new(Config::from_preferences(&prefs).with_cli_fallbacks(Vec::new()));
    assert_eq!(client.cli_version().await.unwrap(), "2.30.0");
}
