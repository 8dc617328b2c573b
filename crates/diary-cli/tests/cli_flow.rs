use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::Arc;

use diary_core::crypto::{derive_access_credential, KdfParams};
use diary_server::{router, AppState, FileBlobStore};
use secrecy::SecretString;
use tempfile::{tempdir, TempDir};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_diary"))
}

fn test_params() -> KdfParams {
    KdfParams::argon2id(vec![5u8; 16], 1024, 1, 1).expect("valid params")
}

struct Fixture {
    addr: SocketAddr,
    data: TempDir,
    config_home: TempDir,
}

async fn start(password: &str) -> Fixture {
    let data = tempdir().expect("data dir");
    let config_home = tempdir().expect("config dir");
    let kdf = test_params();
    let secret = derive_access_credential(password, &kdf).expect("credential");
    let store = Arc::new(FileBlobStore::new(data.path()));
    let state = AppState::new(store, SecretString::from(secret.as_str().to_string()), kdf);
    let app = router(state, 1024 * 1024);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    Fixture {
        addr,
        data,
        config_home,
    }
}

fn diary(fixture: &Fixture, passphrase: &str, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("XDG_CONFIG_HOME", fixture.config_home.path())
        .env("DIARY_SERVER_URL", format!("http://{}", fixture.addr))
        .env("DIARY_PASSPHRASE", passphrase)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DIARY_CONFIG")
        .output()
        .expect("run diary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_list_edit_show_history() {
    let fx = start("p1").await;

    let output = diary(&fx, "p1", &["list"]);
    assert_success(&output);
    assert!(stdout(&output).contains("No entries."));

    assert_success(&diary(&fx, "p1", &["add", "--body", "Day 1\nwent well"]));
    assert_success(&diary(&fx, "p1", &["add", "--body", "Day 2"]));

    let output = diary(&fx, "p1", &["list"]);
    assert_success(&output);
    let listing = stdout(&output);
    assert!(listing.contains("Day 1"));
    assert!(listing.contains("Day 2"));

    assert_success(&diary(&fx, "p1", &["edit", "1", "--body", "Day 1, revised"]));

    let output = diary(&fx, "p1", &["show", "1", "--json"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["revisions"], 2);
    assert_eq!(value["content"], "Day 1, revised");
    assert_eq!(value["history"][0]["content"], "Day 1\nwent well");

    let output = diary(&fx, "p1", &["history", "1"]);
    assert_success(&output);
    let history = stdout(&output);
    let first = history.find("went well").expect("first revision");
    let second = history.find("Day 1, revised").expect("second revision");
    assert!(first < second, "history is oldest first");

    // Only ciphertext reaches the server.
    let blob = std::fs::read_to_string(fx.data.path().join("journal.enc")).expect("blob");
    assert!(!blob.is_empty());
    assert!(!blob.contains("Day"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hide_and_unhide() {
    let fx = start("p1").await;
    assert_success(&diary(&fx, "p1", &["add", "--body", "secret thoughts"]));
    assert_success(&diary(&fx, "p1", &["add", "--body", "public thoughts"]));

    assert_success(&diary(&fx, "p1", &["hide", "1"]));

    let visible = stdout(&diary(&fx, "p1", &["list", "--json"]));
    let visible: serde_json::Value = serde_json::from_str(&visible).expect("json");
    assert_eq!(visible.as_array().expect("array").len(), 1);
    assert_eq!(visible[0]["number"], 2);

    let all = stdout(&diary(&fx, "p1", &["list", "--all", "--json"]));
    let all: serde_json::Value = serde_json::from_str(&all).expect("json");
    assert_eq!(all.as_array().expect("array").len(), 2);
    assert_eq!(all[0]["hidden"], true);

    assert_success(&diary(&fx, "p1", &["unhide", "1"]));
    let visible = stdout(&diary(&fx, "p1", &["list", "--json"]));
    let visible: serde_json::Value = serde_json::from_str(&visible).expect("json");
    assert_eq!(visible.as_array().expect("array").len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wrong_passphrase_exits_with_auth_code() {
    let fx = start("p1").await;
    assert_success(&diary(&fx, "p1", &["add", "--body", "mine"]));

    let output = diary(&fx, "wrong", &["list"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("passphrase"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_entry_exits_with_not_found_code() {
    let fx = start("p1").await;

    let output = diary(&fx, "p1", &["show", "7"]);

    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reset_requires_yes_and_skips_readable_journal() {
    let fx = start("p1").await;
    assert_success(&diary(&fx, "p1", &["add", "--body", "keep me"]));

    let output = diary(&fx, "p1", &["reset"]);
    assert_eq!(output.status.code(), Some(1));

    let output = diary(&fx, "p1", &["reset", "--yes"]);
    assert_success(&output);
    assert!(stdout(&output).contains("nothing to reset"));
    assert!(stdout(&diary(&fx, "p1", &["list"])).contains("keep me"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reset_replaces_unreadable_journal() {
    let fx = start("p1").await;
    std::fs::write(fx.data.path().join("journal.enc"), "bm90IGEgam91cm5hbA==")
        .expect("corrupt blob");

    let output = diary(&fx, "p1", &["list"]);
    assert_eq!(output.status.code(), Some(6));

    assert_success(&diary(&fx, "p1", &["reset", "--yes"]));
    let output = diary(&fx, "p1", &["list"]);
    assert_success(&output);
    assert!(stdout(&output).contains("No entries."));
}

#[test]
fn test_missing_server_is_not_found() {
    let config_home = tempdir().expect("config dir");
    let output = Command::new(bin())
        .args(["list"])
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("DIARY_SERVER_URL")
        .env_remove("DIARY_CONFIG")
        .env("DIARY_PASSPHRASE", "p1")
        .output()
        .expect("run diary");

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No journal server configured"));
}

#[test]
fn test_server_url_from_config_file() {
    let config_home = tempdir().expect("config dir");
    let dir = config_home.path().join("diary");
    std::fs::create_dir_all(&dir).expect("mkdir");
    // Nothing listens on port 9; reaching the network layer proves the URL was used.
    std::fs::write(
        dir.join("config.toml"),
        "[server]\nurl = \"http://127.0.0.1:9\"\ntimeout_seconds = 2\n",
    )
    .expect("write config");

    let output = Command::new(bin())
        .args(["list"])
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("DIARY_SERVER_URL")
        .env_remove("DIARY_CONFIG")
        .env("DIARY_PASSPHRASE", "p1")
        .output()
        .expect("run diary");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Network error"));
}

#[test]
fn test_completions_generate() {
    let output = Command::new(bin())
        .args(["completions", "bash"])
        .output()
        .expect("run diary");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("diary"));
}
