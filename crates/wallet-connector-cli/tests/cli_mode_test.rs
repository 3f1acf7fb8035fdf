/*
[INPUT]:  Built CLI binary, temp configuration and a mock auth service
[OUTPUT]: Test results for end-to-end command execution
[POS]:    Integration tests - binary behaviour
[UPDATE]: When changing commands, flags or output formats
*/

use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::{Value, json};
use tokio::process::Command;
use tokio_test::assert_ok;
use wallet_connector_cli::CliConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &str = env!("CARGO_BIN_EXE_wallet-connector");
const KEY_ENV: &str = "WALLET_CONNECTOR_CLI_TEST_KEY";
// A well-known test private key
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

struct Workspace {
    dir: PathBuf,
    config_path: PathBuf,
}

impl Workspace {
    fn new(auth_base_url: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("wallet-connector-cli-{}", uuid::Uuid::new_v4()));
        let config_path = dir.join("config.yaml");
        let yaml = format!(
            r#"
client_id: cli-client
auth_base_url: {auth_base_url}
active_chain: 1
chains:
  - {{ id: 1, name: ethereum, rpc: ["https://eth.example.org"] }}
  - {{ id: 137, name: polygon, rpc: ["https://polygon.example.org"] }}
signer:
  private_key_env: {KEY_ENV}
credentials_path: {}
"#,
            dir.join("session.json").display()
        );
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&config_path, yaml).unwrap();
        Self { dir, config_path }
    }

    async fn run(&self, args: &[&str]) -> Output {
        run_binary(&self.config_path, args).await
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

async fn run_binary(config_path: &Path, args: &[&str]) -> Output {
    Command::new(BINARY)
        .arg("--config")
        .arg(config_path)
        .arg("--log-level")
        .arg("error")
        .args(args)
        .env(KEY_ENV, TEST_KEY)
        .output()
        .await
        .expect("failed to start wallet-connector binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

async fn status_json(workspace: &Workspace) -> Value {
    let output = workspace.run(&["status", "--json"]).await;
    assert_success(&output);
    assert_ok!(serde_json::from_slice(&output.stdout))
}

async fn auth_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "cli@b.com" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn chains_lists_fixture_with_active_marker() {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/config.yaml");
    let output = run_binary(&fixture, &["chains"]).await;
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('*') && lines[0].contains("ethereum"));
    assert!(lines[1].contains("polygon"));
}

#[tokio::test]
async fn status_without_session_is_disconnected() {
    let workspace = Workspace::new("http://127.0.0.1:9");
    let status = status_json(&workspace).await;
    assert_eq!(status["connected"], false);
    assert_eq!(status["email"], Value::Null);
    assert_eq!(status["client_id"], "cli-client");
}

#[tokio::test]
async fn jwt_login_persists_session_across_runs() {
    let server = auth_server().await;
    let workspace = Workspace::new(&server.uri());

    let output = workspace.run(&["login", "jwt", "--token", "abc"]).await;
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains(TEST_ADDRESS));

    let status = status_json(&workspace).await;
    assert_eq!(status["connected"], true);
    assert_eq!(status["email"], "cli@b.com");
    assert_eq!(status["address"], TEST_ADDRESS);

    assert_success(&workspace.run(&["logout"]).await);
    let status = status_json(&workspace).await;
    assert_eq!(status["connected"], false);
}

#[tokio::test]
async fn switch_chain_updates_config() {
    let server = auth_server().await;
    let workspace = Workspace::new(&server.uri());
    assert_success(&workspace.run(&["login", "jwt", "--token", "abc"]).await);

    assert_success(&workspace.run(&["switch-chain", "137"]).await);
    let config = assert_ok!(CliConfig::from_file(&workspace.config_path));
    assert_eq!(config.active_chain, 137);

    let unknown = workspace.run(&["switch-chain", "56"]).await;
    assert!(!unknown.status.success());
    let config = assert_ok!(CliConfig::from_file(&workspace.config_path));
    assert_eq!(config.active_chain, 137);
}

#[tokio::test]
async fn switch_chain_requires_login() {
    let workspace = Workspace::new("http://127.0.0.1:9");
    let output = workspace.run(&["switch-chain", "137"]).await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn otp_login_on_restored_session_sends_no_code() {
    let server = auth_server().await;
    let workspace = Workspace::new(&server.uri());
    assert_success(&workspace.run(&["login", "jwt", "--token", "abc"]).await);

    let output = workspace
        .run(&["login", "otp", "--email", "cli@b.com", "--code", "123456"])
        .await;
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Already connected"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(
        requests
            .iter()
            .all(|request| !request.url.path().starts_with("/v1/auth/otp"))
    );
}
