//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, configured so the active
//! Claude provider points at an `httpmock::MockServer`.

// Not every helper is used by every test file that includes this module.
#![allow(unused)]

use anyhow::Result;
use bystander_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use axum::serve;
use httpmock::MockServer;
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, sync::Once};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .with_test_writer()
            .try_init();
    });
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Loads a config file that points the Claude provider at the mock server.
    async fn load_config(mock_server: &MockServer) -> Result<(AppConfig, TempDir)> {
        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
active_provider: "claude"
providers:
  claude:
    provider: "claude"
    api_url: "{}"
    api_key: "test-claude-key"
    model_name: "mock-claude-model"
    max_tokens: 1024
    temperature: 0.6
"#,
            mock_server.url("/v1/messages")
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        Ok((config, config_dir))
    }

    /// Spawns the server with an enabled provider backed by the mock server.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let (config, config_dir) = Self::load_config(&mock_server).await?;
        let app_state = build_app_state(&config)?;

        let mut app = TestApp::spawn_with_state(app_state, mock_server).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    /// Spawns the server with the active provider's key removed.
    pub async fn spawn_disabled() -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let (mut config, config_dir) = Self::load_config(&mock_server).await?;
        for provider in config.providers.values_mut() {
            provider.api_key = None;
        }
        let app_state = build_app_state(&config)?;

        let mut app = TestApp::spawn_with_state(app_state, mock_server).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        setup_tracing();
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// An Anthropic Messages API reply carrying `text`.
pub fn claude_reply(text: &str) -> Value {
    json!({
        "id": "msg_mock",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": 25, "output_tokens": 60}
    })
}
