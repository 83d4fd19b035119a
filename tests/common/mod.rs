#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use sat_api::auth::AUTH_HEADER;
use sat_api::config::AppConfig;
use sat_api::database::InMemoryStore;
use sat_api::{app, AppState};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        let state = AppState::new(config, Arc::new(InMemoryStore::new()))?;

        let listener = std::net::TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("failed to bind {}", base_url))?;
        listener.set_nonblocking(true)?;

        // Each #[tokio::test] owns a short-lived runtime, so the server gets its own
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("failed to adopt listener");
                axum::serve(listener, app(state)).await.expect("server");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Alphanumeric user name unique to this test run
pub fn unique_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..10])
}

pub async fn register(server: &TestServer, name: &str, password: &str) -> Result<Value> {
    let res = reqwest::Client::new()
        .post(server.url("/api/users"))
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", name),
            "password": password,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration of {} failed: {}",
        name,
        res.status()
    );
    Ok(res.json::<Value>().await?)
}

/// Logs in with `username:password` in the body and returns the issued token
pub async fn login(server: &TestServer, name: &str, password: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/api/login"))
        .body(format!("{}:{}", name, password))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login of {} failed: {}", name, res.status());

    let token = res
        .headers()
        .get(AUTH_HEADER)
        .context("login response carries no token")?
        .to_str()?
        .to_string();
    Ok(token)
}

/// Registers a fresh user and logs them in
pub async fn signed_in_user(server: &TestServer, prefix: &str) -> Result<(String, String)> {
    let name = unique_name(prefix);
    register(server, &name, "secret123").await?;
    let token = login(server, &name, "secret123").await?;
    Ok((name, token))
}
