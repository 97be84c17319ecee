#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use cluster_health::MonitorConfig;
use cluster_health::schemas::{BootstrapDoc, NodeEntry, PoolDoc, PoolEntry};

pub const DEFAULT_POOL_URI: &str = "/pools/default?uuid=4f2a";

/// What the fake server answers with. Everything is mutable while it runs.
struct Script {
    pools: Vec<PoolEntry>,
    nodes: Vec<String>,
    bootstrap_status: StatusCode,
    pool_status: StatusCode,
    bootstrap_body: Option<String>,
    pool_body: Option<String>,
    pool_delay: Duration,
    bootstrap_hits: usize,
    pool_hits: usize,
}

type SharedScript = Arc<Mutex<Script>>;

/// An in-process stand-in for a cluster's REST status API.
pub struct FakeCluster {
    pub addr: SocketAddr,
    pub url: String,
    script: SharedScript,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<Result<()>>,
}

impl FakeCluster {
    pub async fn new(statuses: &[&str]) -> Result<Self> {
        let script = Arc::new(Mutex::new(Script {
            pools: vec![PoolEntry {
                name: "default".to_string(),
                uri: DEFAULT_POOL_URI.to_string(),
            }],
            nodes: statuses.iter().map(|s| s.to_string()).collect(),
            bootstrap_status: StatusCode::OK,
            pool_status: StatusCode::OK,
            bootstrap_body: None,
            pool_body: None,
            pool_delay: Duration::ZERO,
            bootstrap_hits: 0,
            pool_hits: 0,
        }));

        let app = Router::new()
            .route("/pools", get(bootstrap_handler))
            .route("/pools/{name}", get(pool_handler))
            .route("/elsewhere/{name}", get(pool_handler))
            .with_state(script.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = format!("http://{}", addr);

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await?;
            Ok::<(), anyhow::Error>(())
        });

        Ok(Self {
            addr,
            url,
            script,
            shutdown_tx,
            handle,
        })
    }

    pub async fn healthy(n: usize) -> Result<Self> {
        Self::new(&vec!["healthy"; n]).await
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    pub fn config(&self) -> MonitorConfig {
        MonitorConfig::new("127.0.0.1", self.addr.port())
    }

    pub fn set_nodes(&self, statuses: &[&str]) {
        self.script().nodes = statuses.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_pools(&self, pools: &[(&str, &str)]) {
        self.script().pools = pools
            .iter()
            .map(|(name, uri)| PoolEntry {
                name: name.to_string(),
                uri: uri.to_string(),
            })
            .collect();
    }

    pub fn fail_bootstrap(&self, status: StatusCode) {
        self.script().bootstrap_status = status;
    }

    pub fn fail_pool(&self, status: StatusCode) {
        self.script().pool_status = status;
    }

    pub fn set_bootstrap_body(&self, body: &str) {
        self.script().bootstrap_body = Some(body.to_string());
    }

    pub fn set_pool_body(&self, body: &str) {
        self.script().pool_body = Some(body.to_string());
    }

    pub fn set_pool_delay(&self, delay: Duration) {
        self.script().pool_delay = delay;
    }

    /// Back to well-formed 200 responses.
    pub fn heal(&self) {
        let mut script = self.script();
        script.bootstrap_status = StatusCode::OK;
        script.pool_status = StatusCode::OK;
        script.bootstrap_body = None;
        script.pool_body = None;
        script.pool_delay = Duration::ZERO;
    }

    pub fn bootstrap_hits(&self) -> usize {
        self.script().bootstrap_hits
    }

    pub fn pool_hits(&self) -> usize {
        self.script().pool_hits
    }

    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.handle.abort();
        let _ = self.handle.await;
        Ok(())
    }
}

async fn bootstrap_handler(State(script): State<SharedScript>) -> Response {
    let (status, body) = {
        let mut script = script.lock().unwrap();
        script.bootstrap_hits += 1;
        let body = match &script.bootstrap_body {
            Some(body) => body.clone(),
            None => serde_json::to_string(&BootstrapDoc {
                pools: script.pools.clone(),
            })
            .unwrap(),
        };
        (script.bootstrap_status, body)
    };

    (status, body).into_response()
}

async fn pool_handler(State(script): State<SharedScript>) -> Response {
    let (status, body, delay) = {
        let mut script = script.lock().unwrap();
        script.pool_hits += 1;
        let body = match &script.pool_body {
            Some(body) => body.clone(),
            None => serde_json::to_string(&PoolDoc {
                nodes: script
                    .nodes
                    .iter()
                    .map(|s| NodeEntry { status: s.clone() })
                    .collect(),
            })
            .unwrap(),
        };
        (script.pool_status, body, script.pool_delay)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    (status, body).into_response()
}

/// A local address nothing listens on.
pub async fn closed_addr() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

/// Poll `cond` until it holds or `timeout_ms` elapses.
pub async fn wait_until<F: Fn() -> bool>(cond: F, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
