#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use latency_monitor::info::InfoService;
use latency_monitor::store::{RawSample, SampleStore, StoreError};
use latency_monitor::{server, AppState};

/// One stored request: the ranking key and the projected value.
#[derive(Debug, Clone)]
pub struct Record {
    pub endpoint: String,
    pub timestamp: i64,
    pub duration: RawSample,
}

/// In-memory stand-in for the Redis layout: ranks an endpoint's records
/// by timestamp, newest first, and projects their duration.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, endpoint: &str, timestamp: i64, duration: &str) {
        self.push_bytes(endpoint, timestamp, duration.as_bytes());
    }

    pub fn push_bytes(&self, endpoint: &str, timestamp: i64, duration: &[u8]) {
        self.records.lock().push(Record {
            endpoint: endpoint.to_owned(),
            timestamp,
            duration: Some(duration.to_vec()),
        });
    }

    pub fn push_without_duration(&self, endpoint: &str, timestamp: i64) {
        self.records.lock().push(Record {
            endpoint: endpoint.to_owned(),
            timestamp,
            duration: None,
        });
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn latest_durations(
        &self,
        endpoint: &str,
        limit: usize,
    ) -> Result<Vec<RawSample>, StoreError> {
        let mut matching: Vec<Record> = self
            .records
            .lock()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|r| r.duration)
            .collect())
    }
}

/// Serves the router on an ephemeral port.
/// Returns (base_url, shutdown_sender).
pub async fn spawn_app(store: Arc<dyn SampleStore>, endpoint: &str) -> (String, oneshot::Sender<()>) {
    let state = Arc::new(AppState {
        info: InfoService::new(store, endpoint, 100),
    });
    let app = server::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (format!("http://{addr}"), shutdown_tx)
}

/// Where a fake Redis server stops answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stall {
    /// Accepts the TCP connection but never replies.
    Handshake,
    /// Acknowledges `CLIENT SETINFO` during setup, then hangs on `SELECT`.
    Select,
}

/// Serves a fake Redis on an ephemeral port that hangs at `stall`.
/// Connections are held open until the test runtime shuts down.
pub async fn spawn_stalling_redis(stall: Stall) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut seen = String::new();
                let mut answered = 0;
                let mut chunk = [0u8; 1024];
                loop {
                    let n = match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    if stall == Stall::Handshake {
                        continue;
                    }
                    seen.push_str(&String::from_utf8_lossy(&chunk[..n]));
                    if seen.contains("SELECT") {
                        std::future::pending::<()>().await;
                    }
                    let pending = seen.matches("SETINFO").count() - answered;
                    for _ in 0..pending {
                        if socket.write_all(b"+OK\r\n").await.is_err() {
                            return;
                        }
                    }
                    answered += pending;
                }
            });
        }
    });

    addr
}
