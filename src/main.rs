use std::sync::Arc;

use clap::Parser;
use tracing::info;

use latency_monitor::config::Config;
use latency_monitor::info::InfoService;
use latency_monitor::store::RedisSampleStore;
use latency_monitor::{server, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "latency_monitor=info,tower_http=warn".into()),
        )
        .init();

    let config = Config::parse();

    // ── 1. Sample store (connections are opened per request) ─────
    let store = RedisSampleStore::new(&config.redis())?;

    // ── 2. Build shared state ────────────────────────────────────
    let state = Arc::new(AppState {
        info: InfoService::new(
            Arc::new(store),
            config.endpoint.clone(),
            config.sample_limit as usize,
        ),
    });

    // ── 3. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state);

    // ── 4. Bind & serve ──────────────────────────────────────────
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        %addr,
        redis_host = %config.redis_host,
        redis_port = config.redis_port,
        redis_db = config.redis_db,
        endpoint = %config.endpoint,
        sample_limit = config.sample_limit,
        "latency-monitor listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
