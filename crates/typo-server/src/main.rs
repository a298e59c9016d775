use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use typo_api::AppStateInner;
use typo_db::Database;
use typo_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    typo_server::init_tracing("typo=debug,tower_http=debug");

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!("TYPO_SESSION_SECRET is unset; sessions are signed with a public placeholder");
    }

    let db = Database::open(&config.db_path, config.pool_size)?;
    match db.initialize_if_empty()? {
        Some(report) => info!(?report, "Fresh database seeded with demo data"),
        None => info!("Existing data found, skipping seed"),
    }
    typo_db::password::warm_up();

    let state = Arc::new(AppStateInner {
        db,
        session: config.session(),
    });
    let app = typo_api::app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Typo Payments listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await;
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("Received Ctrl+C, shutting down...");
    }
}
