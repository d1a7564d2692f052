use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::Context;
use crate::http::connection::Connection;

/// Pause after a failed accept, so descriptor exhaustion does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<TcpListener> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not start server on {addr}"))?;
    info!("Listening on {}", addr);
    Ok(listener)
}

/// Accepts connections until the task is dropped.
///
/// At most `max_workers` connections are handled at once. Further
/// connections wait for a free slot and are never rejected.
pub async fn serve(listener: TcpListener, cfg: ServerConfig) -> anyhow::Result<()> {
    let ctx = Arc::new(Context::new(cfg).context("invalid document root")?);
    let workers = Arc::new(Semaphore::new(ctx.config.max_workers));
    info!(
        root = %ctx.resolver.root().display(),
        max_workers = ctx.config.max_workers,
        "Serving files"
    );

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let ctx = ctx.clone();
        let workers = workers.clone();
        tokio::spawn(async move {
            // Held until the connection is closed.
            let Ok(_permit) = workers.acquire_owned().await else {
                return;
            };
            let conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Binds the configured address and serves on it.
pub async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
    let listener = bind(&cfg).await?;
    serve(listener, cfg).await
}
