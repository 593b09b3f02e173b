use std::sync::Arc;

use anyhow::Context;
use kb_config::{KbConfig, ServerConfig};
use kb_server::{AppState, router};

use crate::cli::root_commands::ServeArgs;

/// Handle `kb serve`.
pub async fn handle(args: &ServeArgs, config: &KbConfig) -> anyhow::Result<()> {
    let server = listen_config(args, &config.server);
    let service = super::open_service(config).await?;
    let state = Arc::new(AppState::new(service));

    let addr = server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, database = %config.database.path, "knowledge base listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn listen_config(args: &ServeArgs, configured: &ServerConfig) -> ServerConfig {
    ServerConfig {
        host: args.host.clone().unwrap_or_else(|| configured.host.clone()),
        port: args.port.unwrap_or(configured.port),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate()).ok();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            () = async {
                if let Some(ref mut s) = sigterm {
                    s.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
}
