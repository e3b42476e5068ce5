use std::net::SocketAddr;

use tracing::{info, warn};

use roster_core::RosterConfig;

pub async fn serve(config: &RosterConfig, port: u16) -> anyhow::Result<()> {
    let router = roster_api::build_router(super::gateway(config)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, api_url = %config.api_url, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("API server stopped");
    Ok(())
}
