//! Server lifecycle: bind, serve the API router, shut down on Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::classification_router;
use crate::config::ConfigError;
use crate::pipeline::classification::ContentClassifier;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve the classification API on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, classifier: Arc<ContentClassifier>) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let local_addr = listener.local_addr()?;
    tracing::info!(
        addr = %local_addr,
        provider_configured = classifier.is_provider_configured(),
        "Classification API listening"
    );

    let app = classification_router(classifier);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Classification API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
