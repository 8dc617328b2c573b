//! # Diary Server
//!
//! Stores one opaque, client-encrypted journal blob and hands it back to
//! holders of the shared secret. The server never sees a password or any
//! plaintext.

pub mod auth;
pub mod config;
pub mod fs;
pub mod routes;
pub mod setup;
pub mod store;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub use config::{ServerConfig, Settings};
pub use routes::{router, AppState};
pub use store::{BlobStore, FileBlobStore, StoredBlob, WriteOutcome};

/// Router backed by the file store described by `settings`.
pub fn build_app(settings: Settings) -> Router {
    let store = Arc::new(FileBlobStore::new(&settings.data_dir));
    let state = AppState::new(store, settings.secret, settings.kdf);
    router(state, settings.max_body_bytes)
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(settings: Settings, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(settings.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", settings.bind, e))?;
    info!(
        addr = %listener.local_addr()?,
        data_dir = %settings.data_dir.display(),
        scheme = settings.kdf.scheme_name(),
        "diary server listening"
    );
    let app = build_app(settings);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("diary server stopped");
    Ok(())
}
