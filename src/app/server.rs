use crate::adapters::http;
use crate::adapters::storage::{MemoryPetStore, PostgresPetStore};
use crate::config::{Settings, StoreBackend};
use crate::core::service::PetService;
use crate::core::PetStore;
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the configured store; for postgres this connects and ensures the schema.
pub async fn build_store(settings: &Settings) -> Result<Arc<dyn PetStore>> {
    match settings.store {
        StoreBackend::Postgres => {
            let store = PostgresPetStore::connect(&settings.database).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryPetStore::new()))
        }
    }
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, service: PetService, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, http::router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// 完整生命週期：建立 store → 提供服務 → 關閉 store
pub async fn run(settings: Settings) -> Result<()> {
    let store = build_store(&settings).await?;
    let service = PetService::new(store.clone());

    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("🚀 Listening on {} ({} store)", address, settings.store);

    let served = serve(listener, service, shutdown_signal()).await;
    store.close().await;
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
