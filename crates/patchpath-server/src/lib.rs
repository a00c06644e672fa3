//! HTTP server exposing the patch path resolver and the record store

pub mod router;
pub mod handlers;
pub mod error;


use std::net::SocketAddr;
use std::sync::Arc;

use patchpath_core::Resolver;
use patchpath_store::MemoryStore;
use tokio::net::TcpListener;

pub use router::create_router;

/// Where the server listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

/// State shared by all handlers.
pub struct ServerState {
    pub store: Arc<MemoryStore>,
    pub resolver: Resolver,
}

impl ServerState {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        let resolver = Resolver::new(store.clone(), store.clone());
        Self { store, resolver }
    }
}

pub struct PatchPathServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl PatchPathServer {
    pub fn new(store: Arc<MemoryStore>, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(ServerState::new(store)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind to the configured address and serve until the process exits.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);
        serve(listener, self.state).await
    }
}

/// Serve on an already bound listener.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> anyhow::Result<()> {
    let app = create_router(state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
