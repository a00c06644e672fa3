//! Axum router setup for the Patchpath server

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::*, ServerState};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Titles and versions
        .route("/api/titles", get(list_titles).post(create_title))
        .route("/api/titles/:id", get(get_title))
        .route("/api/titles/:id/versions", get(list_versions).post(create_version))
        .route("/api/titles/:id/versions/latest", get(latest_version))
        .route("/api/titles/:id/patches/optimal", get(optimal_path))
        // Patches
        .route("/api/patches", get(find_patch).post(create_patch))
        .route("/api/patches/:id", get(get_patch))
        .route("/api/patches/:id/download", get(download_patch))
        // Downloads
        .route("/api/downloads/stats", get(download_stats))
        .route("/api/downloads/:id/complete", patch(complete_download))
        .route("/api/downloads/:id/fail", patch(fail_download))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchpath_store::MemoryStore;

    #[test]
    fn test_router_creation() {
        let state = Arc::new(ServerState::new(Arc::new(MemoryStore::new())));
        let _router = create_router(state);
    }
}
