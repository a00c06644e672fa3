//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use patchpath_core::{PathResult, Resolver, TitleId};
use patchpath_server::PatchPathServer;
use patchpath_store::{load_snapshot, save_snapshot, MemoryStore};

use crate::config::AppConfig;

pub async fn serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let store = Arc::new(load_store(config).await?);
    let server_config = config.server_config(host, port);
    tracing::info!("Starting Patchpath server on {}:{}", server_config.host, server_config.port);

    PatchPathServer::new(store, server_config).start().await
}

/// Resolve a path against the configured store and print the result JSON.
pub async fn resolve(config: &AppConfig, title: u32, from: &str, to: &str) -> anyhow::Result<()> {
    let store = Arc::new(load_store(config).await?);
    let resolver = Resolver::new(store.clone(), store);

    let result = resolver.resolve(TitleId(title), from, to).await?;
    match &result {
        PathResult::Found(path) => tracing::info!(
            "Found {} step(s), {} bytes",
            path.steps.len(),
            path.total_size_bytes
        ),
        PathResult::NotFound(err) => tracing::info!("No path: {}", err),
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn seed(out: &Path) -> anyhow::Result<()> {
    let store = MemoryStore::new();
    patchpath_store::seed(&store).await?;
    save_snapshot(&store, out).await?;
    tracing::info!("Wrote demo data to {}", out.display());
    Ok(())
}

/// The snapshot named by the config, else an empty store seeded with demo data
/// unless seeding is turned off.
async fn load_store(config: &AppConfig) -> anyhow::Result<MemoryStore> {
    if let Some(path) = &config.data {
        if let Some(store) = load_snapshot(path)? {
            tracing::info!("Loaded store from {}", path.display());
            return Ok(store);
        }
        tracing::warn!("Snapshot {} not found, starting fresh", path.display());
    }

    let store = MemoryStore::new();
    if config.seed {
        patchpath_store::seed(&store).await?;
    }
    Ok(store)
}
