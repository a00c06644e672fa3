//! JSON snapshot of the whole store

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{DownloadRecord, PatchRecord, Title};
use crate::store::MemoryStore;
use patchpath_core::Version;

/// Every record in the store, as flat lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub titles: Vec<Title>,
    #[serde(default)]
    pub versions: Vec<Version>,
    #[serde(default)]
    pub patches: Vec<PatchRecord>,
    #[serde(default)]
    pub downloads: Vec<DownloadRecord>,
}

/// Write the store to `path` as pretty JSON, creating parent directories.
pub async fn save_snapshot(store: &MemoryStore, path: &Path) -> anyhow::Result<()> {
    let snapshot = store.snapshot().await;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json_str = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, json_str)?;

    tracing::debug!("Snapshot saved: {}", path.display());
    Ok(())
}

/// Load a store from `path`. Returns `None` if the file does not exist.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Option<MemoryStore>> {
    if !path.exists() {
        return Ok(None);
    }

    let json_str = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&json_str)?;

    tracing::debug!("Snapshot loaded from: {}", path.display());
    Ok(Some(MemoryStore::from_snapshot(snapshot)))
}
