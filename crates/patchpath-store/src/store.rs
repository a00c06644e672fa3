//! Thread-safe in-memory store

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use patchpath_core::{EdgeSupplier, PatchEdge, PatchId, TitleId, Version, VersionCatalog, VersionId};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::model::*;
use crate::snapshot::Snapshot;

#[derive(Debug, Default)]
struct Tables {
    titles: BTreeMap<TitleId, Title>,
    versions: BTreeMap<VersionId, Version>,
    patches: BTreeMap<PatchId, PatchRecord>,
    downloads: BTreeMap<DownloadId, DownloadRecord>,
    next_title: u32,
    next_version: u32,
    next_patch: u32,
    next_download: u32,
}

impl Tables {
    fn versions_of(&self, title: TitleId) -> impl Iterator<Item = &Version> {
        self.versions.values().filter(move |v| v.title_id == title)
    }

    fn title_of_patch(&self, patch: &PatchRecord) -> Option<TitleId> {
        self.versions.get(&patch.edge.from).map(|v| v.title_id)
    }

    fn patches_of(&self, title: TitleId) -> Vec<&PatchRecord> {
        let mut patches: Vec<&PatchRecord> = self
            .patches
            .values()
            .filter(|p| self.title_of_patch(p) == Some(title))
            .collect();
        patches.sort_by_key(|p| (Reverse(p.created_at), p.edge.id));
        patches
    }
}

/// All records behind a single `RwLock`, so validation and insertion happen
/// under one write guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. Id counters continue after the highest id seen.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Tables::default();
        for title in snapshot.titles {
            tables.next_title = tables.next_title.max(title.id.0);
            tables.titles.insert(title.id, title);
        }
        for version in snapshot.versions {
            tables.next_version = tables.next_version.max(version.id.0);
            tables.versions.insert(version.id, version);
        }
        for patch in snapshot.patches {
            tables.next_patch = tables.next_patch.max(patch.edge.id.0);
            tables.patches.insert(patch.edge.id, patch);
        }
        for download in snapshot.downloads {
            tables.next_download = tables.next_download.max(download.id.0);
            tables.downloads.insert(download.id, download);
        }
        debug!(
            "Loaded {} titles, {} versions, {} patches, {} downloads",
            tables.titles.len(),
            tables.versions.len(),
            tables.patches.len(),
            tables.downloads.len()
        );
        MemoryStore {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of every record, ordered by id.
    pub async fn snapshot(&self) -> Snapshot {
        let tables = self.tables.read().await;
        Snapshot {
            titles: tables.titles.values().cloned().collect(),
            versions: tables.versions.values().cloned().collect(),
            patches: tables.patches.values().cloned().collect(),
            downloads: tables.downloads.values().cloned().collect(),
        }
    }

    // ── Titles ──────────────────────────────────────────────

    pub async fn add_title(&self, new: NewTitle) -> Result<Title> {
        self.add_title_at(new, Utc::now()).await
    }

    pub async fn add_title_at(&self, new: NewTitle, created_at: DateTime<Utc>) -> Result<Title> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(StoreError::TitleRequired);
        }

        let mut tables = self.tables.write().await;
        tables.next_title += 1;
        let title = Title {
            id: TitleId(tables.next_title),
            name: name.to_string(),
            publisher: new.publisher,
            created_at,
        };
        tables.titles.insert(title.id, title.clone());
        info!("Created title {} ({})", title.id, title.name);
        Ok(title)
    }

    /// A title with its versions, newest release first.
    pub async fn title_detail(&self, id: TitleId) -> Option<TitleDetail> {
        let tables = self.tables.read().await;
        let title = tables.titles.get(&id)?.clone();
        let versions = newest_first(tables.versions_of(id).cloned().collect());
        Some(TitleDetail { title, versions })
    }

    /// All titles ordered by name.
    pub async fn titles(&self) -> Vec<Title> {
        let tables = self.tables.read().await;
        let mut titles: Vec<Title> = tables.titles.values().cloned().collect();
        titles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        titles
    }

    // ── Versions ────────────────────────────────────────────

    pub async fn add_version(&self, title: TitleId, new: NewVersion) -> Result<Version> {
        self.add_version_at(title, new, Utc::now()).await
    }

    pub async fn add_version_at(
        &self,
        title: TitleId,
        new: NewVersion,
        released_at: DateTime<Utc>,
    ) -> Result<Version> {
        let mut tables = self.tables.write().await;
        if !tables.titles.contains_key(&title) {
            return Err(StoreError::TitleNotFound);
        }
        let label = new.label.trim();
        if label.is_empty() {
            return Err(StoreError::VersionLabelRequired);
        }
        if tables.versions_of(title).any(|v| v.label == label) {
            return Err(StoreError::VersionExists);
        }

        tables.next_version += 1;
        let version = Version {
            id: VersionId(tables.next_version),
            title_id: title,
            label: label.to_string(),
            released_at,
            total_size_bytes: new.total_size_bytes,
            is_active: new.is_active,
        };
        tables.versions.insert(version.id, version.clone());
        info!("Created version {} ({}) of title {}", version.id, version.label, title);
        Ok(version)
    }

    pub async fn version(&self, id: VersionId) -> Option<Version> {
        self.tables.read().await.versions.get(&id).cloned()
    }

    pub async fn version_by_label(&self, title: TitleId, label: &str) -> Option<Version> {
        let tables = self.tables.read().await;
        tables.versions_of(title).find(|v| v.label == label).cloned()
    }

    /// Versions of a title, newest release first.
    pub async fn versions(&self, title: TitleId) -> Result<Vec<Version>> {
        let tables = self.tables.read().await;
        if !tables.titles.contains_key(&title) {
            return Err(StoreError::TitleNotFound);
        }
        Ok(newest_first(tables.versions_of(title).cloned().collect()))
    }

    /// The most recently released active version.
    pub async fn latest_version(&self, title: TitleId) -> Result<Version> {
        self.versions(title)
            .await?
            .into_iter()
            .find(|v| v.is_active)
            .ok_or(StoreError::NoActiveVersion)
    }

    // ── Patches ─────────────────────────────────────────────

    pub async fn add_patch(&self, new: NewPatch) -> Result<PatchRecord> {
        self.add_patch_at(new, Utc::now()).await
    }

    pub async fn add_patch_at(&self, new: NewPatch, created_at: DateTime<Utc>) -> Result<PatchRecord> {
        let mut tables = self.tables.write().await;
        let from = tables
            .versions
            .get(&new.from_version_id)
            .ok_or(StoreError::FromVersionNotFound)?;
        let to = tables
            .versions
            .get(&new.to_version_id)
            .ok_or(StoreError::ToVersionNotFound)?;
        if from.title_id != to.title_id {
            return Err(StoreError::CrossTitlePatch);
        }
        let size_bytes = u64::try_from(new.size_bytes).map_err(|_| StoreError::NegativePatchSize)?;
        if tables
            .patches
            .values()
            .any(|p| p.edge.from == new.from_version_id && p.edge.to == new.to_version_id)
        {
            return Err(StoreError::PatchExists);
        }

        tables.next_patch += 1;
        let patch = PatchRecord {
            edge: PatchEdge {
                id: PatchId(tables.next_patch),
                from: new.from_version_id,
                to: new.to_version_id,
                size_bytes,
                file_name: new.file_name,
                checksum: new.checksum,
            },
            created_at,
        };
        tables.patches.insert(patch.edge.id, patch.clone());
        info!(
            "Created patch {} ({} -> {}, {} bytes)",
            patch.edge.id, patch.edge.from, patch.edge.to, patch.edge.size_bytes
        );
        Ok(patch)
    }

    pub async fn patch(&self, id: PatchId) -> Result<PatchRecord> {
        self.tables
            .read()
            .await
            .patches
            .get(&id)
            .cloned()
            .ok_or(StoreError::PatchNotFound)
    }

    /// The direct patch between two versions.
    pub async fn patch_between(&self, from: VersionId, to: VersionId) -> Result<PatchRecord> {
        let tables = self.tables.read().await;
        if !tables.versions.contains_key(&from) {
            return Err(StoreError::FromVersionNotFound);
        }
        if !tables.versions.contains_key(&to) {
            return Err(StoreError::ToVersionNotFound);
        }
        tables
            .patches
            .values()
            .find(|p| p.edge.from == from && p.edge.to == to)
            .cloned()
            .ok_or(StoreError::PatchNotFound)
    }

    /// Patches of a title, newest first.
    pub async fn patches_for_title(&self, title: TitleId) -> Vec<PatchRecord> {
        let tables = self.tables.read().await;
        tables.patches_of(title).into_iter().cloned().collect()
    }

    // ── Downloads ───────────────────────────────────────────

    /// Record the start of a download and return what the client needs to fetch the file.
    pub async fn start_download(&self, patch: PatchId, client_addr: &str) -> Result<DownloadInfo> {
        self.start_download_at(patch, client_addr, Utc::now()).await
    }

    pub async fn start_download_at(
        &self,
        patch: PatchId,
        client_addr: &str,
        started_at: DateTime<Utc>,
    ) -> Result<DownloadInfo> {
        let mut tables = self.tables.write().await;
        let edge = tables
            .patches
            .get(&patch)
            .map(|p| p.edge.clone())
            .ok_or(StoreError::PatchNotFound)?;

        tables.next_download += 1;
        let record = DownloadRecord {
            id: DownloadId(tables.next_download),
            patch_id: patch,
            started_at,
            completed_at: None,
            client_addr: client_addr.to_string(),
            status: DownloadStatus::InProgress,
        };
        let download_id = record.id;
        tables.downloads.insert(download_id, record);
        debug!("Download {} of patch {} started by {}", download_id, patch, client_addr);

        Ok(DownloadInfo {
            patch_id: edge.id,
            file_name: edge.file_name,
            size_bytes: edge.size_bytes,
            checksum: edge.checksum,
            download_id,
        })
    }

    pub async fn download(&self, id: DownloadId) -> Option<DownloadRecord> {
        self.tables.read().await.downloads.get(&id).cloned()
    }

    pub async fn complete_download(&self, id: DownloadId) -> Result<()> {
        self.finish_download(id, DownloadStatus::Completed, Utc::now()).await
    }

    pub async fn fail_download(&self, id: DownloadId) -> Result<()> {
        self.finish_download(id, DownloadStatus::Failed, Utc::now()).await
    }

    pub async fn finish_download(
        &self,
        id: DownloadId,
        status: DownloadStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .downloads
            .get_mut(&id)
            .ok_or(StoreError::DownloadNotFound)?;
        record.status = status;
        record.completed_at = Some(at);
        debug!("Download {} marked {:?}", id, status);
        Ok(())
    }

    pub async fn download_stats(&self) -> DownloadStats {
        let tables = self.tables.read().await;
        let title_of_patch: HashMap<PatchId, TitleId> = tables
            .patches
            .values()
            .filter_map(|p| tables.title_of_patch(p).map(|t| (p.edge.id, t)))
            .collect();

        let mut stats = DownloadStats::default();
        for record in tables.downloads.values() {
            let Some(title) = title_of_patch
                .get(&record.patch_id)
                .and_then(|t| tables.titles.get(t))
            else {
                continue;
            };
            stats.total_downloads += 1;
            *stats.by_title.entry(title.name.clone()).or_insert(0) += 1;
            *stats.by_status.entry(record.status).or_insert(0) += 1;
        }
        stats
    }
}

fn newest_first(mut versions: Vec<Version>) -> Vec<Version> {
    versions.sort_by_key(|v| (Reverse(v.released_at), Reverse(v.id)));
    versions
}

#[async_trait]
impl VersionCatalog for MemoryStore {
    async fn lookup_version(&self, title: TitleId, label: &str) -> anyhow::Result<Option<Version>> {
        Ok(self.version_by_label(title, label).await)
    }

    async fn list_versions(&self, title: TitleId) -> anyhow::Result<Vec<Version>> {
        let tables = self.tables.read().await;
        Ok(tables.versions_of(title).cloned().collect())
    }
}

#[async_trait]
impl EdgeSupplier for MemoryStore {
    async fn list_edges(&self, title: TitleId) -> anyhow::Result<Vec<PatchEdge>> {
        let tables = self.tables.read().await;
        Ok(tables
            .patches_of(title)
            .into_iter()
            .map(|p| p.edge.clone())
            .collect())
    }
}
