//! Record types kept by the store

use chrono::{DateTime, Utc};
use patchpath_core::{PatchEdge, PatchId, TitleId, Version, VersionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique download record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct DownloadId(pub u32);

impl std::fmt::Display for DownloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product whose versions and patches are tracked independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub publisher: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A title with its versions, newest release first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TitleDetail {
    #[serde(flatten)]
    pub title: Title,
    pub versions: Vec<Version>,
}

/// A stored patch file: the graph edge plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchRecord {
    #[serde(flatten)]
    pub edge: PatchEdge,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DownloadStatus {
    InProgress,
    Completed,
    Failed,
}

/// One client download of a patch file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub patch_id: PatchId,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub client_addr: String,
    pub status: DownloadStatus,
}

/// What a client needs to fetch a patch, returned when a download starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub patch_id: PatchId,
    pub file_name: String,
    pub size_bytes: u64,
    pub checksum: String,
    pub download_id: DownloadId,
}

/// Download counts across all titles.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStats {
    pub total_downloads: u32,
    /// Keyed by title name; titles without downloads are omitted.
    pub by_title: BTreeMap<String, u32>,
    pub by_status: BTreeMap<DownloadStatus, u32>,
}

// ── Creation requests ───────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTitle {
    pub name: String,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVersion {
    pub label: String,
    #[serde(default)]
    pub total_size_bytes: u64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Patch creation request. The size is signed so that a negative value can be
/// rejected with a proper message instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatch {
    pub from_version_id: VersionId,
    pub to_version_id: VersionId,
    pub file_name: String,
    pub size_bytes: i64,
    #[serde(default)]
    pub checksum: String,
}
