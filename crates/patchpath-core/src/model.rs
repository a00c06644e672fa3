//! Core data structures for the version graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a title (a product whose versions are tracked independently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct TitleId(pub u32);

/// Identifier of a released version, unique within its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct VersionId(pub u32);

/// Identifier of a patch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct PatchId(pub u32);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_id!(TitleId, VersionId, PatchId);

/// One released build of a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: VersionId,
    pub title_id: TitleId,
    /// Human-readable label, e.g. "1.2.0".
    pub label: String,
    pub released_at: DateTime<Utc>,
    /// Size of a full install of this version.
    pub total_size_bytes: u64,
    pub is_active: bool,
}

/// A directed, weighted patch: "a file exists that upgrades `from` directly to `to`,
/// costing `size_bytes` to transfer".
///
/// The file name and checksum are opaque to the search and only carried through
/// to the output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatchEdge {
    pub id: PatchId,
    pub from: VersionId,
    pub to: VersionId,
    pub size_bytes: u64,
    pub file_name: String,
    pub checksum: String,
}
