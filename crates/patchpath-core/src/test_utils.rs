//! Test utilities for Patchpath

use crate::model::*;
use crate::resolver::{EdgeSupplier, VersionCatalog};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use proptest::prelude::*;

/// Build a patch edge with a generated file name and checksum.
pub fn edge(id: u32, from: u32, to: u32, size_bytes: u64) -> PatchEdge {
    PatchEdge {
        id: PatchId(id),
        from: VersionId(from),
        to: VersionId(to),
        size_bytes,
        file_name: format!("v{}_to_v{}.patch", from, to),
        checksum: format!("sum{}", id),
    }
}

/// Build a version of title 1 labelled `label`.
pub fn version(id: u32, label: &str) -> Version {
    Version {
        id: VersionId(id),
        title_id: TitleId(1),
        label: label.to_string(),
        released_at: Utc::now(),
        total_size_bytes: 0,
        is_active: true,
    }
}

/// In-memory catalog and edge supplier for a single title.
#[derive(Debug, Default, Clone)]
pub struct FixtureCatalog {
    pub title: TitleId,
    pub versions: Vec<Version>,
    pub edges: Vec<PatchEdge>,
    pub fail_edges: bool,
}

impl FixtureCatalog {
    /// Catalog of title 1 holding the given `(id, label)` versions and no patches.
    pub fn with_versions(versions: &[(u32, &str)]) -> Self {
        FixtureCatalog {
            title: TitleId(1),
            versions: versions.iter().map(|&(id, label)| version(id, label)).collect(),
            edges: Vec::new(),
            fail_edges: false,
        }
    }

    pub fn with_edges(mut self, edges: Vec<PatchEdge>) -> Self {
        self.edges = edges;
        self
    }
}

#[async_trait]
impl VersionCatalog for FixtureCatalog {
    async fn lookup_version(&self, title: TitleId, label: &str) -> Result<Option<Version>> {
        if title != self.title {
            return Ok(None);
        }
        Ok(self.versions.iter().find(|v| v.label == label).cloned())
    }

    async fn list_versions(&self, title: TitleId) -> Result<Vec<Version>> {
        if title != self.title {
            return Ok(Vec::new());
        }
        Ok(self.versions.clone())
    }
}

#[async_trait]
impl EdgeSupplier for FixtureCatalog {
    async fn list_edges(&self, title: TitleId) -> Result<Vec<PatchEdge>> {
        if self.fail_edges {
            anyhow::bail!("edge store unavailable");
        }
        if title != self.title {
            return Ok(Vec::new());
        }
        Ok(self.edges.clone())
    }
}

/// A random edge set over versions `1..=n` (2 <= n <= `max_versions`) together
/// with a source and target drawn from the same range. Patch ids are unique
/// and follow the generated order.
pub fn graph_case(
    max_versions: u32,
    max_edges: usize,
    max_size: u64,
) -> impl Strategy<Value = (Vec<PatchEdge>, VersionId, VersionId)> {
    (2..=max_versions)
        .prop_flat_map(move |versions| {
            let endpoint = 1..=versions;
            (
                prop::collection::vec(
                    (endpoint.clone(), endpoint.clone(), 0..=max_size),
                    0..=max_edges,
                ),
                endpoint.clone(),
                endpoint,
            )
        })
        .prop_map(|(raw, source, target)| {
            let edges = raw
                .into_iter()
                .enumerate()
                .map(|(i, (from, to, size))| edge(i as u32 + 1, from, to, size))
                .collect();
            (edges, VersionId(source), VersionId(target))
        })
}
