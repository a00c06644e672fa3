//! Resolver: label lookup, edge fetch, graph build, search, and result shaping

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::graph::PatchGraph;
use crate::model::{PatchEdge, TitleId, Version, VersionId};
use crate::result::{PathError, PathResult, PatchPath, PatchStep};
use crate::search::find_shortest_path;

/// Resolves human-readable version labels within a title.
#[async_trait]
pub trait VersionCatalog: Send + Sync {
    /// Look up a version of `title` by label. `Ok(None)` if no such version exists.
    async fn lookup_version(&self, title: TitleId, label: &str) -> Result<Option<Version>>;

    /// All versions of `title`.
    async fn list_versions(&self, title: TitleId) -> Result<Vec<Version>>;
}

/// Supplies the full patch edge set of a title, in any order.
#[async_trait]
pub trait EdgeSupplier: Send + Sync {
    async fn list_edges(&self, title: TitleId) -> Result<Vec<PatchEdge>>;
}

/// Finds the cheapest patch sequence between two versions of a title.
///
/// Holds no state between calls; each call builds its own graph from a fresh
/// snapshot supplied by the collaborators. `Err` is returned only when a
/// collaborator fails, every business outcome is a [`PathResult`].
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<dyn VersionCatalog>,
    edges: Arc<dyn EdgeSupplier>,
}

impl Resolver {
    pub fn new(catalog: Arc<dyn VersionCatalog>, edges: Arc<dyn EdgeSupplier>) -> Self {
        Self { catalog, edges }
    }

    pub async fn resolve(&self, title: TitleId, from: &str, to: &str) -> Result<PathResult> {
        info!("Resolving patch path for title {}: {} -> {}", title, from, to);

        let Some(source) = self.catalog.lookup_version(title, from).await? else {
            return Ok(PathError::SourceVersionNotFound.into());
        };
        let Some(target) = self.catalog.lookup_version(title, to).await? else {
            return Ok(PathError::TargetVersionNotFound.into());
        };

        if source.id == target.id {
            return Ok(PatchPath::empty().into());
        }

        let edges = self.edges.list_edges(title).await?;
        let path = match plan_path(edges, source.id, target.id) {
            Ok(path) => path,
            Err(err) => {
                info!("No patch path for title {}: {}", title, err);
                return Ok(err.into());
            }
        };

        let labels: HashMap<VersionId, String> = self
            .catalog
            .list_versions(title)
            .await?
            .into_iter()
            .map(|v| (v.id, v.label))
            .collect();

        let steps = path
            .into_iter()
            .map(|edge| PatchStep {
                patch_id: edge.id,
                from_label: label_for(&labels, edge.from),
                to_label: label_for(&labels, edge.to),
                file_name: edge.file_name,
                size_bytes: edge.size_bytes,
            })
            .collect();

        let path = PatchPath::from_steps(steps);
        info!(
            "Resolved {} -> {} in {} steps, {} bytes",
            from,
            to,
            path.steps.len(),
            path.total_size_bytes
        );
        Ok(path.into())
    }
}

fn label_for(labels: &HashMap<VersionId, String>, version: VersionId) -> String {
    match labels.get(&version) {
        Some(label) => label.clone(),
        None => {
            warn!("Patch endpoint version {} has no catalog entry", version);
            String::new()
        }
    }
}

/// Pure part of a resolution: build the graph from `edges` and return the
/// cheapest source-to-target patch sequence.
///
/// An empty edge set is reported as [`PathError::NoPatchesAvailable`], which is
/// distinct from [`PathError::NoPathExists`].
pub fn plan_path(
    edges: Vec<PatchEdge>,
    source: VersionId,
    target: VersionId,
) -> Result<Vec<PatchEdge>, PathError> {
    if source == target {
        return Ok(Vec::new());
    }
    if edges.is_empty() {
        return Err(PathError::NoPatchesAvailable);
    }

    let graph = PatchGraph::from_edges(edges);
    debug!(
        "Built graph with {} versions, {} patches",
        graph.version_count(),
        graph.patch_count()
    );

    let tree = find_shortest_path(&graph, source, target).ok_or(PathError::NoPathExists)?;
    Ok(tree.reconstruct().into_iter().cloned().collect())
}
