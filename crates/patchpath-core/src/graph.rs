//! Per-request version graph using petgraph::StableDiGraph keyed by VersionId

use crate::model::{PatchEdge, VersionId};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// The version graph of one title. Versions are nodes and patches are directed edges.
///
/// Built fresh for every resolution and never shared. Parallel edges between the
/// same pair of versions are kept as-is; the search picks the cheaper one.
pub struct PatchGraph {
    inner: StableDiGraph<VersionId, PatchEdge>,
    index: HashMap<VersionId, NodeIndex>,
}

impl std::fmt::Debug for PatchGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchGraph")
            .field("version_count", &self.inner.node_count())
            .field("patch_count", &self.inner.edge_count())
            .finish()
    }
}

impl PatchGraph {
    pub fn new() -> Self {
        PatchGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Build the graph from a title's full, unordered edge set. Linear in the number of edges.
    pub fn from_edges(edges: impl IntoIterator<Item = PatchEdge>) -> Self {
        let edges = edges.into_iter();
        let (lower, _) = edges.size_hint();
        let mut graph = PatchGraph {
            inner: StableDiGraph::with_capacity(lower, lower),
            index: HashMap::with_capacity(lower),
        };
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Add a version node if it is not present yet.
    pub fn add_version(&mut self, version: VersionId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&version) {
            return idx;
        }
        let idx = self.inner.add_node(version);
        self.index.insert(version, idx);
        idx
    }

    /// Add a patch edge, creating its endpoint versions on demand.
    pub fn add_edge(&mut self, edge: PatchEdge) {
        let source = self.add_version(edge.from);
        let target = self.add_version(edge.to);
        self.inner.add_edge(source, target, edge);
    }

    /// Total number of versions that appear as an edge endpoint.
    pub fn version_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of patch edges.
    pub fn patch_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.edge_count() == 0
    }

    /// Outgoing patches of a version, ordered by patch id.
    ///
    /// The order depends only on the edge set, not on the order edges were
    /// supplied in. A version that never appears as an endpoint has no
    /// outgoing patches.
    pub fn outgoing(&self, version: VersionId) -> Vec<&PatchEdge> {
        let Some(&idx) = self.index.get(&version) else {
            return Vec::new();
        };
        let mut refs: Vec<_> = self.inner.edges_directed(idx, Direction::Outgoing).collect();
        refs.sort_by_key(|edge_ref| (edge_ref.weight().id, edge_ref.id()));
        refs.into_iter().map(|edge_ref| edge_ref.weight()).collect()
    }

    /// Node index of a version in the underlying petgraph graph.
    pub fn node_index(&self, version: VersionId) -> Option<NodeIndex> {
        self.index.get(&version).copied()
    }

    /// Borrow the underlying petgraph graph, e.g. to run petgraph algorithms over it.
    pub fn as_petgraph(&self) -> &StableDiGraph<VersionId, PatchEdge> {
        &self.inner
    }
}

impl Default for PatchGraph {
    fn default() -> Self {
        Self::new()
    }
}
