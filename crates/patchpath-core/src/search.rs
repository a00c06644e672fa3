//! Cheapest patch path search (Dijkstra) and path reconstruction
//!
//! The frontier is a min-heap ordered by `(distance, version id)`. Ties on
//! distance are broken by the smaller version id, and a neighbour's predecessor
//! is only replaced on a strictly smaller distance, so among several cheapest
//! routes the first one discovered in that order wins. Outgoing patches are
//! relaxed in patch id order, which makes the chosen path a function of the
//! edge set alone. Stale heap entries are skipped on extraction instead of
//! being removed (no decrease-key).

use crate::graph::PatchGraph;
use crate::model::{PatchEdge, VersionId};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// Predecessor trail left behind by a successful search.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<'g> {
    target: VersionId,
    distance: u64,
    prev: HashMap<VersionId, &'g PatchEdge>,
}

impl<'g> ShortestPathTree<'g> {
    /// Total size of the cheapest path to the target.
    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// The patch used to reach `version` on its cheapest known route.
    pub fn predecessor(&self, version: VersionId) -> Option<&'g PatchEdge> {
        self.prev.get(&version).copied()
    }

    /// Ordered source-to-target patches of the cheapest path.
    pub fn reconstruct(&self) -> Vec<&'g PatchEdge> {
        reconstruct_path(&self.prev, self.target)
    }
}

/// Run Dijkstra from `source` and stop as soon as `target` is settled.
///
/// Returns `None` when the frontier empties without reaching `target`.
pub fn find_shortest_path(
    graph: &PatchGraph,
    source: VersionId,
    target: VersionId,
) -> Option<ShortestPathTree<'_>> {
    let mut dist: HashMap<VersionId, u64> = HashMap::new();
    let mut prev: HashMap<VersionId, &PatchEdge> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    dist.insert(source, 0);
    frontier.push(Reverse((0u64, source)));

    let mut settled = 0usize;
    while let Some(Reverse((current_dist, current))) = frontier.pop() {
        if dist.get(&current).is_some_and(|&best| current_dist != best) {
            continue;
        }

        if current == target {
            debug!(
                "Reached version {} at distance {} after settling {} versions",
                target, current_dist, settled
            );
            return Some(ShortestPathTree {
                target,
                distance: current_dist,
                prev,
            });
        }
        settled += 1;

        for edge in graph.outgoing(current) {
            let candidate = current_dist.saturating_add(edge.size_bytes);
            let improves = dist.get(&edge.to).is_none_or(|&best| candidate < best);
            if improves {
                dist.insert(edge.to, candidate);
                prev.insert(edge.to, edge);
                frontier.push(Reverse((candidate, edge.to)));
            }
        }
    }

    debug!(
        "Version {} unreachable from {} ({} versions settled)",
        target, source, settled
    );
    None
}

/// Walk the predecessor trail back from `target` until a version with no
/// predecessor (the source), then reverse into source-to-target order.
pub fn reconstruct_path<'g>(
    prev: &HashMap<VersionId, &'g PatchEdge>,
    target: VersionId,
) -> Vec<&'g PatchEdge> {
    let mut path = Vec::new();
    let mut current = target;
    while let Some(&edge) = prev.get(&current) {
        path.push(edge);
        current = edge.from;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PatchId;
    use crate::test_utils::edge;

    #[test]
    fn test_prefers_smaller_duplicate_edge() {
        let graph = PatchGraph::from_edges(vec![
            edge(1, 1, 2, 900),
            edge(2, 1, 2, 400),
            edge(3, 1, 2, 700),
        ]);

        let tree = find_shortest_path(&graph, VersionId(1), VersionId(2)).unwrap();
        assert_eq!(tree.distance(), 400);
        assert_eq!(tree.predecessor(VersionId(2)).unwrap().id.0, 2);
        assert!(tree.predecessor(VersionId(1)).is_none());
    }

    #[test]
    fn test_equal_size_duplicates_ignore_supply_order() {
        let forward = vec![edge(1, 1, 2, 5), edge(2, 1, 2, 5)];
        let backward: Vec<PatchEdge> = forward.iter().rev().cloned().collect();

        for edges in [forward, backward] {
            let graph = PatchGraph::from_edges(edges);
            let tree = find_shortest_path(&graph, VersionId(1), VersionId(2)).unwrap();
            assert_eq!(tree.predecessor(VersionId(2)).unwrap().id, PatchId(1));
        }
    }

    #[test]
    fn test_equal_cost_routes_pick_first_discovered() {
        // 1 -> 2 -> 4 and 1 -> 3 -> 4 both cost 20; version 2 settles first
        let graph = PatchGraph::from_edges(vec![
            edge(10, 1, 3, 10),
            edge(11, 1, 2, 10),
            edge(12, 3, 4, 10),
            edge(13, 2, 4, 10),
        ]);

        let reversed = PatchGraph::from_edges(vec![
            edge(13, 2, 4, 10),
            edge(12, 3, 4, 10),
            edge(11, 1, 2, 10),
            edge(10, 1, 3, 10),
        ]);

        for graph in [&graph, &reversed] {
            let tree = find_shortest_path(graph, VersionId(1), VersionId(4)).unwrap();
            let ids: Vec<u32> = tree.reconstruct().iter().map(|e| e.id.0).collect();
            assert_eq!(ids, vec![11, 13]);
        }
    }

    #[test]
    fn test_zero_weight_cycle_terminates() {
        let graph = PatchGraph::from_edges(vec![
            edge(1, 1, 2, 0),
            edge(2, 2, 1, 0),
            edge(3, 2, 3, 5),
        ]);

        let tree = find_shortest_path(&graph, VersionId(1), VersionId(3)).unwrap();
        assert_eq!(tree.distance(), 5);
        assert_eq!(tree.reconstruct().len(), 2);
    }

    #[test]
    fn test_source_equals_target_is_empty_path() {
        let graph = PatchGraph::from_edges(vec![edge(1, 1, 2, 5)]);
        let tree = find_shortest_path(&graph, VersionId(1), VersionId(1)).unwrap();
        assert_eq!(tree.distance(), 0);
        assert!(tree.reconstruct().is_empty());
    }

    #[test]
    fn test_target_only_reachable_backwards_is_unreachable() {
        let graph = PatchGraph::from_edges(vec![edge(1, 2, 1, 5)]);
        assert!(find_shortest_path(&graph, VersionId(1), VersionId(2)).is_none());
    }

    #[test]
    fn test_reconstruct_stops_at_source() {
        let a = edge(1, 1, 2, 5);
        let b = edge(2, 2, 3, 5);
        let mut prev = HashMap::new();
        prev.insert(VersionId(2), &a);
        prev.insert(VersionId(3), &b);

        let path = reconstruct_path(&prev, VersionId(3));
        assert_eq!(path, vec![&a, &b]);
    }
}
