//! Patchpath Core: version graph, cheapest patch path search and resolver

pub mod model;
pub mod graph;
pub mod search;
pub mod result;
pub mod resolver;


#[cfg(test)]
pub mod test_utils;

pub use model::{TitleId, VersionId, PatchId, Version, PatchEdge};
pub use graph::PatchGraph;
pub use search::{find_shortest_path, reconstruct_path, ShortestPathTree};
pub use result::{PathError, PathResult, PatchPath, PatchStep, UnknownPathError};
pub use resolver::{plan_path, EdgeSupplier, Resolver, VersionCatalog};
