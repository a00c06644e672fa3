//! In-memory record store for titles, versions, patches and downloads
//!
//! This is the collaborator the resolver reads from: it implements
//! [`VersionCatalog`](patchpath_core::VersionCatalog) and
//! [`EdgeSupplier`](patchpath_core::EdgeSupplier).

pub mod model;
pub mod error;
pub mod store;
pub mod seed;
pub mod snapshot;


pub use model::*;
pub use error::StoreError;
pub use store::MemoryStore;
pub use seed::seed;
pub use snapshot::{Snapshot, save_snapshot, load_snapshot};
