//! Core types for habsnap.
//!
//! Turns the flat openHAB item list into two views:
//!
//! - the **flat index**, every named item keyed by name with its semantic
//!   classification;
//! - the **semantic tree**, a Location → Equipment → Point forest derived
//!   from tags and group memberships.
//!
//! Everything in this crate is synchronous and free of I/O. Fetching and
//! persisting live in `habsnap-client` and `habsnap-storage`.

pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod item;
pub mod name_map;
pub mod root;
pub mod snapshot;
pub mod tags;
pub mod tree;

pub use error::{Error, Result};
pub use graph::MembershipGraph;
pub use index::{FlatIndex, FlatIndexBuilder};
pub use item::{Item, RawItem, StructuralEntry};
pub use name_map::NameMap;
pub use root::{EnrichedRoot, Link, RestRoot};
pub use snapshot::{IndexSummary, ItemsIndex};
pub use tags::{Role, Semantic, TagKind};
pub use tree::{AssemblyReport, EquipmentNode, HierarchyAssembler, LocationNode, PointRef, SemanticTree};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{defaults, env_vars, files};
    pub use crate::error::{Error, Result};
    pub use crate::index::FlatIndex;
    pub use crate::item::{Item, RawItem};
    pub use crate::root::{EnrichedRoot, RestRoot};
    pub use crate::snapshot::ItemsIndex;
    pub use crate::tree::{AssemblyReport, SemanticTree};
}
