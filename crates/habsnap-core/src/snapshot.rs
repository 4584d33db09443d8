//! The `index.json` document: flat index plus semantic tree.

use crate::index::FlatIndex;
use crate::item::{Item, RawItem};
use crate::name_map::NameMap;
use crate::tags::Role;
use crate::tree::{AssemblyReport, SemanticTree};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Persisted index document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemsIndex {
    pub items_by_name: NameMap<Item>,
    pub semantic_tree: SemanticTree,
}

impl ItemsIndex {
    /// Build the document from typed records.
    pub fn build<I>(items: I) -> (Self, AssemblyReport)
    where
        I: IntoIterator<Item = RawItem>,
    {
        Self::from_flat(FlatIndex::build(items))
    }

    /// Build the document from the raw REST payload.
    pub fn from_values(values: &[JsonValue]) -> (Self, AssemblyReport) {
        Self::from_flat(FlatIndex::from_values(values))
    }

    pub fn from_flat(flat: FlatIndex) -> (Self, AssemblyReport) {
        let (semantic_tree, report) = SemanticTree::build(&flat);
        let index = Self {
            items_by_name: flat.items_by_name,
            semantic_tree,
        };
        (index, report)
    }

    pub fn summary(&self) -> IndexSummary {
        let count = |role| {
            self.items_by_name
                .values()
                .filter(|item| item.semantic.has_role(role))
                .count()
        };
        IndexSummary {
            items: self.items_by_name.len(),
            locations: count(Role::Location),
            equipment: count(Role::Equipment),
            points: count(Role::Point),
            tree_roots: self.semantic_tree.locations.len(),
            tree_locations: self.semantic_tree.location_count(),
            tree_equipment: self.semantic_tree.equipment_count(),
            tree_points: self.semantic_tree.point_count(),
        }
    }
}

/// Item counts of an index, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub items: usize,
    pub locations: usize,
    pub equipment: usize,
    pub points: usize,
    pub tree_roots: usize,
    pub tree_locations: usize,
    pub tree_equipment: usize,
    pub tree_points: usize,
}

impl std::fmt::Display for IndexSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} items ({} locations, {} equipment, {} points); tree: {} roots, {} locations, {} equipment, {} points",
            self.items,
            self.locations,
            self.equipment,
            self.points,
            self.tree_roots,
            self.tree_locations,
            self.tree_equipment,
            self.tree_points
        )
    }
}
