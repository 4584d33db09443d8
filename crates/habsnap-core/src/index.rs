//! Flat index: the name-keyed catalog of every item.
//!
//! Besides the catalog itself, building the index collects the two
//! auxiliary role sets (`locations`, `equipment`) that feed the hierarchy
//! assembler. Those sets are scratch data and are never persisted.

use crate::item::{Item, RawItem, StructuralEntry};
use crate::name_map::NameMap;
use crate::tags::Role;
use serde_json::Value as JsonValue;

/// Result of indexing one item list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIndex {
    pub items_by_name: NameMap<Item>,
    pub locations: NameMap<StructuralEntry>,
    pub equipment: NameMap<StructuralEntry>,
    /// Records dropped because they had no usable name.
    pub skipped: usize,
}

impl FlatIndex {
    /// Index typed records.
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RawItem>,
    {
        let mut builder = FlatIndexBuilder::new();
        for item in items {
            builder.push(item);
        }
        builder.finish()
    }

    /// Index an untyped payload as returned by the REST API.
    ///
    /// Records that are not objects, or whose known fields have the wrong
    /// shape, are skipped like nameless ones.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a JsonValue>,
    {
        let mut builder = FlatIndexBuilder::new();
        for value in values {
            builder.push_value(value);
        }
        builder.finish()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items_by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.items_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_by_name.is_empty()
    }

    /// Items carrying `role`, in index order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Item> {
        self.items_by_name
            .values()
            .filter(move |item| item.semantic.has_role(role))
    }
}

/// Incremental builder for [`FlatIndex`]. One builder per run.
#[derive(Debug, Default)]
pub struct FlatIndexBuilder {
    index: FlatIndex,
}

impl FlatIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Later records with the same name replace earlier ones.
    pub fn push(&mut self, raw: RawItem) {
        let Some(item) = Item::from_raw(raw) else {
            self.index.skipped += 1;
            tracing::debug!("Skipping item without a name");
            return;
        };

        if item.semantic.is_location {
            self.index
                .locations
                .insert(item.name.clone(), item.structural_entry());
        }
        if item.semantic.is_equipment {
            self.index
                .equipment
                .insert(item.name.clone(), item.structural_entry());
        }

        if self
            .index
            .items_by_name
            .insert(item.name.clone(), item)
            .is_some()
        {
            tracing::debug!("Duplicate item name, keeping the last occurrence");
        }
    }

    pub fn push_value(&mut self, value: &JsonValue) {
        match serde_json::from_value::<RawItem>(value.clone()) {
            Ok(raw) => self.push(raw),
            Err(e) => {
                self.index.skipped += 1;
                tracing::debug!("Skipping malformed item record: {}", e);
            }
        }
    }

    pub fn finish(self) -> FlatIndex {
        self.index
    }
}
