//! Group membership as an explicit directed graph.
//!
//! Each item points at the groups listed in its `groupNames`, in order.
//! Nothing guarantees acyclicity and parents may name items that do not
//! exist, so consumers must not assume a tree.

use crate::index::FlatIndex;
use crate::name_map::NameMap;

/// Child → parents adjacency, plus the reverse edges.
#[derive(Debug, Clone, Default)]
pub struct MembershipGraph {
    parents: NameMap<Vec<String>>,
    children: NameMap<Vec<String>>,
}

impl MembershipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph over every item of the flat index.
    pub fn from_index(index: &FlatIndex) -> Self {
        let mut graph = Self::new();
        for item in index.items_by_name.values() {
            graph.add_member(&item.name, &item.group_names);
        }
        graph
    }

    /// Record `child` as a member of `groups`. Replaces earlier edges of `child`.
    pub fn add_member(&mut self, child: &str, groups: &[String]) {
        if let Some(previous) = self.parents.insert(child, groups.to_vec()) {
            for group in previous {
                if let Some(members) = self.children.get_mut(&group) {
                    members.retain(|m| m != child);
                }
            }
        }
        for group in groups {
            match self.children.get_mut(group) {
                Some(members) => members.push(child.to_string()),
                None => {
                    self.children.insert(group.clone(), vec![child.to_string()]);
                }
            }
        }
    }

    /// Parents of `child` in `groupNames` order.
    pub fn parents(&self, child: &str) -> &[String] {
        self.parents.get(child).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct members of `group`, in the order they were added.
    pub fn children(&self, group: &str) -> &[String] {
        self.children.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First parent of `child` accepted by `accept`.
    ///
    /// This is the single tie-break rule of the whole model: position in
    /// `groupNames` decides, nothing else.
    pub fn first_parent_where<F>(&self, child: &str, accept: F) -> Option<&str>
    where
        F: FnMut(&str) -> bool,
    {
        first_match(self.parents(child), accept)
    }

    /// Number of items with recorded memberships.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// First group name accepted by `accept`, in list order.
pub fn first_match<F>(groups: &[String], mut accept: F) -> Option<&str>
where
    F: FnMut(&str) -> bool,
{
    groups.iter().map(String::as_str).find(|g| accept(g))
}
