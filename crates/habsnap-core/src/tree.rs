//! Location → Equipment → Point forest.
//!
//! The forest is rebuilt from group memberships on every run:
//!
//! 1. every location becomes a node; a location whose `groupNames` name no
//!    other location is a root, otherwise it hangs below the first location
//!    it names;
//! 2. equipment hangs below the first location it names, or is left out;
//! 3. points go to the first reachable equipment they name, else to the
//!    first location they name, else they are left out.
//!
//! "First" always means position in `groupNames`. Anything left out of the
//! forest is still in the flat index.
//!
//! Each location records exactly one parent, so the location links form a
//! functional graph. A membership cycle (`A` in `B`, `B` in `A`, or a
//! location in itself) leaves the locations on it, and everything below
//! them, unreachable from the roots. Those are dropped from the forest and
//! reported in [`AssemblyReport::detached_locations`].

use crate::graph::{first_match, MembershipGraph};
use crate::index::FlatIndex;
use crate::tags::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bare reference to a flat-index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRef {
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentNode {
    pub item: String,
    pub points: Vec<PointRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub item: String,
    pub children_locations: Vec<LocationNode>,
    pub equipment: Vec<EquipmentNode>,
    pub points: Vec<PointRef>,
}

impl LocationNode {
    fn empty(item: &str) -> Self {
        Self {
            item: item.to_string(),
            children_locations: Vec::new(),
            equipment: Vec::new(),
            points: Vec::new(),
        }
    }
}

/// The forest. Roots are in location index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTree {
    pub locations: Vec<LocationNode>,
}

impl SemanticTree {
    /// Build the forest for `index`.
    pub fn build(index: &FlatIndex) -> (Self, AssemblyReport) {
        HierarchyAssembler::new(index).assemble()
    }

    /// Depth-first walk over all locations, with their depth (roots are 0).
    pub fn walk(&self) -> Vec<(usize, &LocationNode)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &LocationNode)> =
            self.locations.iter().rev().map(|n| (0, n)).collect();
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            stack.extend(node.children_locations.iter().rev().map(|c| (depth + 1, c)));
        }
        out
    }

    pub fn find_location(&self, name: &str) -> Option<&LocationNode> {
        self.walk()
            .into_iter()
            .map(|(_, node)| node)
            .find(|node| node.item == name)
    }

    pub fn find_equipment(&self, name: &str) -> Option<&EquipmentNode> {
        self.walk()
            .into_iter()
            .flat_map(|(_, node)| node.equipment.iter())
            .find(|eq| eq.item == name)
    }

    pub fn location_count(&self) -> usize {
        self.walk().len()
    }

    pub fn equipment_count(&self) -> usize {
        self.walk().iter().map(|(_, n)| n.equipment.len()).sum()
    }

    pub fn point_count(&self) -> usize {
        self.walk()
            .iter()
            .map(|(_, n)| n.points.len() + n.equipment.iter().map(|e| e.points.len()).sum::<usize>())
            .sum()
    }
}

/// What one assembly pass could not place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Equipment that names no location.
    pub omitted_equipment: Vec<String>,
    /// Points that name neither placed equipment nor a location.
    pub omitted_points: Vec<String>,
    /// Locations caught in, or hanging below, a membership cycle.
    pub detached_locations: Vec<String>,
}

impl AssemblyReport {
    pub fn is_clean(&self) -> bool {
        self.omitted_equipment.is_empty()
            && self.omitted_points.is_empty()
            && self.detached_locations.is_empty()
    }
}

#[derive(Debug)]
struct LocationSlot {
    children: Vec<usize>,
    equipment: Vec<usize>,
    points: Vec<PointRef>,
}

#[derive(Debug)]
struct EquipmentSlot {
    name: String,
    points: Vec<PointRef>,
}

/// Single-use builder for one forest.
///
/// Location slot `i` is the `i`-th entry of `index.locations`, so the
/// location set doubles as the name → slot lookup.
#[derive(Debug)]
pub struct HierarchyAssembler<'a> {
    index: &'a FlatIndex,
    graph: MembershipGraph,
    locations: Vec<LocationSlot>,
    roots: Vec<usize>,
    equipment: Vec<EquipmentSlot>,
    report: AssemblyReport,
}

impl<'a> HierarchyAssembler<'a> {
    pub fn new(index: &'a FlatIndex) -> Self {
        let locations = index
            .locations
            .keys()
            .map(|_| LocationSlot {
                children: Vec::new(),
                equipment: Vec::new(),
                points: Vec::new(),
            })
            .collect();

        Self {
            index,
            graph: MembershipGraph::from_index(index),
            locations,
            roots: Vec::new(),
            equipment: Vec::new(),
            report: AssemblyReport::default(),
        }
    }

    pub fn assemble(mut self) -> (SemanticTree, AssemblyReport) {
        self.nest_locations();
        self.place_equipment();
        let reachable = self.reachable_locations();
        self.place_points(&reachable);
        self.collect_detached(&reachable);

        let mut visited = vec![false; self.locations.len()];
        let roots = std::mem::take(&mut self.roots);
        let locations = roots
            .into_iter()
            .filter_map(|slot| self.materialize(slot, &mut visited))
            .collect();

        (SemanticTree { locations }, self.report)
    }

    fn nest_locations(&mut self) {
        let index = self.index;
        let locations = &index.locations;
        for (slot, entry) in locations.values().enumerate() {
            match first_match(&entry.group_names, |g| locations.contains_key(g)) {
                None => self.roots.push(slot),
                Some(parent) => {
                    if let Some(parent_slot) = locations.position(parent) {
                        self.locations[parent_slot].children.push(slot);
                    }
                }
            }
        }
    }

    fn place_equipment(&mut self) {
        let index = self.index;
        for entry in index.equipment.values() {
            let parent = first_match(&entry.group_names, |g| index.locations.contains_key(g))
                .and_then(|g| index.locations.position(g));
            match parent {
                Some(slot) => {
                    self.locations[slot].equipment.push(self.equipment.len());
                    self.equipment.push(EquipmentSlot {
                        name: entry.name.clone(),
                        points: Vec::new(),
                    });
                }
                None => {
                    tracing::debug!("Equipment {} has no location, left out of the tree", entry.name);
                    self.report.omitted_equipment.push(entry.name.clone());
                }
            }
        }
    }

    /// Locations reachable from the roots, depth first, each visited once.
    fn reachable_locations(&self) -> Vec<bool> {
        let mut visited = vec![false; self.locations.len()];
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            if visited[slot] {
                continue;
            }
            visited[slot] = true;
            stack.extend(self.locations[slot].children.iter().rev().copied());
        }
        visited
    }

    fn place_points(&mut self, reachable: &[bool]) {
        let index = self.index;
        let equipment_by_name: HashMap<&str, usize> = self
            .locations
            .iter()
            .enumerate()
            .filter(|(slot, _)| reachable[*slot])
            .flat_map(|(_, loc)| loc.equipment.iter().copied())
            .map(|eq| (self.equipment[eq].name.as_str(), eq))
            .collect();

        let mut to_equipment = Vec::new();
        let mut to_location = Vec::new();

        for item in index.with_role(Role::Point) {
            let name = item.name.as_str();
            if let Some(eq) = self
                .graph
                .first_parent_where(name, |g| equipment_by_name.contains_key(g))
                .and_then(|g| equipment_by_name.get(g))
            {
                to_equipment.push((*eq, name));
                continue;
            }
            if let Some(slot) = self
                .graph
                .first_parent_where(name, |g| index.locations.contains_key(g))
                .and_then(|g| index.locations.position(g))
            {
                to_location.push((slot, name));
                continue;
            }
            tracing::debug!("Point {} has no structural parent, left out of the tree", name);
            self.report.omitted_points.push(name.to_string());
        }

        for (eq, name) in to_equipment {
            self.equipment[eq].points.push(PointRef {
                item: name.to_string(),
            });
        }
        for (slot, name) in to_location {
            self.locations[slot].points.push(PointRef {
                item: name.to_string(),
            });
        }
    }

    fn collect_detached(&mut self, reachable: &[bool]) {
        let index = self.index;
        for (slot, name) in index.locations.keys().enumerate() {
            if !reachable[slot] {
                tracing::warn!(
                    "Location {} is part of (or nested below) a group membership cycle, left out of the tree",
                    name
                );
                self.report.detached_locations.push(name.to_string());
            }
        }
    }

    /// Turn the subtree under `root` into owned nodes without recursing.
    ///
    /// Slots are listed in pre-order and built in reverse, so every child
    /// is finished before its parent picks it up.
    fn materialize(&mut self, root: usize, visited: &mut [bool]) -> Option<LocationNode> {
        if visited[root] {
            return None;
        }
        visited[root] = true;

        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(slot) = stack.pop() {
            order.push(slot);
            for &child in self.locations[slot].children.iter().rev() {
                if !visited[child] {
                    visited[child] = true;
                    stack.push(child);
                }
            }
        }

        let index = self.index;
        let mut built: HashMap<usize, LocationNode> = HashMap::with_capacity(order.len());
        for &slot in order.iter().rev() {
            let Some(name) = index.locations.key_at(slot) else {
                continue;
            };
            let mut node = LocationNode::empty(name);

            node.children_locations = std::mem::take(&mut self.locations[slot].children)
                .into_iter()
                .filter_map(|child| built.remove(&child))
                .collect();
            node.equipment = self.locations[slot]
                .equipment
                .iter()
                .map(|&eq| EquipmentNode {
                    item: self.equipment[eq].name.clone(),
                    points: std::mem::take(&mut self.equipment[eq].points),
                })
                .collect();
            node.points = std::mem::take(&mut self.locations[slot].points);

            built.insert(slot, node);
        }
        built.remove(&root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RawItem;

    fn loc(name: &str, groups: &[&str]) -> RawItem {
        RawItem::new(name).with_tags(&["Location"]).with_groups(groups)
    }

    fn equip(name: &str, groups: &[&str]) -> RawItem {
        RawItem::new(name).with_tags(&["Equipment"]).with_groups(groups)
    }

    fn point(name: &str, groups: &[&str]) -> RawItem {
        RawItem::new(name).with_tags(&["Point"]).with_groups(groups)
    }

    fn build(items: Vec<RawItem>) -> (SemanticTree, AssemblyReport) {
        SemanticTree::build(&FlatIndex::build(items))
    }

    #[test]
    fn test_roots_in_location_order() {
        let (tree, report) = build(vec![
            loc("Upstairs", &["gAll"]),
            loc("Garden", &[]),
            loc("Bedroom", &["Upstairs"]),
        ]);

        let roots: Vec<_> = tree.locations.iter().map(|l| l.item.as_str()).collect();
        assert_eq!(roots, vec!["Upstairs", "Garden"]);
        assert_eq!(tree.locations[0].children_locations[0].item, "Bedroom");
        assert!(report.is_clean());
    }

    #[test]
    fn test_first_matching_parent_wins() {
        let (tree, _) = build(vec![
            loc("LocRoot", &[]),
            loc("GroupA", &["LocRoot"]),
            loc("Room", &["GroupA", "LocRoot"]),
        ]);

        let root = &tree.locations[0];
        assert_eq!(root.item, "LocRoot");
        assert_eq!(root.children_locations.len(), 1);
        assert_eq!(root.children_locations[0].item, "GroupA");
        assert_eq!(root.children_locations[0].children_locations[0].item, "Room");
    }

    #[test]
    fn test_child_listed_before_parent_still_nests() {
        let (tree, _) = build(vec![loc("Room", &["Floor"]), loc("Floor", &[])]);
        assert_eq!(tree.locations.len(), 1);
        assert_eq!(tree.locations[0].item, "Floor");
        assert_eq!(tree.locations[0].children_locations[0].item, "Room");
    }

    #[test]
    fn test_equipment_skips_non_location_groups() {
        let (tree, report) = build(vec![
            loc("Kitchen", &[]),
            equip("Fridge", &["gAppliances", "Kitchen"]),
            equip("Portable", &["gAppliances"]),
        ]);

        assert_eq!(tree.locations[0].equipment[0].item, "Fridge");
        assert!(tree.find_equipment("Portable").is_none());
        assert_eq!(report.omitted_equipment, vec!["Portable"]);
    }

    #[test]
    fn test_equipment_inside_equipment_is_omitted() {
        let (tree, report) = build(vec![
            loc("Kitchen", &[]),
            equip("Stove", &["Kitchen"]),
            equip("Oven", &["Stove"]),
        ]);
        assert_eq!(tree.equipment_count(), 1);
        assert_eq!(report.omitted_equipment, vec!["Oven"]);
    }

    #[test]
    fn test_point_prefers_equipment_over_location() {
        let (tree, report) = build(vec![
            loc("Kitchen", &[]),
            equip("Fridge", &["Kitchen"]),
            point("Power", &["Kitchen", "Fridge"]),
            point("Humidity", &["Kitchen"]),
            point("Lost", &["gNothing"]),
        ]);

        let kitchen = &tree.locations[0];
        assert_eq!(kitchen.equipment[0].points, vec![PointRef { item: "Power".into() }]);
        assert_eq!(kitchen.points, vec![PointRef { item: "Humidity".into() }]);
        assert_eq!(report.omitted_points, vec!["Lost"]);
        assert_eq!(tree.point_count(), 2);
    }

    #[test]
    fn test_point_under_nested_equipment() {
        let (tree, _) = build(vec![
            loc("House", &[]),
            loc("Floor", &["House"]),
            loc("Bath", &["Floor"]),
            equip("Heater", &["Bath"]),
            point("HeaterTemp", &["Heater"]),
        ]);

        let heater = tree.find_equipment("Heater").unwrap();
        assert_eq!(heater.points[0].item, "HeaterTemp");
    }

    #[test]
    fn test_point_of_orphan_equipment_falls_back_to_location() {
        let (tree, report) = build(vec![
            loc("Garage", &[]),
            equip("Car", &[]),
            point("Battery", &["Car", "Garage"]),
        ]);

        assert_eq!(tree.locations[0].points[0].item, "Battery");
        assert_eq!(report.omitted_equipment, vec!["Car"]);
        assert!(report.omitted_points.is_empty());
    }

    #[test]
    fn test_membership_cycle_terminates_and_is_reported() {
        let (tree, report) = build(vec![
            loc("Home", &[]),
            loc("A", &["B"]),
            loc("B", &["A"]),
            loc("Self", &["Self"]),
            loc("BelowA", &["A"]),
            equip("Boiler", &["A"]),
            point("BoilerTemp", &["Boiler"]),
        ]);

        assert_eq!(tree.location_count(), 1);
        assert_eq!(tree.locations[0].item, "Home");
        assert_eq!(report.detached_locations, vec!["A", "B", "Self", "BelowA"]);
        assert!(tree.find_equipment("Boiler").is_none());
        assert_eq!(report.omitted_points, vec!["BoilerTemp"]);
        assert!(report.omitted_equipment.is_empty());
    }

    #[test]
    fn test_deep_location_chain() {
        let mut items = vec![loc("L0", &[])];
        for depth in 1..1_000 {
            let parent = format!("L{}", depth - 1);
            items.push(
                RawItem::new(format!("L{}", depth))
                    .with_tags(&["Location"])
                    .with_groups(&[parent.as_str()]),
            );
        }
        items.push(point("DeepTemp", &["L999"]));

        let (tree, report) = build(items);
        assert!(report.is_clean());
        assert_eq!(tree.locations.len(), 1);

        let walked = tree.walk();
        assert_eq!(walked.len(), 1_000);
        let (depth, deepest) = walked[walked.len() - 1];
        assert_eq!(depth, 999);
        assert_eq!(deepest.item, "L999");
        assert_eq!(deepest.points[0].item, "DeepTemp");
    }

    #[test]
    fn test_multi_role_item() {
        let (tree, _) = build(vec![
            loc("Home", &[]),
            RawItem::new("Thermostat")
                .with_tags(&["Equipment", "Point"])
                .with_groups(&["Home"]),
        ]);

        let home = &tree.locations[0];
        assert_eq!(home.equipment[0].item, "Thermostat");
        assert_eq!(home.points[0].item, "Thermostat");
    }

    #[test]
    fn test_idempotent() {
        let index = FlatIndex::build(vec![
            loc("Home", &[]),
            loc("Kitchen", &["Home"]),
            equip("Fridge", &["Kitchen"]),
            point("FridgeTemp", &["Fridge"]),
            point("KitchenTemp", &["Kitchen"]),
        ]);

        let first = SemanticTree::build(&index);
        let second = SemanticTree::build(&index);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.0).unwrap(),
            serde_json::to_string(&second.0).unwrap()
        );
    }

    #[test]
    fn test_walk_order_and_depth() {
        let (tree, _) = build(vec![
            loc("A", &[]),
            loc("A1", &["A"]),
            loc("A1x", &["A1"]),
            loc("A2", &["A"]),
            loc("B", &[]),
        ]);

        let walked: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(d, n)| (d, n.item.as_str()))
            .collect();
        assert_eq!(
            walked,
            vec![(0, "A"), (1, "A1"), (2, "A1x"), (1, "A2"), (0, "B")]
        );
        assert!(tree.find_location("A1x").is_some());
    }
}
