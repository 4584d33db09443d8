//! End-to-end index building over REST-shaped payloads.

use habsnap_core::{ItemsIndex, RawItem};
use serde_json::json;

#[test]
fn test_kitchen_fridge_scenario() {
    let payload = json!([
        {"name": "Kitchen", "tags": ["Location"], "groupNames": []},
        {"name": "Fridge", "tags": ["Equipment"], "groupNames": ["Kitchen"]},
        {"name": "FridgeTemp", "tags": ["Point", "Temperature"], "groupNames": ["Fridge"]}
    ]);

    let (index, report) = ItemsIndex::from_values(payload.as_array().unwrap());
    assert!(report.is_clean());

    let tree = serde_json::to_value(&index.semantic_tree).unwrap();
    assert_eq!(
        tree,
        json!({
            "locations": [{
                "item": "Kitchen",
                "children_locations": [],
                "equipment": [{"item": "Fridge", "points": [{"item": "FridgeTemp"}]}],
                "points": []
            }]
        })
    );

    let temp = index.items_by_name.get("FridgeTemp").unwrap();
    assert_eq!(temp.semantic.property_tags, vec!["Temperature"]);
    assert_eq!(temp.rest_url, "/rest/items/FridgeTemp");
}

#[test]
fn test_document_keys_and_order() {
    let payload = json!([
        {"name": "Zulu", "tags": ["Location"], "state": "NULL"},
        {"name": "Alpha", "tags": ["Point"], "groupNames": ["Zulu"], "state": "21.5"}
    ]);

    let (index, _) = ItemsIndex::from_values(payload.as_array().unwrap());
    let text = serde_json::to_string(&index).unwrap();

    assert!(text.starts_with(r#"{"items_by_name":{"Zulu":"#));
    assert!(text.find("\"Zulu\"").unwrap() < text.find("\"Alpha\"").unwrap());
    assert!(text.contains(r#""semantic_tree":{"locations":[{"item":"Zulu""#));
    assert!(!text.contains("21.5"));
}

#[test]
fn test_orphan_equipment_stays_in_flat_index() {
    let (index, report) = ItemsIndex::build(vec![
        RawItem::new("Home").with_tags(&["Location"]),
        RawItem::new("Drone").with_tags(&["Equipment"]).with_groups(&["gGadgets"]),
    ]);

    assert!(index.items_by_name.contains_key("Drone"));
    assert!(index.semantic_tree.find_equipment("Drone").is_none());
    assert_eq!(report.omitted_equipment, vec!["Drone"]);
}

#[test]
fn test_document_round_trip() {
    let (index, _) = ItemsIndex::build(vec![
        RawItem::new("Home").with_tags(&["Location"]),
        RawItem::new("Office").with_tags(&["Room", "Location"]).with_groups(&["Home"]),
        RawItem::new("Desk_Lamp")
            .with_tags(&["Lightbulb"])
            .with_groups(&["Office"]),
        RawItem::new("Desk_Lamp_Switch")
            .with_tags(&["Switch", "Point"])
            .with_groups(&["Office"]),
    ]);

    let text = serde_json::to_string_pretty(&index).unwrap();
    let parsed: ItemsIndex = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, index);

    let summary = parsed.summary();
    assert_eq!(summary.items, 4);
    assert_eq!(summary.locations, 2);
    assert_eq!(summary.points, 1);
    assert_eq!(summary.tree_roots, 1);
    assert_eq!(summary.tree_locations, 2);
    assert_eq!(summary.tree_points, 1);
}

#[test]
fn test_duplicate_name_that_changes_role_keeps_stale_location() {
    // The role sets are keyed independently of the flat index, so a name that
    // was a location and is later re-sent as a point still nests as a location.
    let (index, _) = ItemsIndex::build(vec![
        RawItem::new("Hall").with_tags(&["Location"]),
        RawItem::new("Hall").with_tags(&["Point"]),
    ]);

    assert!(index.items_by_name.get("Hall").unwrap().semantic.is_point);
    assert_eq!(index.semantic_tree.locations[0].item, "Hall");
}
