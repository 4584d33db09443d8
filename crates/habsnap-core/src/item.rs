//! Item records: the raw upstream shape and the flat index entry.

use crate::tags::Semantic;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One item as returned by `GET /rest/items`.
///
/// Only the fields the index needs are kept. `state` and friends are
/// volatile and deliberately not modelled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "groupNames", default, deserialize_with = "null_as_default")]
    pub group_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, JsonValue>,
}

impl RawItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.group_names = groups.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The item name, if present and non-empty.
    pub fn valid_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// REST path of an item, relative to the server root.
pub fn rest_url(name: &str) -> String {
    format!("/rest/items/{}", name)
}

/// Flat index entry for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "groupNames")]
    pub group_names: Vec<String>,
    pub metadata: Map<String, JsonValue>,
    pub semantic: Semantic,
    pub rest_url: String,
}

impl Item {
    /// Build an entry from a raw record. Returns `None` for nameless records.
    pub fn from_raw(raw: RawItem) -> Option<Self> {
        let name = raw.valid_name()?.to_string();
        let semantic = Semantic::classify(&raw.tags);
        Some(Self {
            rest_url: rest_url(&name),
            name,
            label: raw.label,
            item_type: raw.item_type,
            category: raw.category,
            tags: raw.tags,
            group_names: raw.group_names,
            metadata: raw.metadata,
            semantic,
        })
    }

    pub fn structural_entry(&self) -> StructuralEntry {
        StructuralEntry {
            name: self.name.clone(),
            tags: self.tags.clone(),
            group_names: self.group_names.clone(),
        }
    }
}

/// Slim record kept for locations and equipment during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralEntry {
    pub name: String,
    pub tags: Vec<String>,
    #[serde(rename = "groupNames")]
    pub group_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_item_ignores_state_and_unknown_fields() {
        let raw: RawItem = serde_json::from_value(json!({
            "link": "http://oh:8080/rest/items/Kitchen_Light",
            "state": "ON",
            "editable": true,
            "type": "Switch",
            "name": "Kitchen_Light",
            "label": "Kitchen Light",
            "category": "lightbulb",
            "tags": ["Switch", "Light"],
            "groupNames": ["Kitchen"]
        }))
        .unwrap();

        assert_eq!(raw.valid_name(), Some("Kitchen_Light"));
        assert_eq!(raw.item_type.as_deref(), Some("Switch"));
        assert_eq!(raw.group_names, vec!["Kitchen"]);
        assert!(raw.metadata.is_empty());
    }

    #[test]
    fn test_raw_item_nulls_become_empty() {
        let raw: RawItem = serde_json::from_value(json!({
            "name": "X",
            "tags": null,
            "groupNames": null,
            "metadata": null
        }))
        .unwrap();
        assert!(raw.tags.is_empty());
        assert!(raw.group_names.is_empty());
        assert!(raw.metadata.is_empty());
    }

    #[test]
    fn test_metadata_keeps_upstream_key_order() {
        let raw: RawItem = serde_json::from_str(
            r#"{"name": "Lamp", "metadata": {"zeta": {"value": "1"}, "alpha": {"value": "2"}}}"#,
        )
        .unwrap();
        let item = Item::from_raw(raw).unwrap();

        assert_eq!(item.metadata.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(
            serde_json::to_string(&item.metadata).unwrap(),
            r#"{"zeta":{"value":"1"},"alpha":{"value":"2"}}"#
        );
    }

    #[test]
    fn test_from_raw_requires_name() {
        assert!(Item::from_raw(RawItem::default()).is_none());
        assert!(Item::from_raw(RawItem::new("")).is_none());
    }

    #[test]
    fn test_item_json_shape() {
        let item = Item::from_raw(
            RawItem::new("FridgeTemp")
                .with_label("Fridge temperature")
                .with_tags(&["Point", "Temperature"])
                .with_groups(&["Fridge"]),
        )
        .unwrap();

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            json!({
                "name": "FridgeTemp",
                "label": "Fridge temperature",
                "type": null,
                "category": null,
                "tags": ["Point", "Temperature"],
                "groupNames": ["Fridge"],
                "metadata": {},
                "semantic": {
                    "isLocation": false,
                    "isEquipment": false,
                    "isPoint": true,
                    "propertyTags": ["Temperature"]
                },
                "rest_url": "/rest/items/FridgeTemp"
            })
        );
    }
}
