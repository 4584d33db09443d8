//! Semantic tag classification.
//!
//! Classification is purely lexical: a tag either is one of the three marker
//! literals (`Location`, `Equipment`, `Point`), ends with one of them
//! (`IndoorLocation`, `HVACEquipment`, `MeasurementPoint`), or is a plain
//! property tag. Subtype tags that do not carry the suffix (`Kitchen`,
//! `Temperature`) are properties.

use serde::{Deserialize, Serialize};

/// Structural role of an item in the Location → Equipment → Point model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Location,
    Equipment,
    Point,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Location, Role::Equipment, Role::Point];

    /// The marker literal for this role.
    pub fn marker(&self) -> &'static str {
        match self {
            Role::Location => "Location",
            Role::Equipment => "Equipment",
            Role::Point => "Point",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

/// What a single tag says about an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Exactly `"Location"`, `"Equipment"` or `"Point"`.
    Marker(Role),
    /// Ends with a marker, e.g. `"IndoorLocation"`. Also kept as a property.
    Qualified(Role),
    /// Anything else.
    Property,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        match tag {
            "Location" => TagKind::Marker(Role::Location),
            "Equipment" => TagKind::Marker(Role::Equipment),
            "Point" => TagKind::Marker(Role::Point),
            t if t.ends_with("Location") => TagKind::Qualified(Role::Location),
            t if t.ends_with("Equipment") => TagKind::Qualified(Role::Equipment),
            t if t.ends_with("Point") => TagKind::Qualified(Role::Point),
            _ => TagKind::Property,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            TagKind::Marker(role) | TagKind::Qualified(role) => Some(*role),
            TagKind::Property => None,
        }
    }

    /// Whether the tag survives into `propertyTags`.
    pub fn is_property(&self) -> bool {
        !matches!(self, TagKind::Marker(_))
    }
}

/// Derived semantic classification of one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semantic {
    pub is_location: bool,
    pub is_equipment: bool,
    pub is_point: bool,
    pub property_tags: Vec<String>,
}

impl Semantic {
    /// Classify a tag list. Flags are not mutually exclusive.
    pub fn classify(tags: &[String]) -> Self {
        let mut semantic = Semantic::default();
        for tag in tags {
            let kind = TagKind::of(tag);
            match kind.role() {
                Some(Role::Location) => semantic.is_location = true,
                Some(Role::Equipment) => semantic.is_equipment = true,
                Some(Role::Point) => semantic.is_point = true,
                None => {}
            }
            if kind.is_property() {
                semantic.property_tags.push(tag.clone());
            }
        }
        semantic
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Location => self.is_location,
            Role::Equipment => self.is_equipment,
            Role::Point => self.is_point,
        }
    }

    /// Roles set on this item, in Location, Equipment, Point order.
    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tag_kind() {
        assert_eq!(TagKind::of("Location"), TagKind::Marker(Role::Location));
        assert_eq!(TagKind::of("IndoorLocation"), TagKind::Qualified(Role::Location));
        assert_eq!(TagKind::of("HVACEquipment"), TagKind::Qualified(Role::Equipment));
        assert_eq!(TagKind::of("MeasurementPoint"), TagKind::Qualified(Role::Point));
        assert_eq!(TagKind::of("Temperature"), TagKind::Property);
        // Case sensitive, suffix only
        assert_eq!(TagKind::of("location"), TagKind::Property);
        assert_eq!(TagKind::of("PointOfView"), TagKind::Property);
        assert_eq!(TagKind::of(""), TagKind::Property);
    }

    #[test]
    fn test_classify_markers_removed_from_properties() {
        let semantic = Semantic::classify(&tags(&["Point", "Temperature"]));
        assert!(semantic.is_point);
        assert!(!semantic.is_location);
        assert!(!semantic.is_equipment);
        assert_eq!(semantic.property_tags, vec!["Temperature"]);
    }

    #[test]
    fn test_classify_qualified_tags_kept_as_properties() {
        let semantic = Semantic::classify(&tags(&["IndoorLocation", "Location"]));
        assert!(semantic.is_location);
        assert_eq!(semantic.property_tags, vec!["IndoorLocation"]);
    }

    #[test]
    fn test_classify_multiple_roles() {
        let semantic = Semantic::classify(&tags(&["Equipment", "ControlPoint", "Light"]));
        assert!(semantic.is_equipment);
        assert!(semantic.is_point);
        assert_eq!(semantic.roles(), vec![Role::Equipment, Role::Point]);
        assert_eq!(semantic.property_tags, vec!["ControlPoint", "Light"]);
    }

    #[test]
    fn test_classify_keeps_duplicates_and_order() {
        let semantic = Semantic::classify(&tags(&["Light", "Point", "Light", "Switch"]));
        assert_eq!(semantic.property_tags, vec!["Light", "Light", "Switch"]);
    }

    #[test]
    fn test_classify_empty() {
        let semantic = Semantic::classify(&[]);
        assert_eq!(semantic, Semantic::default());
        assert!(semantic.roles().is_empty());
    }

    #[test]
    fn test_semantic_json_shape() {
        let semantic = Semantic::classify(&tags(&["Location"]));
        let json = serde_json::to_value(&semantic).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isLocation": true,
                "isEquipment": false,
                "isPoint": false,
                "propertyTags": []
            })
        );
    }
}
