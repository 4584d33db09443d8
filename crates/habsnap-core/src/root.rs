//! The `/rest/` root payload and endpoint resolution.

use crate::error::{Error, Result};
use crate::name_map::NameMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One entry of the root `links` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Link {
    pub fn new(link_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            link_type: Some(link_type.into()),
            url: Some(url.into()),
        }
    }
}

/// `GET /rest/` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestRoot {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub measurement_system: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub runtime_info: Option<JsonValue>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl RestRoot {
    /// Add the `type → url` endpoint map.
    pub fn enrich(self) -> EnrichedRoot {
        let mut endpoint_map = NameMap::new();
        for link in &self.links {
            if let (Some(t), Some(u)) = (&link.link_type, &link.url) {
                if !t.is_empty() && !u.is_empty() {
                    endpoint_map.insert(t.clone(), u.clone());
                }
            }
        }

        EnrichedRoot {
            version: self.version,
            locale: self.locale,
            measurement_system: self.measurement_system,
            timezone: self.timezone,
            runtime_info: self.runtime_info,
            links: self.links,
            endpoint_map,
        }
    }
}

/// Root payload plus endpoint map; the `rest_root.json` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRoot {
    pub version: Option<String>,
    pub locale: Option<String>,
    #[serde(rename = "measurementSystem")]
    pub measurement_system: Option<String>,
    pub timezone: Option<String>,
    #[serde(rename = "runtimeInfo")]
    pub runtime_info: Option<JsonValue>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub endpoint_map: NameMap<String>,
}

impl EnrichedRoot {
    /// Resolve an endpoint URL by link type.
    ///
    /// The endpoint map is consulted first; the raw links are scanned only
    /// when the map has no entry (e.g. a hand-edited `rest_root.json`).
    pub fn find_link(&self, link_type: &str) -> Option<&str> {
        if let Some(url) = self.endpoint_map.get(link_type) {
            return Some(url.as_str());
        }
        self.links
            .iter()
            .find(|l| l.link_type.as_deref() == Some(link_type))
            .and_then(|l| l.url.as_deref())
    }

    pub fn require_link(&self, link_type: &str) -> Result<&str> {
        self.find_link(link_type)
            .ok_or_else(|| Error::MissingLink(link_type.to_string()))
    }
}
