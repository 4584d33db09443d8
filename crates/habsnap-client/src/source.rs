//! Item source abstraction.

use crate::client::{OpenHabClient, OpenHabResult};
use async_trait::async_trait;
use habsnap_core::EnrichedRoot;
use serde_json::Value as JsonValue;

/// Where a crawl gets its data from.
#[async_trait]
pub trait OpenHabSource: Send + Sync {
    /// Fetch the REST root with its endpoint map.
    async fn fetch_rest_root(&self) -> OpenHabResult<EnrichedRoot>;

    /// Fetch the raw item list.
    async fn fetch_items(&self, root: &EnrichedRoot) -> OpenHabResult<Vec<JsonValue>>;
}

#[async_trait]
impl OpenHabSource for OpenHabClient {
    async fn fetch_rest_root(&self) -> OpenHabResult<EnrichedRoot> {
        OpenHabClient::fetch_rest_root(self).await
    }

    async fn fetch_items(&self, root: &EnrichedRoot) -> OpenHabResult<Vec<JsonValue>> {
        OpenHabClient::fetch_items(self, root).await
    }
}
