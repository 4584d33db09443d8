//! Crawl pipeline: fetch, persist, index.

use anyhow::{Context, Result};
use habsnap_client::OpenHabSource;
use habsnap_core::{AssemblyReport, IndexSummary, ItemsIndex};
use habsnap_storage::{read_json, SnapshotStore};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Keep a copy of the raw item payload next to the index.
    pub write_raw: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self { write_raw: true }
    }
}

#[derive(Debug)]
pub struct CrawlOutcome {
    pub summary: IndexSummary,
    pub report: AssemblyReport,
    pub index_path: PathBuf,
}

/// Fetch the root and the items from `source` and write a full snapshot.
pub async fn crawl<S>(source: &S, store: &SnapshotStore, options: &CrawlOptions) -> Result<CrawlOutcome>
where
    S: OpenHabSource + ?Sized,
{
    let root = source
        .fetch_rest_root()
        .await
        .context("Failed to fetch REST root")?;
    store
        .write_rest_root(&root)
        .context("Failed to write REST root")?;

    let items = source
        .fetch_items(&root)
        .await
        .context("Failed to fetch items")?;
    tracing::info!("Fetched {} items", items.len());

    if options.write_raw {
        store
            .write_raw_items(&items)
            .context("Failed to write raw items")?;
    }

    index_items(store, &items)
}

/// Rebuild `index.json` from a stored raw item file.
pub fn rebuild(store: &SnapshotStore, input: &Path) -> Result<CrawlOutcome> {
    let items: Vec<JsonValue> = read_json(input)
        .with_context(|| format!("Failed to read raw items from {}", input.display()))?;
    tracing::info!("Loaded {} raw items from {}", items.len(), input.display());
    index_items(store, &items)
}

fn index_items(store: &SnapshotStore, items: &[JsonValue]) -> Result<CrawlOutcome> {
    let (index, report) = ItemsIndex::from_values(items);
    let summary = index.summary();

    log_report(&report);
    tracing::info!("Indexed {}", summary);

    let index_path = store.write_index(&index).context("Failed to write index")?;
    Ok(CrawlOutcome {
        summary,
        report,
        index_path,
    })
}

fn log_report(report: &AssemblyReport) {
    if !report.omitted_equipment.is_empty() {
        tracing::info!(
            "{} equipment items have no location and are only in the flat index",
            report.omitted_equipment.len()
        );
    }
    if !report.omitted_points.is_empty() {
        tracing::info!(
            "{} points have no structural parent and are only in the flat index",
            report.omitted_points.len()
        );
    }
    if !report.detached_locations.is_empty() {
        tracing::warn!(
            "{} locations dropped from the tree due to group membership cycles: {}",
            report.detached_locations.len(),
            report.detached_locations.join(", ")
        );
    }
}
