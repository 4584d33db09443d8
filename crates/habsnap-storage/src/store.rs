//! Snapshot directory with one JSON document per file.
//!
//! Layout:
//!
//! | file             | content                                   |
//! |------------------|-------------------------------------------|
//! | `rest_root.json` | REST root plus endpoint map               |
//! | `items_raw.json` | item payload exactly as fetched           |
//! | `index.json`     | `{items_by_name, semantic_tree}`          |
//!
//! Every write goes to a temporary sibling first and is renamed into
//! place, so readers never observe a half-written document.

use crate::{Error, Result};
use habsnap_core::config::files;
use habsnap_core::{EnrichedRoot, ItemsIndex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Handle on a snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open (and create if needed) a snapshot directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn rest_root_path(&self) -> PathBuf {
        self.dir.join(files::REST_ROOT)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(files::INDEX)
    }

    pub fn raw_items_path(&self) -> PathBuf {
        self.dir.join(files::RAW_ITEMS)
    }

    pub fn write_rest_root(&self, root: &EnrichedRoot) -> Result<PathBuf> {
        let path = self.rest_root_path();
        write_json(&path, root)?;
        tracing::info!("Wrote REST root -> {}", path.display());
        Ok(path)
    }

    pub fn write_raw_items(&self, items: &[JsonValue]) -> Result<PathBuf> {
        let path = self.raw_items_path();
        write_json(&path, &items)?;
        tracing::info!("Wrote raw items -> {}", path.display());
        Ok(path)
    }

    pub fn write_index(&self, index: &ItemsIndex) -> Result<PathBuf> {
        let path = self.index_path();
        write_json(&path, index)?;
        tracing::info!("Wrote index -> {}", path.display());
        Ok(path)
    }

    pub fn read_rest_root(&self) -> Result<EnrichedRoot> {
        read_json(&self.rest_root_path())
    }

    pub fn read_raw_items(&self) -> Result<Vec<JsonValue>> {
        read_json(&self.raw_items_path())
    }

    pub fn read_index(&self) -> Result<ItemsIndex> {
        read_json(&self.index_path())
    }
}

/// Pretty-print `value` to `path` atomically.
///
/// The temporary sibling is removed again whenever the write fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = temp_sibling(path);
    let written = write_pretty(&tmp, value).and_then(|()| fs::rename(&tmp, path).map_err(Error::from));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Read a JSON document, mapping a missing file to [`Error::NotFound`].
///
/// Nesting depth is not capped, since `index.json` nests two levels per
/// location level.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let mut deserializer = serde_json::Deserializer::from_reader(BufReader::new(file));
    deserializer.disable_recursion_limit();
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
