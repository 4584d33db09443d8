//! Snapshot persistence for habsnap.

pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::{read_json, write_json, SnapshotStore};
