//! Fixture loading and snapshotting.
//!
//! The fixture is a JSON document with one array of records per resource
//! collection. It is loaded once at startup and never mutated; the working
//! store the router serves against is always a [`Dataset::snapshot`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::store::Store;

/// The six resource collections every fixture must provide.
pub const RESOURCES: [&str; 6] = ["posts", "comments", "albums", "photos", "todos", "users"];

/// The immutable seed dataset, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Dataset {
    collections: HashMap<String, Vec<Value>>,
}

impl Dataset {
    /// Load the fixture from disk.
    ///
    /// The root must be a JSON object containing all six collections from
    /// [`RESOURCES`], each a JSON array. Any other shape is an error; the
    /// caller (startup) treats it as fatal.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("fixture {} is not valid JSON", path.display()))?;
        Self::from_value(value)
    }

    /// Build a dataset from an already-parsed JSON document.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let root = value
            .as_object()
            .context("fixture root must be a JSON object")?;
        let mut collections = HashMap::with_capacity(RESOURCES.len());
        for name in RESOURCES {
            let records = root
                .get(name)
                .with_context(|| format!("fixture is missing collection `{name}`"))?
                .as_array()
                .with_context(|| format!("fixture collection `{name}` must be an array"))?;
            collections.insert(name.to_string(), records.clone());
        }
        Ok(Self { collections })
    }

    /// Produce a deep, independent copy of the dataset as a working store.
    ///
    /// Mutating the snapshot never affects the dataset or other snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Store {
        Store::new(self.collections.clone())
    }
}
