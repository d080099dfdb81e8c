//! Field value persistence boundary
//!
//! The host owns durable storage. The core loads one snapshot at startup and
//! hands the complete [`ValueMap`] back after every commit.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::value::{all_empty, FieldValue, ValueMap};

/// Storage contract consumed by the form host
pub trait FieldStore {
    /// Values saved by a previous session (may be empty)
    fn load(&self) -> ValueMap;

    /// Values used on first run, when nothing useful was loaded
    fn defaults(&self) -> ValueMap;

    /// Write the full value map. Fire-and-forget from the core's view:
    /// failures are logged by the caller and never retried.
    fn persist(&mut self, values: &ValueMap) -> anyhow::Result<()>;
}

/// Initial values for `ids`
///
/// Falls back to the store's defaults when every loaded value is empty, then
/// fills ids still missing with empty values.
pub fn bootstrap<'a>(store: &dyn FieldStore, ids: impl IntoIterator<Item = &'a str>) -> ValueMap {
    let loaded = store.load();
    let mut values = if all_empty(&loaded) {
        tracing::info!("No stored field values, using defaults");
        store.defaults()
    } else {
        loaded
    };

    for id in ids {
        values.entry(id.to_string()).or_insert_with(FieldValue::empty);
    }
    values
}

/// In-memory store, for tests and hosts that persist elsewhere
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: ValueMap,
    defaults: ValueMap,
    writes: usize,
}

impl MemoryStore {
    pub fn new(values: ValueMap, defaults: ValueMap) -> Self {
        Self {
            values,
            defaults,
            writes: 0,
        }
    }

    /// Current stored snapshot
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Number of persist calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl FieldStore for MemoryStore {
    fn load(&self) -> ValueMap {
        self.values.clone()
    }

    fn defaults(&self) -> ValueMap {
        self.defaults.clone()
    }

    fn persist(&mut self, values: &ValueMap) -> anyhow::Result<()> {
        self.values = values.clone();
        self.writes += 1;
        Ok(())
    }
}

/// On-disk layout of the JSON store
///
/// Loading reads entries as raw JSON first so one bad entry does not cost
/// the rest of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredValues<V = FieldValue> {
    /// Schema version for forward compatibility
    #[serde(default)]
    version: u32,
    values: BTreeMap<String, V>,
}

const CURRENT_VERSION: u32 = 1;

/// JSON file store, by default at `~/.config/formfield/values.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    defaults: ValueMap,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, defaults: ValueMap) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    /// Store in the user config directory
    pub fn in_config_dir(defaults: ValueMap) -> Option<Self> {
        crate::config_paths::values_file().map(|path| Self::new(path, defaults))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FieldStore for JsonFileStore {
    fn load(&self) -> ValueMap {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("No stored values at {}: {}", self.path.display(), e);
                return ValueMap::new();
            }
        };

        match serde_json::from_str::<StoredValues<serde_json::Value>>(&contents) {
            Ok(stored) => {
                if stored.version > CURRENT_VERSION {
                    tracing::warn!(
                        "Stored values at {} have newer schema version {}",
                        self.path.display(),
                        stored.version
                    );
                }
                stored
                    .values
                    .into_iter()
                    .filter_map(|(id, raw)| match serde_json::from_value::<FieldValue>(raw) {
                        Ok(value) => Some((id, value)),
                        Err(e) => {
                            tracing::warn!("Skipping stored value for {}: {}", id, e);
                            None
                        }
                    })
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Failed to parse stored values at {}: {}", self.path.display(), e);
                ValueMap::new()
            }
        }
    }

    fn defaults(&self) -> ValueMap {
        self.defaults.clone()
    }

    fn persist(&mut self, values: &ValueMap) -> anyhow::Result<()> {
        // JSON has no representation for NaN or infinities
        if let Some((id, value)) = values
            .iter()
            .find(|(_, value)| matches!(value, FieldValue::Number(n) if !n.is_finite()))
        {
            anyhow::bail!("Refusing to persist non-finite value {} for {}", value, id);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let stored = StoredValues {
            version: CURRENT_VERSION,
            values: values.clone(),
        };
        let contents = serde_json::to_string_pretty(&stored).context("Failed to serialize values")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write values to {}", self.path.display()))?;

        tracing::debug!("Persisted {} values to {}", values.len(), self.path.display());
        Ok(())
    }
}
