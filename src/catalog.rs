//! Field catalog
//!
//! The ordered list of fields a form shows, plus the first-run default
//! values. Usually loaded from YAML:
//!
//! ```yaml
//! fields:
//!   - id: phone
//!     mask: "999-9999"
//!   - id: notes
//!     multiline: true
//! defaults:
//!   phone: "555-0100"
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::FieldConfig;
use crate::value::{FieldValue, ValueMap};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("field #{0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate field id {0:?}")]
    DuplicateId(String),
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: Vec<FieldConfig>,
    #[serde(default)]
    defaults: ValueMap,
}

impl FieldCatalog {
    /// Build a catalog, checking that ids are present and unique
    pub fn new(fields: Vec<FieldConfig>, defaults: ValueMap) -> Result<Self, CatalogError> {
        let catalog = Self { fields, defaults };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = Self::from_yaml_str(&yaml)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        tracing::info!(
            "Loaded {} fields from {}",
            catalog.fields.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for (index, field) in self.fields.iter().enumerate() {
            if field.id.is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(CatalogError::DuplicateId(field.id.clone()));
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.id.as_str())
    }

    /// First-run values
    pub fn defaults(&self) -> &ValueMap {
        &self.defaults
    }

    /// An empty value for every field
    pub fn empty_values(&self) -> ValueMap {
        self.ids()
            .map(|id| (id.to_string(), FieldValue::empty()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
