//! Field values and the persisted value map

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from field id to value; the unit the host persists
pub type ValueMap = BTreeMap<String, FieldValue>;

/// Value held by a field
///
/// Empty is `Text("")`; numeric fields hold `Number` once a parseable value
/// has been entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a fractional part ("4", not "4.0")
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.0}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// True when every value in the map is empty (or the map has no entries)
pub fn all_empty(values: &ValueMap) -> bool {
    values.values().all(FieldValue::is_empty)
}

/// Normalization applied to numeric values before they are stored
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPrep {
    #[default]
    None,
    /// Nearest integer, halves away from zero
    Round,
    Floor,
    Ceil,
    Trunc,
    /// Host-supplied transform (not representable in config files)
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl NumberPrep {
    pub fn apply(&self, n: f64) -> f64 {
        match self {
            NumberPrep::None => n,
            NumberPrep::Round => n.round(),
            NumberPrep::Floor => n.floor(),
            NumberPrep::Ceil => n.ceil(),
            NumberPrep::Trunc => n.trunc(),
            NumberPrep::Custom(f) => f(n),
        }
    }

    /// Apply to a value; text that does not parse as a finite number passes through
    pub fn apply_value(&self, value: &FieldValue) -> FieldValue {
        if value.is_empty() {
            return value.clone();
        }
        match value.as_number().map(|n| self.apply(n)) {
            Some(n) if n.is_finite() => FieldValue::Number(n),
            _ => value.clone(),
        }
    }
}
