//! Field descriptors supplied by the host catalog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::NumberPrep;

/// Value kind of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
}

/// A selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    /// Secondary annotation rendered next to the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            sub_label: None,
        }
    }

    pub fn with_sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = Some(sub_label.into());
        self
    }
}

/// A labelled group of options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub value: String,
    pub label: String,
    pub options: Vec<SelectOption>,
}

/// Entry of an option list: a single option or a group of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectEntry {
    // Group first: an option map would also match a group without `options`
    Group(OptionGroup),
    Option(SelectOption),
}

impl SelectEntry {
    /// Flatten into the selectable options, groups expanded in order
    pub fn options(&self) -> &[SelectOption] {
        match self {
            SelectEntry::Group(group) => &group.options,
            SelectEntry::Option(option) => std::slice::from_ref(option),
        }
    }
}

/// Opaque presentation hints forwarded to the rendering backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleHints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
}

impl StyleHints {
    /// Class list for the control, including state classes
    pub fn class_list(&self, read_only: bool) -> Vec<String> {
        let mut classes = Vec::new();
        if let Some(class_name) = &self.class_name {
            classes.push(class_name.clone());
        }
        if let Some(theme) = &self.theme {
            classes.push(theme.clone());
        }
        if read_only {
            classes.push("read-only".to_string());
        }
        classes
    }
}

/// Immutable per-field descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Stable unique id, also the storage key
    pub id: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Render as a code editor
    pub script: bool,
    /// Language or dialect hint for the code editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectEntry>>,
    pub multiline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
    /// Fixed row count for the code editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    pub read_only: bool,
    pub auto_focus: bool,
    pub allow_tabs: bool,
    /// Show the pending/in-process indicator
    pub eventable: bool,
    /// Host renders its own content inside the field frame
    pub custom_content: bool,
    pub prepare_number: NumberPrep,
    #[serde(flatten)]
    pub hints: StyleHints,
}

impl FieldConfig {
    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn number(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FieldKind::Number,
            ..Self::default()
        }
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_options(mut self, options: Vec<SelectEntry>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_script(mut self, sub_type: Option<&str>) -> Self {
        self.script = true;
        self.sub_type = sub_type.map(str::to_string);
        self
    }

    pub fn with_multiline(mut self, min_rows: usize, max_rows: usize) -> Self {
        self.multiline = true;
        self.min_rows = Some(min_rows);
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_prepare_number(mut self, prep: NumberPrep) -> Self {
        self.prepare_number = prep;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn eventable(mut self) -> Self {
        self.eventable = true;
        self
    }

    pub fn with_tabs(mut self) -> Self {
        self.allow_tabs = true;
        self
    }

    pub fn with_custom_content(mut self) -> Self {
        self.custom_content = true;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Number
    }

    /// All selectable options, groups flattened
    pub fn flat_options(&self) -> impl Iterator<Item = &SelectOption> {
        self.options
            .iter()
            .flatten()
            .flat_map(|entry| entry.options().iter())
    }
}
