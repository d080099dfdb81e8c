//! Control selection
//!
//! Every field renders as exactly one [`Variant`]. Selection walks a fixed
//! precedence list and the first matching rule wins:
//!
//! 1. numeric kind
//! 2. valid mask
//! 3. script
//! 4. options
//! 5. multiline
//! 6. custom content
//! 7. plain text

use crate::config::FormConfig;
use crate::editable::EditConstraints;
use crate::field::{FieldConfig, SelectEntry};
use crate::mask::{MaskGrammar, ParsedMask};

/// Rendering mode of a field
#[derive(Debug, Clone)]
pub enum Variant {
    /// Number input; read-only numbers render as formatted text
    Numeric { read_only: bool },
    Masked {
        mask: ParsedMask,
        placeholder: String,
    },
    CodeEditor {
        rows: usize,
        sub_type: Option<String>,
    },
    Select {
        entries: Vec<SelectEntry>,
        searchable: bool,
        dropdown_width: u32,
    },
    /// Auto-growing text area
    Multiline { min_rows: usize, max_rows: usize },
    /// Host-provided content inside the field frame
    Passthrough,
    PlainText,
}

/// Tag of a [`Variant`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Numeric,
    Masked,
    CodeEditor,
    Select,
    Multiline,
    Passthrough,
    PlainText,
}

impl Variant {
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::Numeric { .. } => VariantKind::Numeric,
            Variant::Masked { .. } => VariantKind::Masked,
            Variant::CodeEditor { .. } => VariantKind::CodeEditor,
            Variant::Select { .. } => VariantKind::Select,
            Variant::Multiline { .. } => VariantKind::Multiline,
            Variant::Passthrough => VariantKind::Passthrough,
            Variant::PlainText => VariantKind::PlainText,
        }
    }

    /// Whether the control accepts user edits at all
    pub fn is_interactive(&self) -> bool {
        match self {
            Variant::Numeric { read_only } => !read_only,
            Variant::Passthrough => false,
            _ => true,
        }
    }

    /// Input rules for this control
    pub fn constraints(&self, allow_tabs: bool) -> EditConstraints {
        match self {
            Variant::Numeric { .. } => EditConstraints::numeric(),
            Variant::Masked { .. } => EditConstraints::single_line(),
            Variant::Select { .. } => EditConstraints::selection(),
            Variant::CodeEditor { .. } | Variant::Multiline { .. } => {
                EditConstraints::multiline().with_tabs(allow_tabs)
            }
            Variant::Passthrough | Variant::PlainText => {
                EditConstraints::single_line().with_tabs(allow_tabs)
            }
        }
    }

    /// Visible rows for `text`; None for single-row controls
    pub fn rows_for(&self, text: &str) -> Option<usize> {
        match self {
            Variant::Multiline { min_rows, max_rows } => {
                let lines = text.split('\n').count();
                Some(lines.clamp(*min_rows, *max_rows))
            }
            Variant::CodeEditor { rows, .. } => Some(*rows),
            _ => None,
        }
    }

    /// Placeholder shown while the value is empty
    pub fn placeholder<'a>(&'a self, field: &'a FieldConfig) -> Option<&'a str> {
        match self {
            Variant::Masked { placeholder, .. } => Some(placeholder.as_str()),
            _ => field.placeholder.as_deref(),
        }
    }
}

/// Picks the variant for a field configuration
#[derive(Debug, Clone)]
pub struct ControlSelector {
    grammar: MaskGrammar,
    config: FormConfig,
}

impl Default for ControlSelector {
    fn default() -> Self {
        Self::new(MaskGrammar::default(), FormConfig::default())
    }
}

impl ControlSelector {
    pub fn new(grammar: MaskGrammar, config: FormConfig) -> Self {
        Self { grammar, config }
    }

    pub fn grammar(&self) -> &MaskGrammar {
        &self.grammar
    }

    /// Select the variant for `field`. Total: falls back to plain text.
    pub fn select(&self, field: &FieldConfig) -> Variant {
        if field.is_numeric() {
            return Variant::Numeric {
                read_only: field.read_only,
            };
        }

        if let Some(mask) = field.mask.as_deref() {
            match self.grammar.parse(mask) {
                Ok(mask) => {
                    let placeholder = mask.placeholder();
                    return Variant::Masked { mask, placeholder };
                }
                Err(e) => {
                    tracing::debug!("Field {}: {}, ignoring mask", field.id, e);
                }
            }
        }

        if field.script {
            return Variant::CodeEditor {
                rows: field.rows.unwrap_or(self.config.code_editor_rows),
                sub_type: field.sub_type.clone(),
            };
        }

        if let Some(entries) = &field.options {
            return Variant::Select {
                entries: entries.clone(),
                searchable: true,
                dropdown_width: self.config.dropdown_width,
            };
        }

        if field.multiline {
            let min_rows = field.min_rows.unwrap_or(self.config.default_min_rows);
            let max_rows = field
                .max_rows
                .unwrap_or(self.config.default_max_rows)
                .max(min_rows);
            return Variant::Multiline { min_rows, max_rows };
        }

        if field.custom_content {
            return Variant::Passthrough;
        }

        Variant::PlainText
    }
}

/// Select with the built-in mask classes and default configuration
pub fn select_variant(field: &FieldConfig) -> Variant {
    ControlSelector::default().select(field)
}
