//! Message types for the form host
//!
//! All field state changes flow through these message types.

use crate::editable::KeyPress;
use crate::overlay::ActionNode;
use crate::value::FieldValue;

/// Input delivered to a [`FormHost`](crate::host::FormHost)
#[derive(Debug, Clone)]
pub enum FormMsg {
    /// Raw value from the control (keystroke, paste, option pick)
    Edit { field: String, raw: String },
    /// Field lost focus
    Blur { field: String },
    /// Key press on a focused field
    Key { field: String, key: KeyPress },
    /// Timer wakeup; fires elapsed debounces
    Tick,
    /// External "in process" status for a field
    SetInProcess { field: String, in_process: bool },
    SetReadOnly { field: String, read_only: bool },
    /// Replace a field's trailing action nodes
    SetActions {
        field: String,
        nodes: Vec<ActionNode>,
    },
    /// A field's container changed size
    Resized { field: String },
}

/// Output of a host update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Debounced live value; advisory only
    Changing { field: String, value: FieldValue },
    /// Finalized value, already written to the value map
    Committed { field: String, value: FieldValue },
    /// Insert text at the control's cursor instead of default key handling
    InsertText { field: String, text: String },
}

impl FieldEvent {
    pub fn field(&self) -> &str {
        match self {
            FieldEvent::Changing { field, .. }
            | FieldEvent::Committed { field, .. }
            | FieldEvent::InsertText { field, .. } => field,
        }
    }
}
