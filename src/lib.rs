//! formfield - headless form-field controller
//!
//! Turns declarative field descriptions into control variants, normalizes
//! raw edits (input masks, numeric preparation), debounces live changes and
//! commits values on blur. Rendering and durable storage stay with the host.

pub mod catalog;
pub mod config;
pub mod config_paths;
pub mod debounce;
pub mod editable;
pub mod field;
pub mod host;
pub mod mask;
pub mod messages;
pub mod overlay;
pub mod session;
pub mod store;
pub mod tracing;
pub mod value;
pub mod variant;

// Re-export commonly used types
pub use catalog::FieldCatalog;
pub use config::FormConfig;
pub use field::FieldConfig;
pub use host::FormHost;
pub use mask::{MaskGrammar, ParsedMask};
pub use messages::{FieldEvent, FormMsg};
pub use session::{EditSession, SessionEvent};
pub use store::FieldStore;
pub use value::{FieldValue, ValueMap};
pub use variant::{select_variant, Variant};
