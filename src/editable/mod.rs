//! Input rules shared by every field control.
//!
//! - [`EditConstraints`]: per-control restrictions applied to raw edits
//! - [`CharFilter`]: character predicate used by constraints and custom mask classes
//! - [`KeyPress`] / [`KeyOutcome`]: key events the core intercepts (tab insertion)

mod constraints;
mod keys;

pub use constraints::{CharFilter, EditConstraints};
pub use keys::{Key, KeyOutcome, KeyPress};
