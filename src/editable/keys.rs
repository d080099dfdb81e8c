//! Key handling for field controls.

/// Keys the core reacts to; everything else is forwarded untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Other,
}

/// A key press delivered to a focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// What the host should do with a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default handling (e.g. Tab moves focus)
    PassThrough,
    /// Suppress default handling and insert this text at the cursor
    InsertText(String),
}
