//! Edit constraints for field input.
//!
//! Constraints define which characters a control accepts before a raw edit
//! reaches the session's live value.

/// Character filter function type
pub type CharFilter = fn(char) -> bool;

/// Constraints that limit what raw input a control accepts.
#[derive(Debug, Clone)]
pub struct EditConstraints {
    /// Allow line breaks in the value
    pub allow_multiline: bool,

    /// Tab inserts a tab character instead of moving focus
    pub allow_tabs: bool,

    /// Character filter (None = all characters allowed)
    /// Returns true if character is allowed
    pub char_filter: Option<CharFilter>,
}

impl Default for EditConstraints {
    fn default() -> Self {
        Self::single_line()
    }
}

impl EditConstraints {
    /// Single-line text input
    pub fn single_line() -> Self {
        Self {
            allow_multiline: false,
            allow_tabs: false,
            char_filter: None,
        }
    }

    /// Multi-line text (textarea and code editor)
    pub fn multiline() -> Self {
        Self {
            allow_multiline: true,
            ..Self::single_line()
        }
    }

    /// Numeric input (digits, sign and decimal point)
    pub fn numeric() -> Self {
        Self {
            allow_multiline: false,
            allow_tabs: false,
            char_filter: Some(|c| c.is_ascii_digit() || c == '.' || c == '-'),
        }
    }

    /// Selection from a fixed option list; values are taken verbatim
    pub fn selection() -> Self {
        Self::single_line()
    }

    /// Set tab handling (builder pattern)
    pub fn with_tabs(mut self, allow_tabs: bool) -> Self {
        self.allow_tabs = allow_tabs;
        self
    }

    /// Check if a character passes the filter (if any)
    pub fn is_char_allowed(&self, ch: char) -> bool {
        if !self.allow_multiline && (ch == '\n' || ch == '\r') {
            return false;
        }
        match self.char_filter {
            Some(filter) => filter(ch),
            None => true,
        }
    }

    /// Drop disallowed characters
    pub fn apply(&self, raw: &str) -> String {
        raw.chars().filter(|ch| self.is_char_allowed(*ch)).collect()
    }
}
