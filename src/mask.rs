//! Input mask grammar
//!
//! A mask constrains a value one character position at a time. Each position
//! is either a literal (copied into the value as-is) or an editable slot that
//! accepts one character of a given class.
//!
//! Built-in classes:
//! - `9` - ASCII digit
//! - `a` - ASCII letter
//! - `*` - ASCII letter or digit
//!
//! A backslash makes the next character literal, so `\9` is a literal `9`.
//! A lone trailing backslash is a literal backslash. Any other character is a
//! literal.

use thiserror::Error;

use crate::editable::CharFilter;

/// Glyph used for editable positions in a placeholder
pub const SLOT_GLYPH: char = '_';

const ESCAPE: char = '\\';

/// Category of characters an editable slot accepts
#[derive(Debug, Clone, Copy)]
pub enum CharClass {
    Digit,
    Letter,
    Alphanumeric,
    /// Host-registered predicate
    Custom(CharFilter),
}

impl CharClass {
    /// Check whether `ch` may fill a slot of this class
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Letter => ch.is_ascii_alphabetic(),
            CharClass::Alphanumeric => ch.is_ascii_alphanumeric(),
            CharClass::Custom(filter) => filter(ch),
        }
    }
}

/// One position of a parsed mask
#[derive(Debug, Clone, Copy)]
pub enum MaskToken {
    Literal(char),
    Slot(CharClass),
}

impl MaskToken {
    pub fn is_slot(&self) -> bool {
        matches!(self, MaskToken::Slot(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("mask {0:?} has no editable positions")]
    NoEditableSlots(String),
}

/// Set of editable-class markers recognized in unescaped mask positions.
#[derive(Debug, Clone)]
pub struct MaskGrammar {
    classes: Vec<(char, CharClass)>,
}

impl Default for MaskGrammar {
    fn default() -> Self {
        Self {
            classes: vec![
                ('9', CharClass::Digit),
                ('a', CharClass::Letter),
                ('*', CharClass::Alphanumeric),
            ],
        }
    }
}

impl MaskGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom class (builder pattern)
    ///
    /// Re-registering an existing marker replaces its class. The escape
    /// character cannot be used as a marker.
    pub fn with_class(mut self, marker: char, filter: CharFilter) -> Self {
        if marker == ESCAPE {
            tracing::warn!("Ignoring mask class registration for the escape character");
            return self;
        }
        self.classes.retain(|(m, _)| *m != marker);
        self.classes.push((marker, CharClass::Custom(filter)));
        self
    }

    /// Markers in registration order
    pub fn markers(&self) -> impl Iterator<Item = char> + '_ {
        self.classes.iter().map(|(m, _)| *m)
    }

    fn class_for(&self, ch: char) -> Option<CharClass> {
        self.classes
            .iter()
            .find(|(m, _)| *m == ch)
            .map(|(_, class)| *class)
    }

    /// Split a mask into tokens without checking validity
    pub fn tokenize(&self, mask: &str) -> Vec<MaskToken> {
        let mut tokens = Vec::with_capacity(mask.len());
        let mut chars = mask.chars();

        while let Some(ch) = chars.next() {
            let token = if ch == ESCAPE {
                MaskToken::Literal(chars.next().unwrap_or(ESCAPE))
            } else if let Some(class) = self.class_for(ch) {
                MaskToken::Slot(class)
            } else {
                MaskToken::Literal(ch)
            };
            tokens.push(token);
        }

        tokens
    }

    /// Parse a mask, rejecting masks without editable positions
    pub fn parse(&self, mask: &str) -> Result<ParsedMask, MaskError> {
        let tokens = self.tokenize(mask);
        if !tokens.iter().any(MaskToken::is_slot) {
            return Err(MaskError::NoEditableSlots(mask.to_string()));
        }
        Ok(ParsedMask {
            source: mask.to_string(),
            tokens,
        })
    }

    pub fn is_valid(&self, mask: &str) -> bool {
        self.parse(mask).is_ok()
    }
}

/// Parse with the built-in classes
pub fn parse(mask: &str) -> Result<ParsedMask, MaskError> {
    MaskGrammar::default().parse(mask)
}

/// Validate with the built-in classes
pub fn is_valid(mask: &str) -> bool {
    MaskGrammar::default().is_valid(mask)
}

/// A validated mask: at least one token is an editable slot.
#[derive(Debug, Clone)]
pub struct ParsedMask {
    source: String,
    tokens: Vec<MaskToken>,
}

impl ParsedMask {
    /// The mask string this was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Number of positions (escape sequences count as one)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_slot()).count()
    }

    pub fn is_editable(&self, pos: usize) -> bool {
        self.tokens.get(pos).is_some_and(MaskToken::is_slot)
    }

    /// Check whether `ch` may be typed at `pos`
    pub fn accepts(&self, pos: usize, ch: char) -> bool {
        match self.tokens.get(pos) {
            Some(MaskToken::Slot(class)) => class.accepts(ch),
            _ => false,
        }
    }

    /// Placeholder text: literals verbatim, slots as [`SLOT_GLYPH`]
    pub fn placeholder(&self) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                MaskToken::Literal(ch) => *ch,
                MaskToken::Slot(_) => SLOT_GLYPH,
            })
            .collect()
    }

    /// Format raw input against the mask.
    ///
    /// Raw characters are consumed left to right. A raw character equal to
    /// the next literal is absorbed by it; characters a slot rejects are
    /// dropped. Literals are only written once a later slot is filled, so a
    /// partial value never ends in a dangling separator. Once every slot is
    /// filled the result is the fully masked string, trailing literals
    /// included.
    ///
    /// Absorption wins over slots: with the mask `\19`, typing `1` is taken
    /// as the literal and yields `""`, while `11`, `2` and `12` yield `11`,
    /// `12` and `12`. This keeps formatting a formatted value a no-op.
    pub fn format(&self, raw: &str) -> String {
        let mut out = String::with_capacity(self.tokens.len());
        let mut pending_literals = String::new();
        let mut input = raw.chars().peekable();
        let mut complete = true;

        for token in &self.tokens {
            match token {
                MaskToken::Literal(lit) => {
                    if input.peek() == Some(lit) {
                        input.next();
                    }
                    pending_literals.push(*lit);
                }
                MaskToken::Slot(class) => match input.by_ref().find(|ch| class.accepts(*ch)) {
                    Some(ch) => {
                        out.push_str(&pending_literals);
                        pending_literals.clear();
                        out.push(ch);
                    }
                    None => {
                        complete = false;
                        break;
                    }
                },
            }
        }

        if complete {
            out.push_str(&pending_literals);
        }
        out
    }

    /// Check whether `value` fills every slot
    pub fn is_complete(&self, value: &str) -> bool {
        let formatted = self.format(value);
        formatted == value && formatted.chars().count() == self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classes() {
        assert!(CharClass::Digit.accepts('7'));
        assert!(!CharClass::Digit.accepts('x'));
        assert!(CharClass::Letter.accepts('Q'));
        assert!(!CharClass::Letter.accepts('1'));
        assert!(CharClass::Alphanumeric.accepts('z'));
        assert!(CharClass::Alphanumeric.accepts('0'));
        assert!(!CharClass::Alphanumeric.accepts('-'));
    }

    #[test]
    fn test_literal_only_masks_are_invalid() {
        for mask in ["", "-", "()- ", "xyz", "\\9\\a\\*", "\\"] {
            assert!(!is_valid(mask), "{mask:?} should be invalid");
        }
    }

    #[test]
    fn test_empty_mask_error() {
        assert_eq!(
            parse("").unwrap_err(),
            MaskError::NoEditableSlots(String::new())
        );
    }

    #[test]
    fn test_phone_placeholder() {
        let mask = parse("999-9999").unwrap();
        assert_eq!(mask.placeholder(), "___-____");
        assert_eq!(mask.slot_count(), 7);
        assert_eq!(mask.len(), 8);
    }

    #[test]
    fn test_escaped_marker_is_literal() {
        let mask = parse("\\9-99").unwrap();
        assert_eq!(mask.placeholder(), "9-__");
        assert!(!mask.is_editable(0));
        assert!(mask.is_editable(2));
    }

    #[test]
    fn test_escaped_backslash() {
        let mask = parse("9\\\\9").unwrap();
        assert_eq!(mask.placeholder(), "_\\_");
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        let mask = parse("99\\").unwrap();
        assert_eq!(mask.placeholder(), "__\\");
        assert_eq!(mask.len(), 3);
    }

    #[test]
    fn test_accepts_per_position() {
        let mask = parse("a9*").unwrap();
        assert!(mask.accepts(0, 'x'));
        assert!(!mask.accepts(0, '1'));
        assert!(mask.accepts(1, '1'));
        assert!(mask.accepts(2, 'B'));
        assert!(!mask.accepts(3, 'B'));
    }

    #[test]
    fn test_custom_class() {
        let grammar = MaskGrammar::new().with_class('h', |c| c.is_ascii_hexdigit());
        let mask = grammar.parse("#hhhhhh").unwrap();
        assert_eq!(mask.placeholder(), "#______");
        assert_eq!(mask.format("ff00zz"), "#ff00");
        assert!(!is_valid("#hhhhhh"));
    }

    #[test]
    fn test_escape_cannot_become_marker() {
        let grammar = MaskGrammar::new().with_class('\\', |_| true);
        assert_eq!(grammar.markers().collect::<String>(), "9a*");
    }

    #[test]
    fn test_format_progressive() {
        let mask = parse("999-9999").unwrap();
        assert_eq!(mask.format(""), "");
        assert_eq!(mask.format("5"), "5");
        assert_eq!(mask.format("555"), "555");
        assert_eq!(mask.format("5551"), "555-1");
        assert_eq!(mask.format("5551234"), "555-1234");
    }

    #[test]
    fn test_format_absorbs_typed_literals() {
        let mask = parse("999-9999").unwrap();
        assert_eq!(mask.format("555-1234"), "555-1234");
        assert_eq!(mask.format("555-"), "555");
    }

    #[test]
    fn test_literal_absorbs_matching_slot_char() {
        let mask = parse("\\19").unwrap();
        assert_eq!(mask.format("1"), "");
        assert_eq!(mask.format("11"), "11");
        assert_eq!(mask.format("2"), "12");
        assert_eq!(mask.format("12"), "12");
        assert_eq!(mask.format(&mask.format("12")), "12");
    }

    #[test]
    fn test_format_skips_rejected_chars() {
        let mask = parse("999-9999").unwrap();
        assert_eq!(mask.format("55x5y1234z"), "555-1234");
    }

    #[test]
    fn test_format_leading_and_trailing_literals() {
        let mask = parse("(999)").unwrap();
        assert_eq!(mask.format("1"), "(1");
        assert_eq!(mask.format("12"), "(12");
        assert_eq!(mask.format("123"), "(123)");
        assert_eq!(mask.format("1234"), "(123)");
    }

    #[test]
    fn test_is_complete() {
        let mask = parse("99/99").unwrap();
        assert!(mask.is_complete("12/34"));
        assert!(!mask.is_complete("12/3"));
        assert!(!mask.is_complete("1234"));
    }
}
