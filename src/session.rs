//! Per-field edit session
//!
//! An [`EditSession`] owns the live value of one mounted field. Every
//! accepted edit updates the live value at once and (re)schedules a
//! trailing-edge debounce; when the window passes without further edits the
//! session emits a single [`SessionEvent::Changing`] with the latest value.
//! Losing focus cancels the debounce and emits [`SessionEvent::Committed`]
//! if the value differs from the last commit.

use std::time::{Duration, Instant};

use crate::debounce::DebounceTimer;
use crate::editable::{EditConstraints, Key, KeyOutcome, KeyPress};
use crate::field::FieldConfig;
use crate::mask::ParsedMask;
use crate::value::{FieldValue, NumberPrep};
use crate::variant::{Variant, VariantKind};

/// Value notifications produced by a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Advisory: the value settled after typing; not durable
    Changing(FieldValue),
    /// The value was finalized on focus loss
    Committed(FieldValue),
}

/// How raw input becomes a stored value
#[derive(Debug, Clone)]
enum Normalizer {
    Text,
    Masked(ParsedMask),
    Numeric(NumberPrep),
}

impl Normalizer {
    fn for_variant(variant: &Variant, field: &FieldConfig) -> Self {
        match variant {
            Variant::Numeric { .. } => Normalizer::Numeric(field.prepare_number),
            Variant::Masked { mask, .. } => Normalizer::Masked(mask.clone()),
            _ => Normalizer::Text,
        }
    }

    fn initial(&self, value: FieldValue) -> FieldValue {
        match self {
            Normalizer::Numeric(prep) => prep.apply_value(&value),
            Normalizer::Masked(mask) => match value {
                FieldValue::Text(text) => FieldValue::Text(mask.format(&text)),
                other => other,
            },
            Normalizer::Text => value,
        }
    }

    /// None when the input cannot be represented: a lone "-", stray letters or
    /// a magnitude that overflows `f64`
    fn normalize(&self, constraints: &EditConstraints, raw: &str) -> Option<FieldValue> {
        match self {
            Normalizer::Text => Some(FieldValue::Text(constraints.apply(raw))),
            Normalizer::Masked(mask) => Some(FieldValue::Text(mask.format(raw))),
            Normalizer::Numeric(prep) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Some(FieldValue::empty());
                }
                if !trimmed.chars().all(|ch| constraints.is_char_allowed(ch)) {
                    return None;
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .map(|n| prep.apply(n))
                    .filter(|n| n.is_finite())
                    .map(FieldValue::Number)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    field_id: String,
    normalizer: Normalizer,
    constraints: EditConstraints,
    read_only: bool,
    /// False for controls that never take input (host-rendered content)
    editable: bool,
    live: FieldValue,
    last_committed: FieldValue,
    pending_commit: bool,
    timer: DebounceTimer,
}

impl EditSession {
    /// Mount a session for `field` rendered as `variant`
    pub fn new(variant: &Variant, field: &FieldConfig, initial: FieldValue, debounce: Duration) -> Self {
        let normalizer = Normalizer::for_variant(variant, field);
        let initial = normalizer.initial(initial);
        Self {
            field_id: field.id.clone(),
            constraints: variant.constraints(field.allow_tabs),
            normalizer,
            read_only: field.read_only || !variant.is_interactive(),
            editable: variant.kind() != VariantKind::Passthrough,
            live: initial.clone(),
            last_committed: initial,
            pending_commit: false,
            timer: DebounceTimer::new(debounce),
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn live(&self) -> &FieldValue {
        &self.live
    }

    pub fn last_committed(&self) -> &FieldValue {
        &self.last_committed
    }

    /// True between a live edit and the next blur
    pub fn is_pending(&self) -> bool {
        self.pending_commit
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn constraints(&self) -> &EditConstraints {
        &self.constraints
    }

    /// Whether a debounced "changing" emission is scheduled
    pub fn has_scheduled_change(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Apply a raw edit. Returns true if the live value changed.
    pub fn on_user_edit(&mut self, raw: &str, now: Instant) -> bool {
        if self.read_only {
            tracing::debug!("Field {}: ignoring edit on read-only field", self.field_id);
            return false;
        }

        let Some(value) = self.normalizer.normalize(&self.constraints, raw) else {
            tracing::trace!("Field {}: rejected raw input {:?}", self.field_id, raw);
            return false;
        };

        if value == self.live {
            return false;
        }

        self.live = value;
        self.pending_commit = true;
        let generation = self.timer.schedule(now);
        tracing::trace!(
            "Field {}: live value updated, change scheduled (gen {})",
            self.field_id,
            generation
        );
        true
    }

    /// Emit the debounced change if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<SessionEvent> {
        if self.timer.fire(now) {
            tracing::debug!("Field {}: changing to {:?}", self.field_id, self.live);
            Some(SessionEvent::Changing(self.live.clone()))
        } else {
            None
        }
    }

    /// Blur: cancel the debounce, commit if the value changed
    pub fn on_focus_lost(&mut self) -> Option<SessionEvent> {
        if self.read_only {
            return None;
        }

        self.timer.cancel();
        self.pending_commit = false;

        if self.live == self.last_committed {
            return None;
        }

        self.last_committed = self.live.clone();
        tracing::debug!("Field {}: committed {:?}", self.field_id, self.live);
        Some(SessionEvent::Committed(self.live.clone()))
    }

    /// Toggle read-only; controls that never take input stay read-only
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only || !self.editable;
        if self.read_only {
            self.timer.cancel();
            self.pending_commit = false;
        }
    }

    /// Intercept Tab when the field accepts tab characters
    pub fn on_key(&self, key: KeyPress) -> KeyOutcome {
        if !self.read_only && self.constraints.allow_tabs && key.key == Key::Tab && !key.shift {
            KeyOutcome::InsertText("\t".to_string())
        } else {
            KeyOutcome::PassThrough
        }
    }

    /// Text shown for the current value (numbers prepared and formatted)
    pub fn display_text(&self) -> String {
        match &self.normalizer {
            Normalizer::Numeric(prep) => prep.apply_value(&self.live).to_string(),
            _ => self.live.to_string(),
        }
    }

    /// Unmount: drop any scheduled emission
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::select_variant;

    const WINDOW: Duration = Duration::from_millis(200);

    fn session(field: &FieldConfig) -> EditSession {
        let variant = select_variant(field);
        EditSession::new(&variant, field, FieldValue::empty(), WINDOW)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_edit_updates_live_immediately() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        assert!(s.on_user_edit("hi", t0));
        assert_eq!(s.live(), &FieldValue::text("hi"));
        assert!(s.is_pending());
        assert!(s.has_scheduled_change());
        assert_eq!(s.poll(t0), None);
    }

    #[test]
    fn test_burst_emits_once_with_last_value() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("a", t0);
        s.on_user_edit("ab", t0 + ms(100));
        s.on_user_edit("abc", t0 + ms(250));

        assert_eq!(s.poll(t0 + ms(300)), None);
        assert_eq!(
            s.poll(t0 + ms(450)),
            Some(SessionEvent::Changing(FieldValue::text("abc")))
        );
        assert_eq!(s.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_blur_commits_and_cancels_debounce() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("abc", t0);

        assert_eq!(
            s.on_focus_lost(),
            Some(SessionEvent::Committed(FieldValue::text("abc")))
        );
        assert!(!s.is_pending());
        assert_eq!(s.last_committed(), &FieldValue::text("abc"));
        assert_eq!(s.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("x", t0);
        assert!(s.on_focus_lost().is_some());
        assert_eq!(s.on_focus_lost(), None);
    }

    #[test]
    fn test_blur_without_change_clears_pending() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("x", t0);
        s.on_user_edit("", t0 + ms(10));
        assert!(s.is_pending());
        assert_eq!(s.on_focus_lost(), None);
        assert!(!s.is_pending());
    }

    #[test]
    fn test_unchanged_edit_does_not_reschedule() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("x", t0);
        assert!(!s.on_user_edit("x", t0 + ms(150)));
        assert_eq!(s.next_deadline(), Some(t0 + WINDOW));
    }

    #[test]
    fn test_masked_edit_formats_progressively() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("phone").with_mask("999-9999"));
        s.on_user_edit("555", t0);
        assert_eq!(s.live(), &FieldValue::text("555"));
        s.on_user_edit("5551", t0);
        assert_eq!(s.live(), &FieldValue::text("555-1"));
        s.on_user_edit("5551234", t0);
        assert_eq!(
            s.on_focus_lost(),
            Some(SessionEvent::Committed(FieldValue::text("555-1234")))
        );
    }

    #[test]
    fn test_numeric_prepare_number() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::number("n").with_prepare_number(NumberPrep::Round));
        s.on_user_edit("3.7", t0);
        assert_eq!(s.live(), &FieldValue::Number(4.0));
        assert_eq!(
            s.on_focus_lost(),
            Some(SessionEvent::Committed(FieldValue::Number(4.0)))
        );
        assert_eq!(s.display_text(), "4");
    }

    #[test]
    fn test_numeric_rejects_unparseable() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::number("n"));
        s.on_user_edit("12", t0);
        assert!(!s.on_user_edit("-", t0));
        assert_eq!(s.live(), &FieldValue::Number(12.0));
        assert!(s.on_user_edit("", t0));
        assert!(s.live().is_empty());
    }

    #[test]
    fn test_numeric_rejects_stray_characters() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::number("n"));
        s.on_user_edit("7", t0);
        for raw in ["1e5", "12abc", "1,5", "3 kg"] {
            assert!(!s.on_user_edit(raw, t0), "{raw:?} must be rejected");
            assert_eq!(s.live(), &FieldValue::Number(7.0));
        }
        assert!(s.on_user_edit(" -2.5 ", t0));
        assert_eq!(s.live(), &FieldValue::Number(-2.5));
    }

    #[test]
    fn test_numeric_rejects_overflow() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::number("n"));
        s.on_user_edit("1", t0);
        let huge = format!("1{}", "0".repeat(400));
        assert!(!s.on_user_edit(&huge, t0));
        assert_eq!(s.live(), &FieldValue::Number(1.0));

        let field = FieldConfig::number("n").with_prepare_number(NumberPrep::Custom(|n| n / 0.0));
        let mut s = session(&field);
        assert!(!s.on_user_edit("3", t0));
        assert!(s.live().is_empty());
    }

    #[test]
    fn test_read_only_numeric_displays_prepared_value() {
        let field = FieldConfig::number("n")
            .read_only()
            .with_prepare_number(NumberPrep::Floor);
        let variant = select_variant(&field);
        let mut s = EditSession::new(&variant, &field, FieldValue::text("9.9"), WINDOW);
        assert_eq!(s.display_text(), "9");
        assert!(!s.on_user_edit("1", Instant::now()));
        assert_eq!(s.on_focus_lost(), None);
    }

    #[test]
    fn test_initial_value_is_committed_baseline() {
        let field = FieldConfig::text("f");
        let variant = select_variant(&field);
        let mut s = EditSession::new(&variant, &field, FieldValue::text("saved"), WINDOW);
        assert_eq!(s.on_focus_lost(), None);
    }

    #[test]
    fn test_set_read_only_cancels_pending() {
        let t0 = Instant::now();
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("x", t0);
        s.set_read_only(true);
        assert!(!s.is_pending());
        assert_eq!(s.poll(t0 + ms(500)), None);
        assert_eq!(s.on_focus_lost(), None);

        s.set_read_only(false);
        assert_eq!(
            s.on_focus_lost(),
            Some(SessionEvent::Committed(FieldValue::text("x")))
        );
    }

    #[test]
    fn test_passthrough_stays_read_only() {
        let mut s = session(&FieldConfig::text("c").with_custom_content());
        assert!(s.is_read_only());
        s.set_read_only(false);
        assert!(s.is_read_only());
        assert!(!s.on_user_edit("x", Instant::now()));
    }

    #[test]
    fn test_catalog_read_only_can_be_lifted() {
        let mut s = session(&FieldConfig::text("f").read_only());
        assert!(s.is_read_only());
        s.set_read_only(false);
        assert!(s.on_user_edit("x", Instant::now()));
    }

    #[test]
    fn test_single_line_strips_newlines() {
        let mut s = session(&FieldConfig::text("f"));
        s.on_user_edit("a\nb", Instant::now());
        assert_eq!(s.live(), &FieldValue::text("ab"));

        let mut s = session(&FieldConfig::text("f").with_multiline(1, 5));
        s.on_user_edit("a\nb", Instant::now());
        assert_eq!(s.live(), &FieldValue::text("a\nb"));
    }

    #[test]
    fn test_tab_insertion() {
        let tab = KeyPress::new(Key::Tab);
        let s = session(&FieldConfig::text("f").with_multiline(1, 5).with_tabs());
        assert_eq!(s.on_key(tab), KeyOutcome::InsertText("\t".into()));
        assert_eq!(s.on_key(tab.with_shift()), KeyOutcome::PassThrough);
        assert_eq!(s.on_key(KeyPress::new(Key::Enter)), KeyOutcome::PassThrough);

        let s = session(&FieldConfig::text("f"));
        assert_eq!(s.on_key(tab), KeyOutcome::PassThrough);
    }

    #[test]
    fn test_select_value() {
        let t0 = Instant::now();
        let field = FieldConfig::text("s").with_options(vec![
            crate::field::SelectEntry::Option(crate::field::SelectOption::new("a", "A")),
            crate::field::SelectEntry::Option(crate::field::SelectOption::new("b", "B")),
        ]);
        let mut s = session(&field);
        s.on_user_edit("b", t0);
        assert_eq!(
            s.poll(t0 + WINDOW),
            Some(SessionEvent::Changing(FieldValue::text("b")))
        );
        assert_eq!(
            s.on_focus_lost(),
            Some(SessionEvent::Committed(FieldValue::text("b")))
        );
    }
}
