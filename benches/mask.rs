//! Benchmarks for mask parsing and the per-keystroke edit path
//!
//! Run with: cargo bench mask

use std::time::{Duration, Instant};

use formfield::field::FieldConfig;
use formfield::mask;
use formfield::session::EditSession;
use formfield::value::FieldValue;
use formfield::variant::select_variant;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const MASKS: &[&str] = &["999-9999", "(999) 999-99-99", "+7 \\9\\99 999-99-99", "aa-****-9999"];

// ============================================================================
// Grammar
// ============================================================================

#[divan::bench(args = MASKS)]
fn parse_mask(source: &str) {
    divan::black_box(mask::parse(divan::black_box(source)).ok());
}

#[divan::bench(args = MASKS)]
fn placeholder(source: &str) {
    let Ok(parsed) = mask::parse(source) else {
        return;
    };
    divan::black_box(parsed.placeholder());
}

#[divan::bench(args = [1, 8, 64])]
fn format_input(repeat: usize) {
    let parsed = mask::parse("(999) 999-99-99").unwrap();
    let raw = "9161234567".repeat(repeat);
    divan::black_box(parsed.format(divan::black_box(&raw)));
}

// ============================================================================
// Edit session
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn keystroke_burst_masked(keystrokes: usize) {
    let field = FieldConfig::text("phone").with_mask("(999) 999-99-99");
    let variant = select_variant(&field);
    let mut session =
        EditSession::new(&variant, &field, FieldValue::default(), Duration::from_millis(200));

    let start = Instant::now();
    let mut raw = String::new();
    for i in 0..keystrokes {
        raw.push(char::from(b'0' + (i % 10) as u8));
        session.on_user_edit(&raw, start + Duration::from_millis(i as u64));
    }
    divan::black_box(session.on_focus_lost());
}

#[divan::bench(args = [10, 100, 1_000])]
fn keystroke_burst_multiline(keystrokes: usize) {
    let field = FieldConfig::text("notes").with_multiline(1, 20);
    let variant = select_variant(&field);
    let mut session =
        EditSession::new(&variant, &field, FieldValue::default(), Duration::from_millis(200));

    let start = Instant::now();
    let mut raw = String::new();
    for i in 0..keystrokes {
        raw.push(if i % 40 == 39 { '\n' } else { 'x' });
        session.on_user_edit(&raw, start + Duration::from_millis(i as u64));
        divan::black_box(variant.rows_for(&raw));
    }
    divan::black_box(session.poll(start + Duration::from_secs(10)));
}
