//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use formfield::catalog::FieldCatalog;
use formfield::config::FormConfig;
use formfield::host::FormHost;
use formfield::store::FieldStore;
use formfield::value::{FieldValue, ValueMap};

pub const WINDOW: Duration = Duration::from_millis(200);

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn text_map(entries: &[(&str, &str)]) -> ValueMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
        .collect()
}

/// Store whose state stays observable after the host takes ownership
#[derive(Debug, Default)]
pub struct SharedState {
    pub stored: ValueMap,
    pub defaults: ValueMap,
    pub writes: Vec<ValueMap>,
    pub fail: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<SharedState>>);

impl SharedStore {
    pub fn new(stored: ValueMap, defaults: ValueMap) -> Self {
        Self(Rc::new(RefCell::new(SharedState {
            stored,
            defaults,
            ..SharedState::default()
        })))
    }

    pub fn writes(&self) -> Vec<ValueMap> {
        self.0.borrow().writes.clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.0.borrow_mut().fail = fail;
    }
}

impl FieldStore for SharedStore {
    fn load(&self) -> ValueMap {
        self.0.borrow().stored.clone()
    }

    fn defaults(&self) -> ValueMap {
        self.0.borrow().defaults.clone()
    }

    fn persist(&mut self, values: &ValueMap) -> anyhow::Result<()> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            anyhow::bail!("disk full");
        }
        state.stored = values.clone();
        state.writes.push(values.clone());
        Ok(())
    }
}

pub const CATALOG: &str = r#"
fields:
  - id: phone
    mask: "999-9999"
    placeholder: Phone
    eventable: true
  - id: color
    options:
      - value: a
        label: A
      - value: b
        label: B
  - id: qty
    kind: number
    prepare_number: round
  - id: notes
    multiline: true
    allow_tabs: true
    auto_focus: true
defaults:
  phone: "555-0100"
  color: a
"#;

pub fn catalog() -> FieldCatalog {
    FieldCatalog::from_yaml_str(CATALOG).unwrap()
}

/// Host over the test catalog with an empty store (defaults kick in)
pub fn test_host() -> (FormHost, SharedStore) {
    let store = SharedStore::new(ValueMap::new(), catalog().defaults().clone());
    let host = FormHost::new(&catalog(), Box::new(store.clone()), &FormConfig::default());
    (host, store)
}

pub fn t0() -> Instant {
    Instant::now()
}
