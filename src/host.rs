//! Form host integration
//!
//! [`FormHost`] mounts one [`FieldSlot`] per catalog entry, routes
//! [`FormMsg`]s to the owning field, and keeps the value map. Each commit
//! writes its field's key and then persists the whole map through the
//! injected [`FieldStore`].

use std::collections::HashMap;
use std::time::Instant;

use crate::catalog::FieldCatalog;
use crate::config::FormConfig;
use crate::editable::KeyOutcome;
use crate::field::FieldConfig;
use crate::mask::MaskGrammar;
use crate::messages::{FieldEvent, FormMsg};
use crate::overlay::{ActionNode, ActionsOverlay, Measure};
use crate::session::{EditSession, SessionEvent};
use crate::store::{bootstrap, FieldStore};
use crate::value::{FieldValue, ValueMap};
use crate::variant::{ControlSelector, Variant};

/// A mounted field: its config, chosen control, live session and actions
#[derive(Debug)]
pub struct FieldSlot {
    config: FieldConfig,
    variant: Variant,
    session: EditSession,
    overlay: ActionsOverlay,
    in_process: bool,
}

impl FieldSlot {
    fn mount(config: FieldConfig, selector: &ControlSelector, initial: FieldValue, form: &FormConfig) -> Self {
        let variant = selector.select(&config);
        let session = EditSession::new(&variant, &config, initial, form.debounce());
        let overlay = ActionsOverlay::new(Vec::new(), config.eventable);
        tracing::debug!("Mounted field {} as {:?}", config.id, variant.kind());
        Self {
            config,
            variant,
            session,
            overlay,
            in_process: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn overlay(&self) -> &ActionsOverlay {
        &self.overlay
    }

    pub fn in_process(&self) -> bool {
        self.in_process
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.variant.placeholder(&self.config)
    }

    /// Rows to render for the current value, for multi-row controls
    pub fn rows(&self) -> Option<usize> {
        self.variant.rows_for(&self.session.display_text())
    }

    pub fn class_list(&self) -> Vec<String> {
        self.config.hints.class_list(self.session.is_read_only())
    }

    fn sync_overlay(&mut self) {
        self.overlay
            .sync(self.session.is_pending(), self.in_process);
    }
}

pub struct FormHost {
    slots: Vec<FieldSlot>,
    index: HashMap<String, usize>,
    values: ValueMap,
    store: Box<dyn FieldStore>,
}

impl std::fmt::Debug for FormHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormHost")
            .field("slots", &self.slots)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl FormHost {
    /// Mount every catalog field with the built-in mask classes
    pub fn new(catalog: &FieldCatalog, store: Box<dyn FieldStore>, config: &FormConfig) -> Self {
        Self::with_grammar(catalog, store, config, MaskGrammar::default())
    }

    pub fn with_grammar(
        catalog: &FieldCatalog,
        store: Box<dyn FieldStore>,
        config: &FormConfig,
        grammar: MaskGrammar,
    ) -> Self {
        let selector = ControlSelector::new(grammar, config.clone());
        let mut values = bootstrap(store.as_ref(), catalog.ids());

        let slots: Vec<FieldSlot> = catalog
            .fields()
            .iter()
            .map(|field| {
                let initial = values.get(&field.id).cloned().unwrap_or_default();
                FieldSlot::mount(field.clone(), &selector, initial, config)
            })
            .collect();

        // Stored values go through the same normalization as edits
        for slot in &slots {
            values.insert(slot.id().to_string(), slot.session.last_committed().clone());
        }

        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.id().to_string(), i))
            .collect();

        tracing::info!("Form mounted with {} fields", slots.len());
        Self {
            slots,
            index,
            values,
            store,
        }
    }

    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn slot(&self, id: &str) -> Option<&FieldSlot> {
        self.index.get(id).map(|&i| &self.slots[i])
    }

    fn slot_mut(&mut self, id: &str) -> Option<&mut FieldSlot> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.slots[i]),
            None => {
                tracing::warn!("Message for unknown field {}", id);
                None
            }
        }
    }

    /// Committed values, as last persisted
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Live value of a field
    pub fn live_value(&self, id: &str) -> Option<&FieldValue> {
        self.slot(id).map(|slot| slot.session.live())
    }

    /// First field configured to take focus on mount
    pub fn initial_focus(&self) -> Option<&str> {
        self.slots
            .iter()
            .find(|slot| slot.config.auto_focus)
            .map(FieldSlot::id)
    }

    /// Earliest pending debounce deadline across all fields
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots
            .iter()
            .filter_map(|slot| slot.session.next_deadline())
            .min()
    }

    /// Main update function - dispatches a message to its field
    pub fn update(&mut self, msg: FormMsg, now: Instant) -> Vec<FieldEvent> {
        match msg {
            FormMsg::Edit { field, raw } => {
                if let Some(slot) = self.slot_mut(&field) {
                    slot.session.on_user_edit(&raw, now);
                    slot.sync_overlay();
                }
                Vec::new()
            }

            FormMsg::Blur { field } => self.blur(field),

            FormMsg::Key { field, key } => {
                let Some(slot) = self.slot_mut(&field) else {
                    return Vec::new();
                };
                match slot.session.on_key(key) {
                    KeyOutcome::InsertText(text) => vec![FieldEvent::InsertText { field, text }],
                    KeyOutcome::PassThrough => Vec::new(),
                }
            }

            FormMsg::Tick => self
                .slots
                .iter_mut()
                .filter_map(|slot| match slot.session.poll(now) {
                    Some(SessionEvent::Changing(value)) => Some(FieldEvent::Changing {
                        field: slot.config.id.clone(),
                        value,
                    }),
                    _ => None,
                })
                .collect(),

            FormMsg::SetInProcess { field, in_process } => {
                if let Some(slot) = self.slot_mut(&field) {
                    slot.in_process = in_process;
                    slot.sync_overlay();
                }
                Vec::new()
            }

            FormMsg::SetReadOnly { field, read_only } => {
                if let Some(slot) = self.slot_mut(&field) {
                    slot.session.set_read_only(read_only);
                    if let Variant::Numeric { read_only: ro } = &mut slot.variant {
                        *ro = slot.session.is_read_only();
                    }
                    slot.sync_overlay();
                }
                Vec::new()
            }

            FormMsg::SetActions { field, nodes } => {
                self.set_actions(&field, nodes);
                Vec::new()
            }

            FormMsg::Resized { field } => {
                if let Some(slot) = self.slot_mut(&field) {
                    slot.overlay.on_resize();
                }
                Vec::new()
            }
        }
    }

    fn blur(&mut self, field: String) -> Vec<FieldEvent> {
        let Some(slot) = self.slot_mut(&field) else {
            return Vec::new();
        };
        let event = slot.session.on_focus_lost();
        slot.sync_overlay();

        match event {
            Some(SessionEvent::Committed(value)) => {
                self.values.insert(field.clone(), value.clone());
                self.persist();
                vec![FieldEvent::Committed { field, value }]
            }
            _ => Vec::new(),
        }
    }

    fn set_actions(&mut self, field: &str, nodes: Vec<ActionNode>) {
        if let Some(slot) = self.slot_mut(field) {
            slot.overlay.set_nodes(nodes);
        }
    }

    fn persist(&mut self) {
        match self.store.persist(&self.values) {
            Ok(()) => tracing::debug!("Persisted {} field values", self.values.len()),
            Err(e) => tracing::warn!("Failed to persist field values: {:#}", e),
        }
    }

    /// Measure overlays after a render commit. Returns true if any layout changed.
    pub fn after_render(&mut self, measure: &dyn Measure) -> bool {
        let mut changed = false;
        for slot in &mut self.slots {
            changed |= slot.overlay.after_render(measure);
        }
        changed
    }
}
