//! Trailing actions overlay
//!
//! Action nodes (status icons and the like) sit on top of the right edge of
//! a field control. The overlay measures them through an injected
//! [`Measure`] and exposes the width so the control can reserve matching
//! right padding.
//!
//! The overlay stays hidden until it has measured a non-zero width once, so
//! the first frame after mount does not paint actions over unpadded text.

/// Title of the indicator shown for an uncommitted local edit
pub const READY_TO_SEND_TITLE: &str = "ready to send";

/// Host-supplied action node; opaque to the core apart from its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionNode {
    pub key: String,
    pub title: Option<String>,
}

impl ActionNode {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Derived "pending / in process" indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionIndicator {
    /// Rendered muted while the host reports an in-progress update
    pub muted: bool,
}

impl ActionIndicator {
    pub fn title(&self) -> &'static str {
        if self.muted {
            ""
        } else {
            READY_TO_SEND_TITLE
        }
    }
}

/// One rendered entry of the actions list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionItem {
    Node(ActionNode),
    Indicator(ActionIndicator),
}

/// Indicator for a field, if any
///
/// Local pending state and the host's in-process flag are independent; either
/// one shows the indicator, and only the in-process flag mutes it.
pub fn derive_indicator(eventable: bool, pending: bool, in_process: bool) -> Option<ActionIndicator> {
    if eventable && (pending || in_process) {
        Some(ActionIndicator { muted: in_process })
    } else {
        None
    }
}

/// Measures the rendered width of an actions list in pixels
pub trait Measure {
    fn measure(&self, items: &[ActionItem]) -> u32;
}

/// Fixed-size measurement for headless hosts and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasure {
    pub item_width: u32,
    pub gap: u32,
}

impl FixedMeasure {
    pub fn new(item_width: u32) -> Self {
        Self { item_width, gap: 0 }
    }

    /// Set the gap between items (builder pattern)
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }
}

impl Measure for FixedMeasure {
    fn measure(&self, items: &[ActionItem]) -> u32 {
        let count = items.len() as u32;
        count * self.item_width + count.saturating_sub(1) * self.gap
    }
}

/// Computed actions bounds, relative to the field container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBounds {
    /// X position in pixels
    pub x: u32,
    /// Y position in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl OverlayBounds {
    /// Get the right edge X coordinate
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Get the bottom edge Y coordinate
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Actions list and its measured layout for one field
#[derive(Debug, Clone)]
pub struct ActionsOverlay {
    eventable: bool,
    nodes: Vec<ActionNode>,
    items: Vec<ActionItem>,
    measured_width: u32,
    ever_measured: bool,
    needs_measure: bool,
}

impl ActionsOverlay {
    pub fn new(nodes: Vec<ActionNode>, eventable: bool) -> Self {
        let items = nodes.iter().cloned().map(ActionItem::Node).collect();
        Self {
            eventable,
            nodes,
            items,
            measured_width: 0,
            ever_measured: false,
            // Measure on mount
            needs_measure: true,
        }
    }

    /// Replace the host-supplied nodes
    pub fn set_nodes(&mut self, nodes: Vec<ActionNode>) {
        let indicator = self.indicator();
        self.nodes = nodes;
        self.rebuild(indicator);
    }

    /// Re-derive the indicator from the field's state
    pub fn sync(&mut self, pending: bool, in_process: bool) {
        let indicator = derive_indicator(self.eventable, pending, in_process);
        if indicator != self.indicator() {
            self.rebuild(indicator);
        }
    }

    /// Container changed size; measure again after the next render
    pub fn on_resize(&mut self) {
        self.needs_measure = true;
    }

    fn rebuild(&mut self, indicator: Option<ActionIndicator>) {
        let previous_len = self.items.len();
        self.items = self.nodes.iter().cloned().map(ActionItem::Node).collect();
        if let Some(indicator) = indicator {
            self.items.push(ActionItem::Indicator(indicator));
        }
        if self.items.len() != previous_len {
            self.needs_measure = true;
        }
    }

    pub fn items(&self) -> &[ActionItem] {
        &self.items
    }

    pub fn indicator(&self) -> Option<ActionIndicator> {
        self.items.iter().find_map(|item| match item {
            ActionItem::Indicator(indicator) => Some(*indicator),
            ActionItem::Node(_) => None,
        })
    }

    /// Whether the actions list is rendered at all
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Measure after a render commit. Returns true if the width changed.
    pub fn after_render(&mut self, measure: &dyn Measure) -> bool {
        if !self.needs_measure {
            return false;
        }
        self.needs_measure = false;

        let width = if self.items.is_empty() {
            0
        } else {
            measure.measure(&self.items)
        };
        if width > 0 {
            self.ever_measured = true;
        }
        if width == self.measured_width {
            return false;
        }

        tracing::trace!("Actions width {} -> {}", self.measured_width, width);
        self.measured_width = width;
        true
    }

    pub fn measured_width(&self) -> u32 {
        self.measured_width
    }

    /// Visible once a non-zero width has been measured
    pub fn is_visible(&self) -> bool {
        self.ever_measured && self.has_items()
    }

    /// Right padding the control should reserve
    pub fn padding_right(&self) -> Option<u32> {
        (self.measured_width > 0).then_some(self.measured_width)
    }

    /// Bounds of the actions, anchored to the container's right edge
    pub fn compute_bounds(&self, container_width: u32, height: u32) -> Option<OverlayBounds> {
        if !self.is_visible() {
            return None;
        }
        let width = self.measured_width.min(container_width);
        Some(OverlayBounds {
            x: container_width - width,
            y: 0,
            width,
            height,
        })
    }
}
