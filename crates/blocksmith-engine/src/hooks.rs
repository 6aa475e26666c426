//! The decoration artifact: hooks a host wires to its own event sources.
//!
//! Decorators rewrite the tree synchronously and return a [`Decoration`]
//! describing the asynchronous behaviour they want: visibility triggers for
//! an intersection-observer primitive and event bindings for click, key,
//! image-load and resize delivery. The engine never touches a browser
//! global; the host (or [`crate::runtime::BlockRuntime`]) interprets these.

use blocksmith_dom::NodeId;

/// Intersection observation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Minimum intersection ratio that counts as visible.
    pub threshold: f64,
    /// Bottom root-margin as a percentage (negative shrinks the viewport).
    pub bottom_margin_pct: i32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_margin_pct: 0,
        }
    }
}

/// What happens when a visibility trigger fires.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityAction {
    /// Schedule the card entry transition after a stagger delay.
    RevealCard { delay_ms: u64 },
    /// Report a block impression carrying the joined option tokens.
    BlockImpression { variant: String },
    /// Swap a deferred image source (`data-src`) into `src`.
    LoadDeferredImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityTrigger {
    pub target: NodeId,
    pub options: ObserverOptions,
    pub action: VisibilityAction,
    /// Disarm after the first firing (the self-unobserving observer).
    pub once: bool,
}

/// What a click on a bound element reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    /// A link inside card `cell`; the title text is read at delivery time.
    CardInteraction { cell: NodeId, card_index: usize },
    /// A hero CTA button; position 0 is primary, everything after secondary.
    HeroCta { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventBinding {
    Click {
        target: NodeId,
        action: ClickAction,
    },
    /// Enter/Space on a non-native button synthesizes a click.
    Keydown { target: NodeId },
    /// Adds the `image-loaded` class to `block` once `image` has loaded.
    ImageLoad { image: NodeId, block: NodeId },
    /// Keeps `data-screen-size` on `block` in step with the viewport.
    Resize { block: NodeId },
}

/// Everything a decorator asks the host to wire up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoration {
    pub observers: Vec<VisibilityTrigger>,
    pub bindings: Vec<EventBinding>,
}

impl Decoration {
    pub fn observe(&mut self, trigger: VisibilityTrigger) {
        self.observers.push(trigger);
    }

    pub fn bind(&mut self, binding: EventBinding) {
        self.bindings.push(binding);
    }
}
