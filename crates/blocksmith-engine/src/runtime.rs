//! Host-side interpreter for decoration hooks.
//!
//! A [`BlockRuntime`] owns one decorated block's document and its
//! [`Decoration`], and translates host event deliveries (intersection
//! callbacks, clicks, key presses, image loads, viewport resizes) into the
//! DOM mutations and analytics pushes the decorators asked for. Execution is
//! single-threaded and event-driven: nothing blocks, and the only scheduling
//! primitive is a millisecond timer queue driven by [`BlockRuntime::advance`].

use blocksmith_config::BlockConfig;
use blocksmith_dom::{Document, NodeId};

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::blocks::hero_teaser::IMAGE_LOADED_CLASS;
use crate::classify::ScreenSize;
use crate::hooks::{ClickAction, Decoration, EventBinding, VisibilityAction, VisibilityTrigger};

struct ObserverState {
    trigger: VisibilityTrigger,
    armed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due_ms: u64,
    cell: NodeId,
}

pub struct BlockRuntime {
    doc: Document,
    config: BlockConfig,
    observers: Vec<ObserverState>,
    bindings: Vec<EventBinding>,
    /// Resize delivery stays wired until the cleanup handle is invoked.
    resize_active: bool,
    clock_ms: u64,
    timers: Vec<Timer>,
}

impl BlockRuntime {
    pub fn new(doc: Document, config: BlockConfig, decoration: Decoration) -> Self {
        let observers = decoration
            .observers
            .into_iter()
            .map(|trigger| ObserverState {
                trigger,
                armed: true,
            })
            .collect();
        Self {
            doc,
            config,
            observers,
            bindings: decoration.bindings,
            resize_active: true,
            clock_ms: 0,
            timers: Vec::new(),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Delivers an intersection callback for `target` at the given ratio.
    ///
    /// Triggers marked `once` disarm after their first firing, so repeated
    /// viewport entries cannot re-fire an impression or a reveal.
    pub fn intersect(&mut self, target: NodeId, ratio: f64, sink: &mut dyn AnalyticsSink) {
        for index in 0..self.observers.len() {
            let state = &self.observers[index];
            if !state.armed
                || state.trigger.target != target
                || ratio < state.trigger.options.threshold
            {
                continue;
            }
            if state.trigger.once {
                self.observers[index].armed = false;
            }
            let action = self.observers[index].trigger.action.clone();
            self.apply_visibility_action(target, action, sink);
        }
    }

    fn apply_visibility_action(
        &mut self,
        target: NodeId,
        action: VisibilityAction,
        sink: &mut dyn AnalyticsSink,
    ) {
        match action {
            VisibilityAction::RevealCard { delay_ms } => {
                self.timers.push(Timer {
                    due_ms: self.clock_ms + delay_ms,
                    cell: target,
                });
            }
            VisibilityAction::BlockImpression { variant } => {
                sink.push(AnalyticsEvent::BlockImpression {
                    block_type: self.config.class_name_prefix.clone(),
                    block_variant: variant,
                });
            }
            VisibilityAction::LoadDeferredImage => {
                if let Some(src) = self.doc.attr(target, "data-src").map(str::to_string) {
                    self.doc.set_attr(target, "src", &src);
                    self.doc.remove_attr(target, "data-src");
                }
            }
        }
    }

    /// Advances the clock, running every timer that falls due, in due order.
    pub fn advance(&mut self, ms: u64) {
        self.clock_ms += ms;
        let now = self.clock_ms;

        let mut due: Vec<Timer> = self
            .timers
            .iter()
            .copied()
            .filter(|timer| timer.due_ms <= now)
            .collect();
        self.timers.retain(|timer| timer.due_ms > now);
        due.sort_by_key(|timer| timer.due_ms);

        for timer in due {
            self.reveal_card(timer.cell);
        }
    }

    /// The entry transition: fade in and settle from the 40px offset.
    fn reveal_card(&mut self, cell: NodeId) {
        let duration = self.config.animation_duration_ms;
        self.doc.set_style(
            cell,
            "transition",
            &format!("opacity {duration}ms ease-out, transform {duration}ms ease-out"),
        );
        self.doc.set_style(cell, "opacity", "1");
        self.doc.set_style(cell, "transform", "translateY(0)");
    }

    /// Delivers a click on a bound element.
    ///
    /// Card titles and button text are read at delivery time, so edits made
    /// after decoration are reflected in the reported payload.
    pub fn click(&mut self, target: NodeId, sink: &mut dyn AnalyticsSink) {
        let actions: Vec<ClickAction> = self
            .bindings
            .iter()
            .filter_map(|binding| match binding {
                EventBinding::Click {
                    target: bound,
                    action,
                } if *bound == target => Some(action.clone()),
                _ => None,
            })
            .collect();

        for action in actions {
            match action {
                ClickAction::CardInteraction { cell, card_index } => {
                    let card_title = self
                        .doc
                        .first_with_class(cell, &self.config.class("title"))
                        .map(|title| self.doc.text_content(title).trim().to_string())
                        .unwrap_or_default();
                    sink.push(AnalyticsEvent::CardInteraction {
                        block_type: self.config.class_name_prefix.clone(),
                        card_index,
                        card_title,
                        interaction_type: "click".to_string(),
                    });
                }
                ClickAction::HeroCta { position } => {
                    let button_type = if position == 0 { "primary" } else { "secondary" };
                    sink.push(AnalyticsEvent::HeroTeaserInteraction {
                        block_type: self.config.class_name_prefix.clone(),
                        action: "button_click".to_string(),
                        button_type: button_type.to_string(),
                        button_text: self.doc.text_content(target).trim().to_string(),
                        href: self
                            .doc
                            .attr(target, "href")
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
            }
        }
    }

    /// Enter and Space on a keyboard-bound element act like a click.
    pub fn keydown(&mut self, target: NodeId, key: &str, sink: &mut dyn AnalyticsSink) {
        if key != "Enter" && key != " " {
            return;
        }
        let bound = self
            .bindings
            .iter()
            .any(|binding| matches!(binding, EventBinding::Keydown { target: t } if *t == target));
        if bound {
            self.click(target, sink);
        }
    }

    /// Marks the block once its background image has loaded. Idempotent;
    /// hosts call this immediately for images that were already complete.
    pub fn image_loaded(&mut self, image: NodeId) {
        let blocks: Vec<NodeId> = self
            .bindings
            .iter()
            .filter_map(|binding| match binding {
                EventBinding::ImageLoad {
                    image: bound,
                    block,
                } if *bound == image => Some(*block),
                _ => None,
            })
            .collect();
        for block in blocks {
            self.doc.add_class(block, IMAGE_LOADED_CLASS);
        }
    }

    /// Writes `data-screen-size` for the current viewport width. Called by
    /// the host once at load and again on every resize.
    pub fn viewport_resized(&mut self, width: u32) {
        if !self.resize_active {
            return;
        }
        let size = ScreenSize::for_width(width, &self.config.breakpoints);
        let blocks: Vec<NodeId> = self
            .bindings
            .iter()
            .filter_map(|binding| match binding {
                EventBinding::Resize { block } => Some(*block),
                _ => None,
            })
            .collect();
        for block in blocks {
            self.doc.set_attr(block, "data-screen-size", size.as_str());
        }
    }

    /// Cleanup handle for the resize wiring. Stored for hosts that tear
    /// blocks down; the decorators themselves never invoke it.
    pub fn remove_resize_listener(&mut self) {
        self.resize_active = false;
    }
}
