//! Analytics event model and sink capability.
//!
//! Decorated blocks describe *what* to report; the host decides where the
//! events go. [`DataLayer`] is the bundled sink shaped like the usual
//! `dataLayer` push queue: an append-only list of JSON objects.

use serde::Serialize;

/// One analytics payload, tagged by its `event` name on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// Block entered the viewport for the first time.
    BlockImpression {
        block_type: String,
        block_variant: String,
    },
    /// A link inside a card was activated.
    CardInteraction {
        block_type: String,
        card_index: usize,
        card_title: String,
        interaction_type: String,
    },
    /// A hero call-to-action was activated.
    HeroTeaserInteraction {
        block_type: String,
        action: String,
        button_type: String,
        button_text: String,
        href: String,
    },
}

/// Where decorators report events. Hosts without analytics pass [`NullSink`].
pub trait AnalyticsSink {
    fn push(&mut self, event: AnalyticsEvent);
}

/// Sink that drops everything, for hosts with no analytics queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn push(&mut self, _event: AnalyticsEvent) {}
}

/// In-memory `dataLayer` analogue collecting serialized event objects.
#[derive(Debug, Default)]
pub struct DataLayer {
    entries: Vec<serde_json::Value>,
}

impl DataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[serde_json::Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnalyticsSink for DataLayer {
    fn push(&mut self, event: AnalyticsEvent) {
        match serde_json::to_value(&event) {
            Ok(value) => self.entries.push(value),
            Err(err) => log::warn!("dropping unserializable analytics event: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_serialize_with_event_tag() {
        let mut layer = DataLayer::new();
        layer.push(AnalyticsEvent::BlockImpression {
            block_type: "facts-figures-cards".to_string(),
            block_variant: "variant-h5-short col-3".to_string(),
        });

        assert_eq!(
            layer.entries(),
            &[json!({
                "event": "block_impression",
                "block_type": "facts-figures-cards",
                "block_variant": "variant-h5-short col-3",
            })]
        );
    }

    #[test]
    fn hero_interaction_event_name() {
        let value = serde_json::to_value(AnalyticsEvent::HeroTeaserInteraction {
            block_type: "hero-teaser".to_string(),
            action: "button_click".to_string(),
            button_type: "primary".to_string(),
            button_text: "Shop now".to_string(),
            href: "/shop".to_string(),
        })
        .unwrap();
        assert_eq!(value["event"], "hero_teaser_interaction");
        assert_eq!(value["button_type"], "primary");
    }
}
