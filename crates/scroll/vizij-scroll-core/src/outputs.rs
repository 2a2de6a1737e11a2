//! Output contracts from the scroll engine.
//!
//! Outputs carry the writes made to the document this tick and a separate
//! list of semantic events. Hosts whose [`crate::Document`] already applies
//! writes directly can ignore `changes`.

use serde::{Deserialize, Serialize};

use crate::dom::{Document, StyleProperty};
use crate::ids::{ElementId, TriggerId, TweenId};

/// Written channel of an element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChangeValue {
    Style {
        property: StyleProperty,
        value: f64,
    },
    Text(String),
}

/// One write to the document during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub element: ElementId,
    pub value: ChangeValue,
}

/// Discrete semantic signals emitted during setup and stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    RevealRegistered {
        element: ElementId,
        trigger: TriggerId,
    },
    CounterRegistered {
        element: ElementId,
        target: f64,
        notation: String,
    },
    /// Label registered as a fade-only reveal (e.g. "24/7").
    LabelFaded {
        element: ElementId,
    },
    LabelSkipped {
        element: ElementId,
        text: String,
    },
    PinCreated {
        section: String,
        trigger: TriggerId,
        distance: f64,
    },
    PinDestroyed {
        section: String,
        trigger: TriggerId,
    },
    PinEngaged {
        trigger: TriggerId,
        element: ElementId,
    },
    PinReleased {
        trigger: TriggerId,
        element: ElementId,
    },
    TweenStarted {
        tween: TweenId,
    },
    TweenCompleted {
        tween: TweenId,
    },
    /// Trigger boundaries were recomputed after layout change.
    Refreshed {
        triggers: usize,
    },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_style(&mut self, element: ElementId, property: StyleProperty, value: f64) {
        self.changes.push(Change {
            element,
            value: ChangeValue::Style { property, value },
        });
    }

    #[inline]
    pub fn push_text(&mut self, element: ElementId, text: String) {
        self.changes.push(Change {
            element,
            value: ChangeValue::Text(text),
        });
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn append(&mut self, other: &mut Outputs) {
        self.changes.append(&mut other.changes);
        self.events.append(&mut other.events);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Text writes made to `element`, in order.
    pub fn texts_for(&self, element: ElementId) -> impl Iterator<Item = &str> {
        self.changes.iter().filter_map(move |c| match &c.value {
            ChangeValue::Text(t) if c.element == element => Some(t.as_str()),
            _ => None,
        })
    }
}

/// Document wrapper that forwards every call and records writes into `Outputs`.
pub struct RecordingDocument<'a> {
    inner: &'a mut dyn Document,
    out: &'a mut Outputs,
}

impl<'a> RecordingDocument<'a> {
    pub fn new(inner: &'a mut dyn Document, out: &'a mut Outputs) -> Self {
        Self { inner, out }
    }
}

impl Document for RecordingDocument<'_> {
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.inner.query(selector)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.inner.query_all(selector)
    }

    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        self.inner.query_within(scope, selector)
    }

    fn text(&self, el: ElementId) -> Option<String> {
        self.inner.text(el)
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.inner.set_text(el, text);
        self.out.push_text(el, text.to_string());
    }

    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        self.inner.set_class(el, class, on);
    }

    fn set_style(&mut self, el: ElementId, prop: StyleProperty, value: f64) {
        self.inner.set_style(el, prop, value);
        self.out.push_style(el, prop, value);
    }

    fn offset_height(&self, el: ElementId) -> Option<f64> {
        self.inner.offset_height(el)
    }

    fn offset_top(&self, el: ElementId) -> Option<f64> {
        self.inner.offset_top(el)
    }

    fn viewport_width(&self) -> f64 {
        self.inner.viewport_width()
    }

    fn viewport_height(&self) -> f64 {
        self.inner.viewport_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn recorder_forwards_and_logs_writes() {
        let mut doc = MemoryDocument::new(1200.0, 800.0);
        let el = doc.push_box(None, "h3", "", 0.0, 20.0, "+500");
        let mut out = Outputs::default();
        {
            let mut rec = RecordingDocument::new(&mut doc, &mut out);
            rec.set_text(el, "+0");
            rec.set_style(el, StyleProperty::Opacity, 0.0);
            assert_eq!(rec.text(el).as_deref(), Some("+0"));
        }
        assert_eq!(doc.text(el).as_deref(), Some("+0"));
        assert_eq!(out.texts_for(el).collect::<Vec<_>>(), vec!["+0"]);
        assert_eq!(out.changes.len(), 2);
    }
}
