//! `Document` over the live browser DOM.
//!
//! Elements are interned on first lookup so the core can address them by
//! `ElementId`. Vertical offset and pin offset share the CSS `transform`
//! property, so both are tracked per element and composed on every write.

use std::cell::RefCell;

use vizij_scroll_core::{Document, ElementId, StyleProperty};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node, NodeList, Window};

struct Slot {
    el: Element,
    y: f64,
    pin: f64,
}

pub struct DomDocument {
    window: Window,
    document: web_sys::Document,
    slots: RefCell<Vec<Slot>>,
}

pub(crate) fn translate_y(px: f64) -> String {
    format!("translate3d(0px, {px}px, 0px)")
}

/// Page-relative top: sum of offsetTop up the offsetParent chain, so
/// transforms applied by tweens do not move the measurement.
fn page_top(el: &HtmlElement) -> f64 {
    let mut top = f64::from(el.offset_top());
    let mut parent = el.offset_parent();
    while let Some(p) = parent {
        match p.dyn_into::<HtmlElement>() {
            Ok(h) => {
                top += f64::from(h.offset_top());
                parent = h.offset_parent();
            }
            Err(_) => break,
        }
    }
    top
}

impl DomDocument {
    pub fn from_window() -> Result<Self, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("window has no document"))?;
        Ok(Self {
            window,
            document,
            slots: RefCell::new(Vec::new()),
        })
    }

    /// Current `window.scrollY`, or 0 if unavailable.
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn intern(&self, el: Element) -> ElementId {
        let mut slots = self.slots.borrow_mut();
        let node: &Node = &el;
        if let Some(i) = slots.iter().position(|s| s.el.is_same_node(Some(node))) {
            return ElementId(i as u32);
        }
        slots.push(Slot { el, y: 0.0, pin: 0.0 });
        ElementId((slots.len() - 1) as u32)
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.slots.borrow().get(id.0 as usize).map(|s| s.el.clone())
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, list: NodeList) -> Vec<ElementId> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .map(|el| self.intern(el))
            .collect()
    }
}

impl Document for DomDocument {
    fn query(&self, selector: &str) -> Option<ElementId> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|el| self.intern(el)),
            Err(err) => {
                log::debug!("selector {selector:?} rejected: {err:?}");
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        match self.document.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                log::debug!("selector {selector:?} rejected: {err:?}");
                Vec::new()
            }
        }
    }

    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(scope) = self.element(scope) else {
            return Vec::new();
        };
        match scope.query_selector_all(selector) {
            Ok(list) => self.collect(list),
            Err(err) => {
                log::debug!("selector {selector:?} rejected: {err:?}");
                Vec::new()
            }
        }
    }

    fn text(&self, el: ElementId) -> Option<String> {
        self.element(el)?.text_content()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(el) = self.element(el) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        let Some(el) = self.element(el) else {
            return;
        };
        if let Err(err) = el.class_list().toggle_with_force(class, on) {
            log::debug!("class {class:?} toggle failed: {err:?}");
        }
    }

    fn set_style(&mut self, el: ElementId, prop: StyleProperty, value: f64) {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(el.0 as usize) else {
            return;
        };
        let (name, css) = match prop {
            StyleProperty::Opacity => ("opacity", value.to_string()),
            StyleProperty::TranslateY => {
                slot.y = value;
                ("transform", translate_y(slot.y + slot.pin))
            }
            StyleProperty::PinOffset => {
                slot.pin = value;
                ("transform", translate_y(slot.y + slot.pin))
            }
        };
        let Some(html) = slot.el.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property(name, &css) {
            log::debug!("style {name} write failed: {err:?}");
        }
    }

    fn offset_height(&self, el: ElementId) -> Option<f64> {
        self.html(el).map(|h| f64::from(h.offset_height()))
    }

    fn offset_top(&self, el: ElementId) -> Option<f64> {
        self.html(el).map(|h| page_top(&h))
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}
