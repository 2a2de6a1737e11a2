//! Document capability consumed by the engine, plus an in-memory implementation.
//!
//! Hosts implement [`Document`] over their real element tree (the wasm adapter
//! does it over `web-sys`). [`MemoryDocument`] keeps a small element arena with
//! explicit box geometry so pages can be driven headless from tests or fixtures.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// Style channels the engine writes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Opacity,
    /// Vertical translate in px.
    TranslateY,
    /// Offset applied to a pinned element to hold it in place, in px.
    PinOffset,
}

/// DOM-like surface the controllers read from and write to.
pub trait Document {
    /// First element matching `selector`, in document order.
    fn query(&self, selector: &str) -> Option<ElementId>;
    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;
    /// Descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    fn text(&self, el: ElementId) -> Option<String>;
    fn set_text(&mut self, el: ElementId, text: &str);
    fn set_class(&mut self, el: ElementId, class: &str, on: bool);
    fn set_style(&mut self, el: ElementId, prop: StyleProperty, value: f64);

    /// Rendered box height.
    fn offset_height(&self, el: ElementId) -> Option<f64>;
    /// Top edge relative to the document origin (independent of scroll).
    fn offset_top(&self, el: ElementId) -> Option<f64>;

    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
}

// ---------------------------------------------------------------------------
// Selectors

/// One compound selector: optional tag, `#id`, and any number of `.class`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

/// Descendant-combinator chain of compound selectors, e.g. `.a.b .c h2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse the supported subset. Returns None for anything else (attribute
    /// selectors, child combinators, pseudo classes).
    pub fn parse(s: &str) -> Option<Self> {
        let parts = s
            .split_whitespace()
            .map(parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }
}

fn parse_compound(s: &str) -> Option<Compound> {
    let mut out = Compound::default();
    let mut rest = s;
    let head_end = rest.find(['.', '#']).unwrap_or(rest.len());
    if head_end > 0 {
        let tag = &rest[..head_end];
        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        out.tag = Some(tag.to_ascii_lowercase());
    }
    rest = &rest[head_end..];
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..end];
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        match marker {
            '.' => out.classes.push(name.to_string()),
            '#' => out.id = Some(name.to_string()),
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// In-memory document

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    text: String,
    height: f64,
    top: f64,
    styles: HashMap<StyleProperty, f64>,
}

impl Node {
    fn matches(&self, c: &Compound) -> bool {
        if let Some(tag) = &c.tag {
            if !self.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &c.id {
            if self.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        c.classes.iter().all(|cls| self.classes.contains(cls))
    }
}

/// Serializable description of a page: viewport plus an element tree with
/// explicit geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageLayout {
    pub viewport: Viewport,
    pub body: Vec<ElementLayout>,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElementLayout {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub children: Vec<ElementLayout>,
}

/// Arena-backed document with fixed box geometry.
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    viewport: Viewport,
}

impl MemoryDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            nodes: Vec::new(),
            viewport: Viewport { width, height },
        }
    }

    /// Build a document from a serialized layout.
    pub fn from_layout(layout: &PageLayout) -> Self {
        let mut doc = Self::new(layout.viewport.width, layout.viewport.height);
        for el in &layout.body {
            doc.insert_layout(None, el);
        }
        doc
    }

    fn insert_layout(&mut self, parent: Option<ElementId>, layout: &ElementLayout) {
        let id = self.push(parent, &layout.tag, &layout.classes.join(" "));
        {
            let node = &mut self.nodes[id.0 as usize];
            node.id = layout.id.clone();
            node.text = layout.text.clone();
            node.height = layout.height;
            node.top = layout.top;
        }
        for child in &layout.children {
            self.insert_layout(Some(id), child);
        }
    }

    /// Append an element. `classes` is a space separated class list.
    pub fn push(&mut self, parent: Option<ElementId>, tag: &str, classes: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: classes.split_whitespace().map(str::to_string).collect(),
            parent,
            children: Vec::new(),
            text: String::new(),
            height: 0.0,
            top: 0.0,
            styles: HashMap::new(),
        });
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p.0 as usize)) {
            p.children.push(id);
        }
        id
    }

    /// Builder helper: append an element with geometry and text in one call.
    pub fn push_box(
        &mut self,
        parent: Option<ElementId>,
        tag: &str,
        classes: &str,
        top: f64,
        height: f64,
        text: &str,
    ) -> ElementId {
        let id = self.push(parent, tag, classes);
        let node = &mut self.nodes[id.0 as usize];
        node.top = top;
        node.height = height;
        node.text = text.to_string();
        id
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
    }

    pub fn set_height(&mut self, el: ElementId, height: f64) {
        if let Some(node) = self.nodes.get_mut(el.0 as usize) {
            node.height = height;
        }
    }

    pub fn set_top(&mut self, el: ElementId, top: f64) {
        if let Some(node) = self.nodes.get_mut(el.0 as usize) {
            node.top = top;
        }
    }

    pub fn style(&self, el: ElementId, prop: StyleProperty) -> Option<f64> {
        self.nodes
            .get(el.0 as usize)
            .and_then(|n| n.styles.get(&prop).copied())
    }

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes
            .get(el.0 as usize)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn is_descendant(&self, el: ElementId, ancestor: ElementId) -> bool {
        let mut cur = self.nodes[el.0 as usize].parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.nodes[p.0 as usize].parent;
        }
        false
    }

    /// Right-to-left match: the last compound must match `el`, earlier ones
    /// must match successive ancestors. Like the DOM, ancestors outside a
    /// query scope still count.
    fn matches(&self, el: ElementId, sel: &Selector) -> bool {
        let Some((last, rest)) = sel.parts.split_last() else {
            return false;
        };
        if !self.nodes[el.0 as usize].matches(last) {
            return false;
        }
        let mut cur = self.nodes[el.0 as usize].parent;
        for part in rest.iter().rev() {
            loop {
                let Some(p) = cur else {
                    return false;
                };
                cur = self.nodes[p.0 as usize].parent;
                if self.nodes[p.0 as usize].matches(part) {
                    break;
                }
            }
        }
        true
    }

    /// Ids in document (pre-order) order.
    fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ElementId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| ElementId(i as u32))
            .rev()
            .collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0 as usize].children.iter().rev().copied());
        }
        out
    }

    fn select(&self, selector: &str, scope: Option<ElementId>) -> Vec<ElementId> {
        let Some(sel) = Selector::parse(selector) else {
            log::debug!("unsupported selector {selector:?}");
            return Vec::new();
        };
        self.document_order()
            .into_iter()
            .filter(|&id| scope.map_or(true, |s| self.is_descendant(id, s)))
            .filter(|&id| self.matches(id, &sel))
            .collect()
    }
}

impl Document for MemoryDocument {
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.select(selector, None).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.select(selector, None)
    }

    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        if scope.0 as usize >= self.nodes.len() {
            return Vec::new();
        }
        self.select(selector, Some(scope))
    }

    fn text(&self, el: ElementId) -> Option<String> {
        self.nodes.get(el.0 as usize).map(|n| n.text.clone())
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(el.0 as usize) {
            node.text = text.to_string();
        }
    }

    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        if let Some(node) = self.nodes.get_mut(el.0 as usize) {
            let present = node.classes.iter().position(|c| c == class);
            match (present, on) {
                (None, true) => node.classes.push(class.to_string()),
                (Some(i), false) => {
                    node.classes.remove(i);
                }
                _ => {}
            }
        }
    }

    fn set_style(&mut self, el: ElementId, prop: StyleProperty, value: f64) {
        if let Some(node) = self.nodes.get_mut(el.0 as usize) {
            node.styles.insert(prop, value);
        }
    }

    fn offset_height(&self, el: ElementId) -> Option<f64> {
        self.nodes.get(el.0 as usize).map(|n| n.height)
    }

    fn offset_top(&self, el: ElementId) -> Option<f64> {
        self.nodes.get(el.0 as usize).map(|n| n.top)
    }

    fn viewport_width(&self) -> f64 {
        self.viewport.width
    }

    fn viewport_height(&self) -> f64 {
        self.viewport.height
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if let Some(tag) = &part.tag {
                f.write_str(tag)?;
            }
            if let Some(id) = &part.id {
                write!(f, "#{id}")?;
            }
            for cls in &part.classes {
                write!(f, ".{cls}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryDocument, ElementId, ElementId, ElementId) {
        let mut doc = MemoryDocument::new(1200.0, 800.0);
        let section = doc.push_box(None, "section", "servicos-content container", 1000.0, 1800.0, "");
        let header = doc.push_box(Some(section), "div", "servicos-header", 1000.0, 200.0, "");
        let title = doc.push_box(Some(header), "h2", "", 1000.0, 60.0, "Serviços");
        (doc, section, header, title)
    }

    #[test]
    fn compound_and_descendant_selectors() {
        let (doc, section, header, title) = sample();
        assert_eq!(doc.query(".servicos-content.container"), Some(section));
        assert_eq!(
            doc.query(".servicos-content.container .servicos-header"),
            Some(header)
        );
        assert_eq!(doc.query("section h2"), Some(title));
        assert_eq!(doc.query(".servicos-header.container"), None);
    }

    #[test]
    fn query_within_returns_descendants_only() {
        let (mut doc, section, header, title) = sample();
        let _outside = doc.push_box(None, "h2", "", 0.0, 10.0, "other");
        assert_eq!(doc.query_within(header, "h2"), vec![title]);
        assert!(doc.query_within(title, "h2").is_empty());
        assert_eq!(doc.query_within(section, ".servicos-content h2"), vec![title]);
        assert_eq!(doc.query_all("h2").len(), 2);
    }

    #[test]
    fn unsupported_selectors_match_nothing() {
        let (doc, ..) = sample();
        assert!(doc.query_all("div > h2").is_empty());
        assert!(Selector::parse("").is_none());
        assert_eq!(
            Selector::parse("div.a.b #x").map(|s| s.to_string()),
            Some("div.a.b #x".to_string())
        );
    }

    #[test]
    fn class_toggle_and_styles() {
        let (mut doc, _, header, _) = sample();
        doc.set_class(header, "is-pinned", true);
        doc.set_class(header, "is-pinned", true);
        assert!(doc.has_class(header, "is-pinned"));
        doc.set_class(header, "is-pinned", false);
        assert!(!doc.has_class(header, "is-pinned"));
        doc.set_style(header, StyleProperty::PinOffset, 12.0);
        assert_eq!(doc.style(header, StyleProperty::PinOffset), Some(12.0));
    }

    #[test]
    fn layout_round_trip_preserves_order() {
        let json = r#"{
            "viewport": { "width": 1024, "height": 768 },
            "body": [
                { "tag": "div", "classes": ["grid"], "top": 10, "height": 100, "children": [
                    { "tag": "h3", "text": "+500" },
                    { "tag": "h3", "text": "24/7" }
                ]}
            ]
        }"#;
        let layout: PageLayout = serde_json::from_str(json).unwrap();
        let doc = MemoryDocument::from_layout(&layout);
        let grid = doc.query(".grid").unwrap();
        let labels = doc.query_within(grid, "h3");
        let texts: Vec<_> = labels.iter().filter_map(|&l| doc.text(l)).collect();
        assert_eq!(texts, vec!["+500", "24/7"]);
        assert_eq!(doc.viewport_width(), 1024.0);
    }
}
