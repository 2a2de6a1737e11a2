//! Pin distance from rendered layout.
//!
//! Heights depend on text wrapping and font loading, so the distance is
//! measured fresh on every call and never cached.

use crate::dom::Document;
use crate::error::ScrollError;
use crate::ids::ElementId;

/// Default visual buffer subtracted from the pin distance, in px.
pub const PIN_OFFSET: f64 = 96.0;

#[derive(Clone, Debug, PartialEq)]
pub struct GeometryResolver {
    /// Title node selector, relative to the header.
    pub title: String,
    /// Subtitle node selector, relative to the header.
    pub subtitle: String,
    pub fixed_offset: f64,
}

impl GeometryResolver {
    pub fn new(title: &str, subtitle: &str, fixed_offset: f64) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            fixed_offset,
        }
    }

    /// Rendered height of the header's title plus subtitle.
    pub fn header_height(&self, doc: &dyn Document, header: ElementId) -> Result<f64, ScrollError> {
        let mut total = 0.0;
        for selector in [&self.title, &self.subtitle] {
            let node = doc
                .query_within(header, selector)
                .into_iter()
                .next()
                .ok_or_else(|| ScrollError::missing(selector))?;
            total += doc
                .offset_height(node)
                .ok_or_else(|| ScrollError::missing(selector))?;
        }
        Ok(total)
    }

    /// `container height - header height - fixed offset`, floored at zero.
    pub fn end_scroll_distance(
        &self,
        doc: &dyn Document,
        container: ElementId,
        header: ElementId,
    ) -> Result<f64, ScrollError> {
        let container_height = doc
            .offset_height(container)
            .ok_or_else(|| ScrollError::missing("pin container"))?;
        let header_height = self.header_height(doc, header)?;
        Ok((container_height - header_height - self.fixed_offset).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn section(title_h: f64, subtitle_h: f64) -> (MemoryDocument, ElementId, ElementId) {
        let mut doc = MemoryDocument::new(1200.0, 900.0);
        let container = doc.push_box(None, "section", "servicos-content container", 1000.0, 2000.0, "");
        let header = doc.push_box(Some(container), "div", "servicos-header", 1000.0, 0.0, "");
        doc.push_box(Some(header), "h2", "", 1000.0, title_h, "Serviços");
        doc.push_box(Some(header), "p", "servicos-subtitle", 1060.0, subtitle_h, "…");
        (doc, container, header)
    }

    #[test]
    fn distance_subtracts_header_and_offset() {
        let (doc, container, header) = section(64.0, 40.0);
        let geo = GeometryResolver::new("h2", ".servicos-subtitle", PIN_OFFSET);
        assert_eq!(geo.header_height(&doc, header), Ok(104.0));
        assert_eq!(geo.end_scroll_distance(&doc, container, header), Ok(1800.0));
    }

    #[test]
    fn missing_subtitle_is_reported() {
        let (doc, container, header) = section(64.0, 40.0);
        let geo = GeometryResolver::new("h2", ".setores-subtitle", PIN_OFFSET);
        assert_eq!(
            geo.end_scroll_distance(&doc, container, header),
            Err(ScrollError::MissingElement {
                selector: ".setores-subtitle".into()
            })
        );
    }

    #[test]
    fn distance_never_negative() {
        let (mut doc, container, header) = section(64.0, 40.0);
        doc.set_height(container, 150.0);
        let geo = GeometryResolver::new("h2", ".servicos-subtitle", PIN_OFFSET);
        assert_eq!(geo.end_scroll_distance(&doc, container, header), Ok(0.0));
    }
}
