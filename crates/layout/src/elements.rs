//! Positioned output of the layout engine, one list per page.
//!
//! Coordinates are in points with a top-left page origin; renderers flip
//! them as needed.

use dossier_types::geometry::Rect;
use dossier_types::Color;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub fill: Option<Color>,
    /// Stroke width and color, drawn centered on the inset outline.
    pub stroke: Option<(f32, Color)>,
    pub corner_radius: f32,
}

/// One glyph of a shaped line, positioned by its advance.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub id: u16,
    pub advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    /// Source text this glyph stands for; empty for trailing glyphs of a cluster.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub face_id: usize,
    pub font_size: f32,
    pub color: Color,
    pub synthetic_bold: bool,
    /// Baseline position measured from the element's top edge.
    pub baseline: f32,
    pub glyphs: Vec<PositionedGlyph>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub src: String,
    pub corner_radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorElement {
    pub view_box: String,
    pub paths: Arc<Vec<String>>,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkElement {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Rectangle(RectElement),
    Text(TextElement),
    Image(ImageElement),
    Vector(VectorElement),
    Link(LinkElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn new(rect: Rect, element: LayoutElement) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            element,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<PositionedElement>,
}

impl LayoutPage {
    /// Text of every text element in paint order, one element per line.
    pub fn text_lines(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|el| match &el.element {
                LayoutElement::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> impl Iterator<Item = (&PositionedElement, &str)> {
        self.elements.iter().filter_map(|el| match &el.element {
            LayoutElement::Link(link) => Some((el, link.href.as_str())),
            _ => None,
        })
    }
}
